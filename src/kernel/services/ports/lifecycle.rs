use std::future::Future;
use std::pin::Pin;

use crate::kernel::recovery::RecoveryReport;

pub type HookFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What the host should do before letting the page/window go away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeforeUnload {
    /// At least one tab holds unsaved edits; the host should ask the user.
    pub should_prompt: bool,
}

/// Page/window lifecycle events delivered by the host environment.
pub trait LifecycleHooks {
    fn on_load(&mut self) -> HookFuture<'_, RecoveryReport>;
    fn on_before_unload(&mut self) -> BeforeUnload;
    fn on_blur(&mut self) -> HookFuture<'_, ()>;
}
