use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the unix epoch, saturating to 0 for clocks set before it.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Time source used by the store to stamp `last_activated`/`modified_at`.
pub type Clock = fn() -> u64;
