//! Service adapters: storage backends and on-disk locations.

pub mod json_dir;
pub mod memory;
pub mod paths;
pub mod settings;

pub use json_dir::JsonDirStorage;
pub use memory::MemoryStorage;
pub use paths::{
    ensure_log_dir, ensure_storage_dir, get_app_data_dir, get_log_dir, get_settings_path,
    get_storage_dir,
};
pub use settings::{ensure_settings_file, load_settings};
