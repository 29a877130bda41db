pub mod config;
pub mod files;

pub use config::{load_config, save_config, AppConfig};
pub use files::{atomic_write, config_file, ensure_data_dir, init_local_data_dir, log_file};
