pub mod config_files;
pub mod json_store;

pub use config_files::*;
pub use json_store::*;
