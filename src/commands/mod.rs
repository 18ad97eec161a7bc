pub mod config;
pub mod start;
pub mod utils;

pub use config::{run_init, run_show_config};
pub use start::run_start;
