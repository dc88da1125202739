pub mod constants;
pub mod env;
pub mod logging;
pub mod map_config;
