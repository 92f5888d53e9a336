pub mod config;
pub mod constants;
pub mod forward;
pub mod logging;
pub mod server;
