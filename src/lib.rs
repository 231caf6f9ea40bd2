pub mod config;
pub mod estimate;
pub mod logging;
pub mod output;
pub mod server;
pub mod stderr_buffer;
pub mod tui;
