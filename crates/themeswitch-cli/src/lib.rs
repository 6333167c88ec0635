// Themeswitch CLI Library

pub mod commands;
pub mod logging;
pub mod output;
pub mod router;

pub use logging::init_logging;
pub use router::{Cli, CommandRouter, Commands};
