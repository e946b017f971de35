/*
[INPUT]:  Crate modules
[OUTPUT]: Public deribit-cli library surface used by the binary
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Command};
pub use commands::execute;
pub use config::CliConfig;
