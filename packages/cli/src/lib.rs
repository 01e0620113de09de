// ABOUTME: Taskbook server and command line tools
// ABOUTME: Configuration, server bootstrap, and offline data commands used by the binary

pub mod commands;
pub mod config;
pub mod server;

pub use config::{Config, ConfigError};
pub use server::{build_app, run_server};
