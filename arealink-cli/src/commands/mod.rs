//! CLI subcommand implementations.

pub mod area;
pub mod common;
pub mod config;
pub mod publish;
pub mod scoreboard;
pub mod watch;
