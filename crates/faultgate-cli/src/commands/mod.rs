//! CLI subcommands

pub mod capture;
pub mod config;
pub mod context;
pub mod run;
