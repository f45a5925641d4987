//! CLI Commands

pub mod config;
pub mod diagnose;
pub mod list;
pub mod run;
