//! Command-line front end for the ED pain management audit.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
