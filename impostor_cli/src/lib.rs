//! Internal modules for the impostor terminal front end.
//!
//! Command parsing, configuration and the game loop used by the
//! `impostor_cli` binary.

pub mod app;
pub mod commands;
pub mod config;
