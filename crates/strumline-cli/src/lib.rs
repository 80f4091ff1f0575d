//! Strumline CLI library.
//!
//! Command implementations behind the `strumline` binary: pitch lookup,
//! note and click rendering, and scripted pointer sessions.

pub mod commands;
