//! # Flowbot CLI Library
//!
//! Argument parsing and command handlers for the `flowbot` binary.

pub mod cli;
pub mod clients;
