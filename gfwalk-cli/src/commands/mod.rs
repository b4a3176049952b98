//! CLI command implementations.

pub mod catalog;
pub mod classify;
pub mod common;
pub mod config;
pub mod distance;
pub mod walk;
