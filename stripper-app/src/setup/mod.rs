//! Command execution for the application.

pub mod execution;
