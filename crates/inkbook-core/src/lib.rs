//! Shared configuration, errors and constants for the Inkbook studio scheduler.

pub mod config;
pub mod constants;
pub mod error;
