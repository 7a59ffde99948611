//! Postgres persistence for studio clients, appointments and session events.

pub mod db;
pub mod error;
pub mod model;
