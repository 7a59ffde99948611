pub mod appointment;
pub mod client;
pub mod session_event;
