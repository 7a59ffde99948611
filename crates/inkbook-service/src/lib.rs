//! Appointment scheduling for the studio: the conflict model, the workflow
//! that books against it, and the persistence collaborators it runs on.

pub mod client;
pub mod error;
pub mod scheduling;
pub mod store;
