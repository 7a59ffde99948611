mod appointments;
mod sessions;
