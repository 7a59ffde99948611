use thiserror::Error;

/// Name of the exclusion constraint keeping an artist's bookings apart.
pub const ARTIST_OVERLAP_CONSTRAINT: &str = "appointment_artist_no_overlap";
/// Name of the exclusion constraint keeping a bed's bookings apart.
pub const BED_OVERLAP_CONSTRAINT: &str = "appointment_bed_no_overlap";

/// Database layer errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Pool error: {0}")]
    PoolError(#[from] diesel_async::pooled_connection::bb8::RunError),

    #[error(transparent)]
    CoreError(#[from] inkbook_core::error::CoreError),
}

pub type DbResult<T> = std::result::Result<T, DbError>;

/// ## Summary
/// Returns `true` if the error was raised by one of the appointment
/// non-overlap exclusion constraints.
#[must_use]
pub fn is_overlap_violation(err: &diesel::result::Error) -> bool {
    match err {
        diesel::result::Error::DatabaseError(_, info) => matches!(
            info.constraint_name(),
            Some(ARTIST_OVERLAP_CONSTRAINT | BED_OVERLAP_CONSTRAINT)
        ),
        _ => false,
    }
}
