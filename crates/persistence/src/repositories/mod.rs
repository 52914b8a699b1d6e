//! Repository implementations for database operations.
//!
//! Reads that only gate presentation run on the pool; every mutation that
//! participates in a multi-step operation takes an explicit
//! `&mut Transaction` so the caller controls the commit boundary.

pub mod city;
pub mod country;
pub mod governor;
pub mod invite;

pub use city::CityRepository;
pub use country::CountryRepository;
pub use governor::GovernorRepository;
pub use invite::InviteRepository;

/// Returns the violated constraint name for a Postgres unique violation.
///
/// Lets callers map a lost insert race to a distinct conflict error
/// instead of a generic database failure.
pub fn unique_constraint(err: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return db_err.constraint().map(str::to_string);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_constraint_non_database_error() {
        assert_eq!(unique_constraint(&sqlx::Error::RowNotFound), None);
        assert_eq!(unique_constraint(&sqlx::Error::PoolClosed), None);
    }
}
