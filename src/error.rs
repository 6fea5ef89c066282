use std::collections::TryReserveError;

use thiserror::Error;

/// Things that can go wrong talking to a TreeMap. Every failure leaves the
/// map exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// Checked access asked for a key that isn't in the map. The map never
    /// inserts a default on a miss.
    #[error("key not found")]
    KeyNotFound,

    /// Room for a new node couldn't be allocated.
    #[error("failed to allocate a tree node: {0}")]
    AllocationFailed(#[from] TryReserveError),
}

#[cfg(test)]
mod tests {
    use super::MapError;

    #[test]
    fn test_key_not_found_message() {
        assert_eq!("key not found", MapError::KeyNotFound.to_string());
    }

    #[test]
    fn test_allocation_failure_wraps_reserve_error() {
        let reserve_error = Vec::<u64>::new()
            .try_reserve(usize::MAX)
            .expect_err("reserving usize::MAX elements must fail");
        let error = MapError::from(reserve_error);

        assert!(matches!(error, MapError::AllocationFailed(_)));
        assert!(error.to_string().starts_with("failed to allocate"));
    }
}
