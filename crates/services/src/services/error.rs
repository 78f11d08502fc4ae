use thiserror::Error;

/// Closed taxonomy for failures at the store boundary. Downstream code matches
/// on these kinds, never on backend message strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("row not found")]
    NotFound,
    #[error("unauthorized")]
    Unauthorized,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("transient store failure: {0}")]
    Transient(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                StoreError::Conflict(db.to_string())
            }
            other => StoreError::Transient(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert_eq!(StoreError::from(sqlx::Error::RowNotFound), StoreError::NotFound);
    }

    #[test]
    fn other_errors_map_to_transient() {
        let err = StoreError::from(sqlx::Error::PoolClosed);
        assert!(matches!(err, StoreError::Transient(_)));
    }
}
