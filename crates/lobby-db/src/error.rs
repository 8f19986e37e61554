use std::fmt;

use thiserror::Error;

/// Which unique column an insert collided with. Classified from the
/// SQLite constraint-violation error code plus follow-up existence
/// queries — never by parsing driver error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Username => write!(f, "username"),
            UniqueField::Email => write!(f, "email"),
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("unique {0} already exists")]
    UniqueViolation(UniqueField),

    #[error("connection lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl DbError {
    pub fn unique_field(&self) -> Option<UniqueField> {
        match self {
            DbError::UniqueViolation(field) => Some(*field),
            _ => None,
        }
    }
}

/// True when the error is SQLite's constraint-violation result code.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
