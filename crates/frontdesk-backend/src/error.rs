use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    UniqueViolation,
    ForeignKeyViolation,
    NotFound,
    Unavailable,
}

impl StoreErrorCode {
    /// SQLSTATE the hosted store reports for this code.
    #[must_use]
    pub fn sqlstate(self) -> &'static str {
        match self {
            Self::UniqueViolation => "23505",
            Self::ForeignKeyViolation => "23503",
            Self::NotFound => "P0002",
            Self::Unavailable => "08006",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sqlstate())
    }
}

/// Row-level failure from the backing store.
///
/// For constraint violations `detail` follows the PostgreSQL form
/// `Key (column)=(value) already exists.`, which is what callers parse to tell
/// a duplicate email from a duplicate phone or sort position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
    pub detail: Option<String>,
}

impl StoreError {
    #[must_use]
    pub fn unique_violation(table: &str, column: &str, value: &str) -> Self {
        Self {
            code: StoreErrorCode::UniqueViolation,
            message: format!(
                "duplicate key value violates unique constraint \"{table}_{column}_key\""
            ),
            detail: Some(format!("Key ({column})=({value}) already exists.")),
        }
    }

    #[must_use]
    pub fn foreign_key_violation(table: &str, column: &str, value: &str, referenced: &str) -> Self {
        Self {
            code: StoreErrorCode::ForeignKeyViolation,
            message: format!(
                "insert or update on table \"{table}\" violates foreign key constraint \"{table}_{column}_fkey\""
            ),
            detail: Some(format!(
                "Key ({column})=({value}) is not present in table \"{referenced}\"."
            )),
        }
    }

    /// A delete refused because rows in `referencing` still point at the row.
    #[must_use]
    pub fn still_referenced(table: &str, column: &str, value: &str, referencing: &str) -> Self {
        Self {
            code: StoreErrorCode::ForeignKeyViolation,
            message: format!(
                "update or delete on table \"{table}\" violates foreign key constraint on table \"{referencing}\""
            ),
            detail: Some(format!(
                "Key ({column})=({value}) is still referenced from table \"{referencing}\"."
            )),
        }
    }

    #[must_use]
    pub fn not_found(table: &str, key: &str) -> Self {
        Self {
            code: StoreErrorCode::NotFound,
            message: format!("no row in \"{table}\" matches {key}"),
            detail: None,
        }
    }

    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::Unavailable,
            message: message.into(),
            detail: None,
        }
    }

    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        self.code == StoreErrorCode::UniqueViolation
    }

    #[must_use]
    pub fn is_foreign_key_violation(&self) -> bool {
        self.code == StoreErrorCode::ForeignKeyViolation
    }

    /// Column list named by the detail, e.g. `email` or `ward, label`.
    #[must_use]
    pub fn violated_columns(&self) -> Option<&str> {
        let rest = self.detail.as_deref()?.strip_prefix("Key (")?;
        let (columns, _) = rest.split_once(")=(")?;
        Some(columns)
    }

    /// Whether the detail names `column`, alone or in a composite key.
    #[must_use]
    pub fn names_column(&self, column: &str) -> bool {
        self.violated_columns()
            .is_some_and(|columns| columns.split(", ").any(|c| c == column))
    }

    /// The offending value from the detail.
    #[must_use]
    pub fn conflicting_value(&self) -> Option<&str> {
        let rest = self.detail.as_deref()?.strip_prefix("Key (")?;
        let (_, rest) = rest.split_once(")=(")?;
        let end = rest.rfind(") ")?;
        Some(&rest[..end])
    }
}

/// Failure reported by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("an account is already registered for '{0}'")]
    AlreadyRegistered(String),

    #[error("no account with handle '{0}'")]
    NotFound(String),

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for IdentityError {
    fn from(err: StoreError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_detail_is_parseable() {
        let err = StoreError::unique_violation("profiles", "email", "asha0001@x.test");

        assert!(err.is_unique_violation());
        assert_eq!(err.violated_columns(), Some("email"));
        assert!(err.names_column("email"));
        assert!(!err.names_column("phone"));
        assert_eq!(err.conflicting_value(), Some("asha0001@x.test"));
    }

    #[test]
    fn foreign_key_detail_is_parseable() {
        let err = StoreError::foreign_key_violation("doctors", "profile_id", "p-9", "profiles");

        assert!(err.is_foreign_key_violation());
        assert!(err.names_column("profile_id"));
        assert_eq!(err.conflicting_value(), Some("p-9"));
    }

    #[test]
    fn composite_keys_match_each_column() {
        let err = StoreError {
            code: StoreErrorCode::UniqueViolation,
            message: "duplicate".to_string(),
            detail: Some("Key (ward, label)=(icu, 3) already exists.".to_string()),
        };

        assert!(err.names_column("ward"));
        assert!(err.names_column("label"));
        assert_eq!(err.conflicting_value(), Some("icu, 3"));
    }

    #[test]
    fn values_containing_parentheses_survive() {
        let err = StoreError::unique_violation("doctors", "registration_number", "KMC (2019) 44");

        assert_eq!(err.conflicting_value(), Some("KMC (2019) 44"));
    }

    #[test]
    fn errors_without_detail_name_nothing() {
        let err = StoreError::unavailable("connection reset");

        assert_eq!(err.violated_columns(), None);
        assert_eq!(err.conflicting_value(), None);
        assert_eq!(err.to_string(), "connection reset (code 08006)");
    }
}
