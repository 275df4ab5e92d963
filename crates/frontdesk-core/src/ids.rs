use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Handle of an account in the external identity provider.
    IdentityHandle
);
string_id!(ProfileId);
string_id!(DoctorId);
string_id!(BedId);
string_id!(AdmissionId);
string_id!(BillId);
string_id!(
    /// Reference to a patient row owned by the patient registry.
    PatientId
);
string_id!(
    /// Human-facing code such as `DR24030912345607`: prefix, `YYMMDD`, the
    /// last six digits of the epoch milliseconds and a two-digit tie-breaker.
    BusinessIdentifier
);

/// A login address, stored trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoginAddress(String);

impl LoginAddress {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLoginAddress`] unless the value has exactly
    /// one `@` between a non-empty local part and domain, and no whitespace.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized = raw.trim().to_lowercase();
        let invalid = |reason| CoreError::InvalidLoginAddress {
            address: raw.to_string(),
            reason,
        };

        if normalized.chars().any(char::is_whitespace) {
            return Err(invalid("contains whitespace"));
        }
        let mut parts = normalized.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected exactly one '@'"));
        };
        if local.is_empty() {
            return Err(invalid("empty local part"));
        }
        if domain.is_empty() {
            return Err(invalid("empty domain"));
        }

        Ok(Self(normalized))
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidLoginAddress`] if the joined address is invalid.
    pub fn from_parts(local: &str, domain: &str) -> Result<Self, CoreError> {
        Self::parse(&format!("{local}@{domain}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.split_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for LoginAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LoginAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LoginAddress {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LoginAddress> for String {
    fn from(address: LoginAddress) -> Self {
        address.0
    }
}

/// Display-order position of a row in a list. Unique per table, but not an
/// identity: rows may be reordered without touching anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SequencePosition(u32);

impl SequencePosition {
    pub const FIRST: Self = Self(1);

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSequencePosition`] for zero.
    pub fn new(value: u32) -> Result<Self, CoreError> {
        if value == 0 {
            return Err(CoreError::InvalidSequencePosition(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for SequencePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for SequencePosition {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SequencePosition> for u32 {
    fn from(position: SequencePosition) -> Self {
        position.0
    }
}
