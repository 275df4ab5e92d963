mod doctors;
mod identities;
mod profiles;
mod ward;

use chrono::{DateTime, Utc};
use frontdesk_core::{IdentityHandle, IdentityMetadata, LoginAddress};
use serde::{Deserialize, Serialize};

/// An account held by the identity provider. The initial secret is handed
/// to the provider and never stored alongside the rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub handle: IdentityHandle,
    pub address: LoginAddress,
    pub confirmed: bool,
    pub metadata: IdentityMetadata,
    pub created_at: DateTime<Utc>,
}

/// Every table of the front desk, with the constraints the hosted store
/// enforces on them.
///
/// | table        | unique                                   | foreign keys                      |
/// |--------------|------------------------------------------|-----------------------------------|
/// | `profiles`   | `email`, `phone`, `user_id`              | `user_id` → identities            |
/// | `doctors`    | `doctor_code`, `sort_order`, `registration_number` | `profile_id` → profiles |
/// | `beds`       | `label`                                  | `current_admission` → admissions  |
/// | `admissions` | `admission_code`                         | `bed_id` → beds                   |
/// | `bills`      | `bill_code`, `admission_id`              | `admission_id` → admissions       |
///
/// Deletes are restricted while other rows still reference the target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub(crate) identities: Vec<IdentityRecord>,
    #[serde(default)]
    pub(crate) profiles: Vec<frontdesk_core::Profile>,
    #[serde(default)]
    pub(crate) doctors: Vec<frontdesk_core::Doctor>,
    #[serde(default)]
    pub(crate) beds: Vec<frontdesk_core::Bed>,
    #[serde(default)]
    pub(crate) admissions: Vec<frontdesk_core::Admission>,
    #[serde(default)]
    pub(crate) bills: Vec<frontdesk_core::BillingSummary>,
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows across all tables, identities included.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.identities.len()
            + self.profiles.len()
            + self.doctors.len()
            + self.beds.len()
            + self.admissions.len()
            + self.bills.len()
    }
}

/// Case-insensitive "starts with", the way an `ILIKE 'base%'` filter matches.
fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
