use chrono::{DateTime, Utc};
use frontdesk_core::{Admission, Bed, BillingSummary, BusinessIdentifier, PatientId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmitInput {
    pub patient: PatientId,
    pub bed_label: String,
}

#[derive(Debug, Clone)]
pub struct BedReserved {
    pub patient: PatientId,
    pub bed: Bed,
}

#[derive(Debug, Clone)]
pub struct AdmissionLocated {
    pub bed: Bed,
    pub admission: Admission,
    /// Compensation deletes the admission only when this is set.
    pub created_by_this_run: bool,
}

/// A patient admitted to a bed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    pub bed: Bed,
    pub admission: Admission,
    /// An open admission on the same bed was picked up instead of creating one.
    pub resumed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DischargeInput {
    pub admission_code: BusinessIdentifier,
    /// Discharge time; the clock's current time when absent.
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct AdmissionToClose {
    pub admission: Admission,
    pub bed: Bed,
    pub discharged_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ChargesComputed {
    pub located: AdmissionToClose,
    pub billable_days: u32,
    pub bed_charges: u64,
}

#[derive(Debug, Clone)]
pub struct BillWritten {
    pub charges: ChargesComputed,
    pub bill: BillingSummary,
}

#[derive(Debug, Clone)]
pub struct AdmissionClosed {
    pub bill: BillingSummary,
    pub admission: Admission,
    pub bed: Bed,
}

/// A closed admission with its bill and the freed bed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discharged {
    pub bill: BillingSummary,
    pub admission: Admission,
    pub bed: Bed,
}
