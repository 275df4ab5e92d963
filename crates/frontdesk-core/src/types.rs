use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::ids::{
    AdmissionId, BedId, BillId, BusinessIdentifier, DoctorId, IdentityHandle, LoginAddress,
    PatientId, ProfileId, SequencePosition,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Doctor,
    Nurse,
    Receptionist,
    Pharmacist,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Admin => "admin",
            Self::Doctor => "doctor",
            Self::Nurse => "nurse",
            Self::Receptionist => "receptionist",
            Self::Pharmacist => "pharmacist",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ViewPatients,
    EditPatients,
    ManageAppointments,
    WritePrescriptions,
    ManageBilling,
    ManagePharmacy,
    ManageStaff,
}

/// Consultation session a doctor is available for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Session {
    Morning,
    Afternoon,
    Evening,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityMetadata {
    pub role: Role,
    pub full_name: String,
}

/// Request to the identity provider for a new login account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub address: LoginAddress,
    pub initial_secret: String,
    pub confirmed: bool,
    pub metadata: IdentityMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: IdentityHandle,
    pub full_name: String,
    pub email: LoginAddress,
    pub phone: Option<String>,
    pub role: Role,
    pub status: ProfileStatus,
    pub capabilities: Vec<Capability>,
    pub employee_code: Option<BusinessIdentifier>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProfile {
    pub user_id: IdentityHandle,
    pub full_name: String,
    pub email: LoginAddress,
    pub phone: Option<String>,
    pub role: Role,
    pub status: ProfileStatus,
    pub capabilities: Vec<Capability>,
    pub employee_code: Option<BusinessIdentifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub doctor_code: BusinessIdentifier,
    pub user_id: IdentityHandle,
    pub profile_id: ProfileId,
    pub specialization: String,
    pub qualification: Option<String>,
    /// Medical council registration (license) number.
    pub registration_number: Option<String>,
    /// In minor currency units.
    pub consultation_fee: u64,
    pub sessions: Vec<Session>,
    pub sort_order: SequencePosition,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoctor {
    pub doctor_code: BusinessIdentifier,
    pub user_id: IdentityHandle,
    pub profile_id: ProfileId,
    pub specialization: String,
    pub qualification: Option<String>,
    pub registration_number: Option<String>,
    pub consultation_fee: u64,
    pub sessions: Vec<Session>,
    pub sort_order: SequencePosition,
}

/// Descriptive profile fields joined with the doctor row, for confirmation
/// screens and listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DoctorProfileView {
    pub doctor: Doctor,
    pub full_name: String,
    pub email: LoginAddress,
    pub phone: Option<String>,
    pub status: ProfileStatus,
    pub employee_code: Option<BusinessIdentifier>,
}

impl DoctorProfileView {
    #[must_use]
    pub fn join(profile: &Profile, doctor: Doctor) -> Self {
        Self {
            doctor,
            full_name: profile.full_name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            status: profile.status,
            employee_code: profile.employee_code.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bed {
    pub id: BedId,
    pub ward: String,
    pub label: String,
    /// In minor currency units.
    pub daily_rate: u64,
    /// Set when the bed is reserved, before any admission exists.
    pub occupied: bool,
    pub current_admission: Option<AdmissionId>,
}

impl Bed {
    #[must_use]
    pub fn is_free(&self) -> bool {
        !self.occupied
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBed {
    pub ward: String,
    pub label: String,
    pub daily_rate: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    pub id: AdmissionId,
    pub admission_code: BusinessIdentifier,
    pub patient_id: PatientId,
    pub bed_id: BedId,
    pub admitted_at: DateTime<Utc>,
    pub discharged_at: Option<DateTime<Utc>>,
}

impl Admission {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.discharged_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdmission {
    pub admission_code: BusinessIdentifier,
    pub patient_id: PatientId,
    pub bed_id: BedId,
    pub admitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingSummary {
    pub id: BillId,
    pub bill_code: BusinessIdentifier,
    pub admission_id: AdmissionId,
    pub billable_days: u32,
    pub bed_charges: u64,
    pub total: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBillingSummary {
    pub bill_code: BusinessIdentifier,
    pub admission_id: AdmissionId,
    pub billable_days: u32,
    pub bed_charges: u64,
    pub total: u64,
}
