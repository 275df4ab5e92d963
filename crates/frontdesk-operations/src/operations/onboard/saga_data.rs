use frontdesk_core::{
    BusinessIdentifier, Doctor, LoginAddress, Profile, SequencePosition, Session,
};

use crate::operations::ResolvedIdentity;

/// Everything the front desk enters when onboarding a doctor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardDoctorInput {
    pub full_name: String,
    /// Synthesized from the name when absent or blank.
    pub login_address: Option<String>,
    pub phone: Option<String>,
    pub specialization: String,
    pub qualification: Option<String>,
    pub registration_number: Option<String>,
    /// In minor currency units.
    pub consultation_fee: u64,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone)]
pub struct GeneratedIdentifiers {
    pub input: OnboardDoctorInput,
    pub doctor_code: BusinessIdentifier,
    pub employee_code: BusinessIdentifier,
    pub address: LoginAddress,
}

#[derive(Debug, Clone)]
pub struct IdentityResolved {
    pub identifiers: GeneratedIdentifiers,
    pub resolved: ResolvedIdentity,
    /// Compensation deletes the pair only when this is set.
    pub created_by_this_run: bool,
}

#[derive(Debug, Clone)]
pub struct PositionAllocated {
    pub identity: IdentityResolved,
    pub position: SequencePosition,
}

#[derive(Debug, Clone)]
pub struct DoctorInserted {
    pub profile: Profile,
    pub doctor: Doctor,
    pub reused_profile: bool,
    pub attempts: u32,
}
