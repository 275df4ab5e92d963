use frontdesk_backend::{IdentityError, StoreError};
use frontdesk_core::{BusinessIdentifier, CoreError, IdentityHandle, LoginAddress, SequencePosition};
use frontdesk_saga::SagaError;
use thiserror::Error;

/// A compensation that could not be applied while rolling back.
#[derive(Debug)]
pub struct CompensationFailure {
    /// Name of the step whose compensation failed.
    pub step: String,
    /// What the compensation was trying to undo.
    pub description: String,
    pub error: Box<OperationError>,
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("a doctor is already registered for '{address}'")]
    DuplicateBusinessEntity { address: LoginAddress },

    #[error("login address '{address}' is already in use")]
    DuplicateLoginAddress {
        address: LoginAddress,
        /// Identity left behind because deleting it failed too.
        orphaned_identity: Option<IdentityHandle>,
    },

    #[error("phone number '{phone}' is already in use")]
    DuplicatePhoneNumber {
        phone: String,
        orphaned_identity: Option<IdentityHandle>,
    },

    #[error("license number '{registration_number}' is already registered")]
    DuplicateLicenseNumber { registration_number: String },

    #[error("could not create a login account for '{address}'")]
    IdentityCreationFailed {
        address: LoginAddress,
        #[source]
        source: IdentityError,
    },

    #[error("could not create the profile for '{address}'")]
    ProfileCreationFailed {
        address: LoginAddress,
        orphaned_identity: Option<IdentityHandle>,
        #[source]
        source: StoreError,
    },

    #[error("could not read the current doctor sort positions")]
    SequenceQueryFailed(#[source] StoreError),

    #[error("sort position still taken after {attempts} attempts (last tried {last_position})")]
    SequencePositionConflict {
        attempts: u32,
        last_position: SequencePosition,
    },

    #[error("doctor record references a missing row")]
    DomainRecordForeignKeyInvalid(#[source] StoreError),

    #[error("could not insert the doctor record")]
    DomainRecordInsertFailed(#[source] StoreError),

    #[error("doctor {doctor_code} was onboarded but could not be read back")]
    ConfirmationReadFailed {
        doctor_code: BusinessIdentifier,
        #[source]
        source: StoreError,
    },

    #[error("invalid login address")]
    InvalidLoginAddress(#[source] CoreError),

    #[error("step '{step}' failed and {} compensation(s) also failed", .compensation_failures.len())]
    RollbackIncomplete {
        step: String,
        #[source]
        source: Box<OperationError>,
        compensation_failures: Vec<CompensationFailure>,
    },

    #[error("no bed labelled '{0}'")]
    BedNotFound(String),

    #[error("bed '{0}' is occupied")]
    BedOccupied(String),

    #[error("patient {patient} is already admitted to another bed ({admission_code})")]
    PatientAlreadyAdmitted {
        patient: String,
        admission_code: BusinessIdentifier,
    },

    #[error("no admission with code '{0}'")]
    AdmissionNotFound(BusinessIdentifier),

    #[error("admission {0} is already discharged")]
    AlreadyDischarged(BusinessIdentifier),

    #[error("admission {0} already has a billing summary")]
    AlreadyBilled(BusinessIdentifier),

    #[error("discharge time precedes admission {0}")]
    DischargeBeforeAdmission(BusinessIdentifier),

    #[error("identity provider error")]
    Identity(#[source] IdentityError),

    #[error("backing store error")]
    Store(#[from] StoreError),
}

impl OperationError {
    /// Identity left without a profile when provisioning failed partway.
    #[must_use]
    pub fn orphaned_identity(&self) -> Option<&IdentityHandle> {
        match self {
            Self::DuplicateLoginAddress {
                orphaned_identity, ..
            }
            | Self::DuplicatePhoneNumber {
                orphaned_identity, ..
            }
            | Self::ProfileCreationFailed {
                orphaned_identity, ..
            } => orphaned_identity.as_ref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, OperationError>;

impl From<SagaError<OperationError>> for OperationError {
    fn from(err: SagaError<OperationError>) -> Self {
        match err {
            SagaError::StepFailed { source, .. } => source,
            SagaError::CompensationFailed {
                failed_step,
                step_error,
                compensation_errors,
            } => {
                let compensation_failures = compensation_errors
                    .into_iter()
                    .map(|e| CompensationFailure {
                        step: e.step,
                        description: e.description,
                        error: Box::new(e.error),
                    })
                    .collect();
                Self::RollbackIncomplete {
                    step: failed_step,
                    source: Box::new(step_error),
                    compensation_failures,
                }
            }
            other => other.into_step_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use frontdesk_saga::CompensationError;

    use super::*;

    #[test]
    fn step_failure_surfaces_the_classified_error() {
        let saga_error = SagaError::StepFailed {
            step: "insert_doctor".to_string(),
            source: OperationError::BedNotFound("G-01".to_string()),
        };

        let err = OperationError::from(saga_error);

        assert!(matches!(err, OperationError::BedNotFound(label) if label == "G-01"));
    }

    #[test]
    fn compensation_failure_becomes_rollback_incomplete() {
        let saga_error = SagaError::CompensationFailed {
            failed_step: "insert_doctor".to_string(),
            step_error: OperationError::DomainRecordInsertFailed(StoreError::unavailable(
                "timeout",
            )),
            compensation_errors: vec![CompensationError {
                step: "resolve_identity".to_string(),
                description: "delete the profile and identity created by this run".to_string(),
                error: OperationError::Store(StoreError::unavailable("timeout")),
            }],
        };

        let err = OperationError::from(saga_error);

        let OperationError::RollbackIncomplete {
            step,
            source,
            compensation_failures,
        } = err
        else {
            panic!("expected RollbackIncomplete");
        };
        assert_eq!(step, "insert_doctor");
        assert!(matches!(*source, OperationError::DomainRecordInsertFailed(_)));
        assert_eq!(compensation_failures.len(), 1);
        assert_eq!(compensation_failures[0].step, "resolve_identity");
    }

    #[test]
    fn messages_name_the_conflicting_value() {
        let err = OperationError::DuplicateLicenseNumber {
            registration_number: "KMC-4411".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "license number 'KMC-4411' is already registered"
        );
    }
}
