use std::sync::Arc;

use frontdesk_backend::StoreError;
use frontdesk_config::ProvisioningConfig;
use frontdesk_core::{Clock, DoctorProfileView};
use frontdesk_saga::{Saga, SagaAuditLog, SagaBuilder};
use tracing::info;

use super::context::OnboardSagaContext;
use super::saga_data::{DoctorInserted, OnboardDoctorInput};
use super::saga_steps::{
    AllocateSequenceStep, GenerateIdentifiersStep, InsertDoctorStep, ResolveIdentityStep,
};
use crate::Result;
use crate::error::OperationError;
use crate::traits::{DoctorRepository, IdentityProvider, ProfileRepository};

/// Result of a successful onboarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorOnboarded {
    pub doctor: DoctorProfileView,
    /// The login account and profile existed before this run.
    pub reused_profile: bool,
    /// Doctor inserts needed to find a free sort position.
    pub insert_attempts: u32,
}

type OnboardSaga<I, P, D> =
    Saga<OnboardDoctorInput, DoctorInserted, OnboardSagaContext<I, P, D>, OperationError>;

pub struct OnboardDoctorOperation<I, P, D> {
    identities: Arc<I>,
    profiles: Arc<P>,
    doctors: Arc<D>,
    clock: Arc<dyn Clock>,
    config: Arc<ProvisioningConfig>,
}

impl<I, P, D> OnboardDoctorOperation<I, P, D>
where
    I: IdentityProvider + 'static,
    P: ProfileRepository + 'static,
    D: DoctorRepository + 'static,
{
    pub fn new(
        identities: Arc<I>,
        profiles: Arc<P>,
        doctors: Arc<D>,
        clock: Arc<dyn Clock>,
        config: ProvisioningConfig,
    ) -> Self {
        Self {
            identities,
            profiles,
            doctors,
            clock,
            config: Arc::new(config),
        }
    }

    /// Onboards one doctor, rolling back whatever this run created if a step
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the step that failed, or
    /// [`OperationError::RollbackIncomplete`] if the rollback itself failed.
    /// [`OperationError::ConfirmationReadFailed`] means the doctor *was*
    /// committed.
    pub fn execute(&self, input: &OnboardDoctorInput) -> Result<DoctorOnboarded> {
        self.execute_with_audit(input).0
    }

    /// Like [`OnboardDoctorOperation::execute`], also returning the saga's
    /// audit log.
    pub fn execute_with_audit(
        &self,
        input: &OnboardDoctorInput,
    ) -> (Result<DoctorOnboarded>, SagaAuditLog) {
        let saga = Self::build_saga();
        let context = self.create_saga_context();
        let (result, audit_log) = saga.execute_with_audit(&context, input.clone());
        let outcome = result
            .map_err(OperationError::from)
            .and_then(|inserted| self.confirm(inserted));
        (outcome, audit_log)
    }

    fn build_saga() -> OnboardSaga<I, P, D> {
        SagaBuilder::new()
            .first_step(GenerateIdentifiersStep::<I, P, D>::new())
            .then(ResolveIdentityStep::<I, P, D>::new())
            .then(AllocateSequenceStep::<I, P, D>::new())
            .then(InsertDoctorStep::<I, P, D>::new())
            .build()
    }

    fn create_saga_context(&self) -> OnboardSagaContext<I, P, D> {
        OnboardSagaContext::new(
            Arc::clone(&self.identities),
            Arc::clone(&self.profiles),
            Arc::clone(&self.doctors),
            Arc::clone(&self.clock),
            Arc::clone(&self.config),
        )
    }

    fn confirm(&self, inserted: DoctorInserted) -> Result<DoctorOnboarded> {
        let doctor_code = inserted.doctor.doctor_code.clone();
        let profile = self
            .profiles
            .find_profile_by_id(&inserted.profile.id)
            .and_then(|found| {
                found.ok_or_else(|| {
                    StoreError::not_found("profiles", &format!("id = {}", inserted.profile.id))
                })
            })
            .map_err(|source| OperationError::ConfirmationReadFailed {
                doctor_code: doctor_code.clone(),
                source,
            })?;

        info!(
            doctor_code = %doctor_code,
            address = %profile.email,
            sort_order = %inserted.doctor.sort_order,
            attempts = inserted.attempts,
            reused_profile = inserted.reused_profile,
            "doctor onboarded"
        );
        Ok(DoctorOnboarded {
            doctor: DoctorProfileView::join(&profile, inserted.doctor),
            reused_profile: inserted.reused_profile,
            insert_attempts: inserted.attempts,
        })
    }
}
