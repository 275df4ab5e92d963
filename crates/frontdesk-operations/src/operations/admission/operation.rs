use std::sync::Arc;

use chrono::{DateTime, Utc};
use frontdesk_config::BillingConfig;
use frontdesk_core::Clock;
use frontdesk_saga::{SagaAuditLog, SagaBuilder};
use tracing::info;

use super::admit_steps::{LinkBedStep, LocateOrCreateAdmissionStep, ReserveBedStep};
use super::context::WardSagaContext;
use super::discharge_steps::{
    CloseAdmissionStep, ComputeChargesStep, LocateAdmissionStep, ReleaseBedStep,
    WriteBillingSummaryStep,
};
use super::saga_data::{AdmitInput, Admitted, DischargeInput, Discharged};
use crate::Result;
use crate::error::OperationError;
use crate::traits::WardRepository;

const SECONDS_PER_DAY: u64 = 86_400;

/// Whole days between admission and discharge, any part day counting as a
/// full one, and never fewer than `minimum`.
#[must_use]
pub fn billable_days(
    admitted_at: DateTime<Utc>,
    discharged_at: DateTime<Utc>,
    minimum: u32,
) -> u32 {
    let seconds = u64::try_from((discharged_at - admitted_at).num_seconds()).unwrap_or(0);
    let days = seconds.div_ceil(SECONDS_PER_DAY);
    u32::try_from(days).unwrap_or(u32::MAX).max(minimum)
}

fn ward_context<W: WardRepository>(
    ward: &Arc<W>,
    clock: &Arc<dyn Clock>,
    billing: &Arc<BillingConfig>,
) -> WardSagaContext<W> {
    WardSagaContext::new(Arc::clone(ward), Arc::clone(clock), Arc::clone(billing))
}

pub struct AdmitPatientOperation<W> {
    ward: Arc<W>,
    clock: Arc<dyn Clock>,
    billing: Arc<BillingConfig>,
}

impl<W: WardRepository + 'static> AdmitPatientOperation<W> {
    pub fn new(ward: Arc<W>, clock: Arc<dyn Clock>, billing: BillingConfig) -> Self {
        Self {
            ward,
            clock,
            billing: Arc::new(billing),
        }
    }

    /// # Errors
    ///
    /// [`OperationError::BedNotFound`], [`OperationError::BedOccupied`] or
    /// [`OperationError::PatientAlreadyAdmitted`] when the admission is not
    /// possible; store failures after the bed was reserved are rolled back
    /// first.
    pub fn execute(&self, input: &AdmitInput) -> Result<Admitted> {
        self.execute_with_audit(input).0
    }

    pub fn execute_with_audit(&self, input: &AdmitInput) -> (Result<Admitted>, SagaAuditLog) {
        let saga = SagaBuilder::new()
            .first_step(ReserveBedStep::<W>::new())
            .then(LocateOrCreateAdmissionStep::<W>::new())
            .then(LinkBedStep::<W>::new())
            .build();
        let context = ward_context(&self.ward, &self.clock, &self.billing);
        let (result, audit_log) = saga.execute_with_audit(&context, input.clone());
        let result = result.map_err(OperationError::from).inspect(|admitted| {
            info!(
                admission = %admitted.admission.admission_code,
                bed = %admitted.bed.label,
                patient = %admitted.admission.patient_id,
                resumed = admitted.resumed,
                "patient admitted"
            );
        });
        (result, audit_log)
    }
}

pub struct DischargeOperation<W> {
    ward: Arc<W>,
    clock: Arc<dyn Clock>,
    billing: Arc<BillingConfig>,
}

impl<W: WardRepository + 'static> DischargeOperation<W> {
    pub fn new(ward: Arc<W>, clock: Arc<dyn Clock>, billing: BillingConfig) -> Self {
        Self {
            ward,
            clock,
            billing: Arc::new(billing),
        }
    }

    /// # Errors
    ///
    /// [`OperationError::AdmissionNotFound`],
    /// [`OperationError::AlreadyDischarged`] or
    /// [`OperationError::AlreadyBilled`] when there is nothing to discharge;
    /// a failure after the bill was written deletes it again.
    pub fn execute(&self, input: &DischargeInput) -> Result<Discharged> {
        self.execute_with_audit(input).0
    }

    pub fn execute_with_audit(&self, input: &DischargeInput) -> (Result<Discharged>, SagaAuditLog) {
        let saga = SagaBuilder::new()
            .first_step(LocateAdmissionStep::<W>::new())
            .then(ComputeChargesStep::<W>::new())
            .then(WriteBillingSummaryStep::<W>::new())
            .then(CloseAdmissionStep::<W>::new())
            .then(ReleaseBedStep::<W>::new())
            .build();
        let context = ward_context(&self.ward, &self.clock, &self.billing);
        let (result, audit_log) = saga.execute_with_audit(&context, input.clone());
        let result = result.map_err(OperationError::from).inspect(|discharged| {
            info!(
                admission = %discharged.admission.admission_code,
                bill = %discharged.bill.bill_code,
                days = discharged.bill.billable_days,
                total = discharged.bill.total,
                "patient discharged"
            );
        });
        (result, audit_log)
    }
}
