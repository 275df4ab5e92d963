use frontdesk_core::NewBillingSummary;
use frontdesk_saga::SagaStep;
use tracing::debug;

use super::context::WardSagaContext;
use super::operation::billable_days;
use super::saga_data::{
    AdmissionClosed, AdmissionToClose, BillWritten, ChargesComputed, DischargeInput, Discharged,
};
use crate::OperationError;
use crate::operations::identifiers::new_business_identifier;
use crate::traits::WardRepository;

ward_step!(LocateAdmissionStep);
ward_step!(ComputeChargesStep);
ward_step!(WriteBillingSummaryStep);
ward_step!(CloseAdmissionStep);
ward_step!(ReleaseBedStep);

impl<W: WardRepository> SagaStep for LocateAdmissionStep<W> {
    type Input = DischargeInput;
    type Output = AdmissionToClose;
    type Context = WardSagaContext<W>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "locate_admission"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let admission = ctx
            .ward()
            .find_admission_by_code(&input.admission_code)?
            .ok_or_else(|| OperationError::AdmissionNotFound(input.admission_code.clone()))?;
        if !admission.is_open() {
            return Err(OperationError::AlreadyDischarged(input.admission_code));
        }
        let discharged_at = input.at.unwrap_or_else(|| ctx.clock().now());
        if discharged_at < admission.admitted_at {
            return Err(OperationError::DischargeBeforeAdmission(
                input.admission_code,
            ));
        }
        let bed = ctx
            .ward()
            .find_bed_by_id(&admission.bed_id)?
            .ok_or_else(|| OperationError::BedNotFound(admission.bed_id.to_string()))?;
        Ok(AdmissionToClose {
            admission,
            bed,
            discharged_at,
        })
    }
}

impl<W: WardRepository> SagaStep for ComputeChargesStep<W> {
    type Input = AdmissionToClose;
    type Output = ChargesComputed;
    type Context = WardSagaContext<W>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "compute_charges"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let days = billable_days(
            input.admission.admitted_at,
            input.discharged_at,
            ctx.billing().minimum_billable_days(),
        );
        let bed_charges = u64::from(days).saturating_mul(input.bed.daily_rate);
        debug!(
            admission = %input.admission.admission_code,
            days,
            daily_rate = input.bed.daily_rate,
            bed_charges,
            "computed charges"
        );
        Ok(ChargesComputed {
            located: input,
            billable_days: days,
            bed_charges,
        })
    }
}

impl<W: WardRepository> SagaStep for WriteBillingSummaryStep<W> {
    type Input = ChargesComputed;
    type Output = BillWritten;
    type Context = WardSagaContext<W>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "write_billing_summary"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let admission = &input.located.admission;
        let bill = ctx
            .ward()
            .insert_bill(NewBillingSummary {
                bill_code: new_business_identifier(ctx.billing().bill_code_prefix(), ctx.clock()),
                admission_id: admission.id.clone(),
                billable_days: input.billable_days,
                bed_charges: input.bed_charges,
                total: input.bed_charges,
            })
            .map_err(|err| {
                if err.is_unique_violation() && err.names_column("admission_id") {
                    OperationError::AlreadyBilled(admission.admission_code.clone())
                } else {
                    OperationError::Store(err)
                }
            })?;
        Ok(BillWritten {
            charges: input,
            bill,
        })
    }

    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        ctx.ward().delete_bill(&output.bill.id)?;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete the billing summary".to_string()
    }
}

impl<W: WardRepository> SagaStep for CloseAdmissionStep<W> {
    type Input = BillWritten;
    type Output = AdmissionClosed;
    type Context = WardSagaContext<W>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "close_admission"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let located = input.charges.located;
        let admission = ctx
            .ward()
            .set_admission_discharged(&located.admission.id, Some(located.discharged_at))?;
        Ok(AdmissionClosed {
            bill: input.bill,
            admission,
            bed: located.bed,
        })
    }

    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        ctx.ward()
            .set_admission_discharged(&output.admission.id, None)?;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "reopen the admission".to_string()
    }
}

impl<W: WardRepository> SagaStep for ReleaseBedStep<W> {
    type Input = AdmissionClosed;
    type Output = Discharged;
    type Context = WardSagaContext<W>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "release_bed"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let bed = ctx.ward().set_bed_state(&input.bed.id, false, None)?;
        Ok(Discharged {
            bill: input.bill,
            admission: input.admission,
            bed,
        })
    }
}
