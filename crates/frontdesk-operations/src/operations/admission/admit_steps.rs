use frontdesk_core::NewAdmission;
use frontdesk_saga::SagaStep;
use tracing::debug;

use super::context::WardSagaContext;
use super::saga_data::{AdmissionLocated, AdmitInput, Admitted, BedReserved};
use crate::OperationError;
use crate::operations::identifiers::new_business_identifier;
use crate::traits::WardRepository;

ward_step!(ReserveBedStep);
ward_step!(LocateOrCreateAdmissionStep);
ward_step!(LinkBedStep);

impl<W: WardRepository> SagaStep for ReserveBedStep<W> {
    type Input = AdmitInput;
    type Output = BedReserved;
    type Context = WardSagaContext<W>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "reserve_bed"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let bed = ctx
            .ward()
            .find_bed_by_label(&input.bed_label)?
            .ok_or_else(|| OperationError::BedNotFound(input.bed_label.clone()))?;
        if !bed.is_free() {
            return Err(OperationError::BedOccupied(input.bed_label));
        }
        let bed = ctx.ward().set_bed_state(&bed.id, true, None)?;
        debug!(bed = %bed.label, ward = %bed.ward, "reserved bed");
        Ok(BedReserved {
            patient: input.patient,
            bed,
        })
    }

    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        ctx.ward().set_bed_state(&output.bed.id, false, None)?;
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "mark the bed free again".to_string()
    }
}

impl<W: WardRepository> SagaStep for LocateOrCreateAdmissionStep<W> {
    type Input = BedReserved;
    type Output = AdmissionLocated;
    type Context = WardSagaContext<W>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "locate_or_create_admission"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        if let Some(open) = ctx.ward().find_open_admission(&input.patient)? {
            if open.bed_id != input.bed.id {
                return Err(OperationError::PatientAlreadyAdmitted {
                    patient: input.patient.to_string(),
                    admission_code: open.admission_code,
                });
            }
            debug!(admission = %open.admission_code, "resuming open admission on the same bed");
            return Ok(AdmissionLocated {
                bed: input.bed,
                admission: open,
                created_by_this_run: false,
            });
        }

        let admission = ctx.ward().insert_admission(NewAdmission {
            admission_code: new_business_identifier(
                ctx.billing().admission_code_prefix(),
                ctx.clock(),
            ),
            patient_id: input.patient,
            bed_id: input.bed.id.clone(),
            admitted_at: ctx.clock().now(),
        })?;
        debug!(admission = %admission.admission_code, "created admission");
        Ok(AdmissionLocated {
            bed: input.bed,
            admission,
            created_by_this_run: true,
        })
    }

    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        if output.created_by_this_run {
            ctx.ward().delete_admission(&output.admission.id)?;
        }
        Ok(())
    }

    fn compensation_description(&self) -> String {
        "delete the admission created by this run".to_string()
    }
}

impl<W: WardRepository> SagaStep for LinkBedStep<W> {
    type Input = AdmissionLocated;
    type Output = Admitted;
    type Context = WardSagaContext<W>;
    type Error = OperationError;

    fn name(&self) -> &'static str {
        "link_bed"
    }

    fn execute(
        &self,
        ctx: &Self::Context,
        input: Self::Input,
    ) -> Result<Self::Output, Self::Error> {
        let bed =
            ctx.ward()
                .set_bed_state(&input.bed.id, true, Some(input.admission.id.clone()))?;
        Ok(Admitted {
            bed,
            admission: input.admission,
            resumed: !input.created_by_this_run,
        })
    }
}
