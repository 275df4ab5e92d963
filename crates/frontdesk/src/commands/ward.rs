use std::sync::Arc;

use frontdesk_core::{BusinessIdentifier, PatientId};
use frontdesk_operations::operations::admission::{
    AdmitInput, AdmitPatientOperation, DischargeInput, DischargeOperation,
};
use frontdesk_operations::operations::{AddBedInput, RosterOperation};
use frontdesk_operations::providers::FileStore;

use super::{AddBedArgs, AdmitArgs, Context, DischargeArgs};
use crate::error::{CliError, Result};

fn roster(context: &Context) -> RosterOperation<FileStore, FileStore, FileStore> {
    RosterOperation::new(
        Arc::clone(&context.store),
        Arc::clone(&context.store),
        Arc::clone(&context.store),
    )
}

pub(super) fn add_bed(args: AddBedArgs, context: &Context) -> Result<()> {
    let bed = roster(context)
        .add_bed(AddBedInput {
            ward: args.ward,
            label: args.label,
            daily_rate: args.daily_rate,
        })
        .map_err(CliError::Roster)?;

    println!("Added bed {} in {} ({} per day)", bed.label, bed.ward, bed.daily_rate);
    Ok(())
}

pub(super) fn list_beds(context: &Context) -> Result<()> {
    let beds = roster(context).list_beds().map_err(CliError::Roster)?;

    if beds.is_empty() {
        println!("No beds registered.");
        return Ok(());
    }

    for bed in &beds {
        let state = if bed.is_free() { "free" } else { "occupied" };
        println!("{}  {}  {}  {}", bed.ward, bed.label, bed.daily_rate, state);
    }
    Ok(())
}

pub(super) fn admit(args: AdmitArgs, context: &Context) -> Result<()> {
    let operation = AdmitPatientOperation::new(
        Arc::clone(&context.store),
        Arc::clone(&context.clock),
        context.config.billing().clone(),
    );
    let admitted = operation
        .execute(&AdmitInput {
            patient: PatientId::new(args.patient),
            bed_label: args.bed,
        })
        .map_err(CliError::Admit)?;

    println!("Admission: {}", admitted.admission.admission_code);
    println!("Bed: {}", admitted.bed.label);
    println!("Admitted at: {}", admitted.admission.admitted_at.to_rfc3339());
    if admitted.resumed {
        println!("Resumed open admission");
    }
    Ok(())
}

pub(super) fn discharge(args: DischargeArgs, context: &Context) -> Result<()> {
    let operation = DischargeOperation::new(
        Arc::clone(&context.store),
        Arc::clone(&context.clock),
        context.config.billing().clone(),
    );
    let discharged = operation
        .execute(&DischargeInput {
            admission_code: BusinessIdentifier::new(args.admission_code),
            at: args.at,
        })
        .map_err(CliError::Discharge)?;

    println!("Discharged: {}", discharged.admission.admission_code);
    println!("Bill: {}", discharged.bill.bill_code);
    println!("Billable days: {}", discharged.bill.billable_days);
    println!("Bed charges: {}", discharged.bill.bed_charges);
    println!("Total: {}", discharged.bill.total);
    println!("Released bed: {}", discharged.bed.label);
    Ok(())
}
