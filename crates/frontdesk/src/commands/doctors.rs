use std::sync::Arc;

use clap::ValueEnum;
use frontdesk_core::Session;
use frontdesk_operations::operations::RosterOperation;
use frontdesk_operations::operations::onboard::{OnboardDoctorInput, OnboardDoctorOperation};

use super::{Context, OnboardArgs};
use crate::error::{CliError, Result};

pub(super) fn onboard(args: OnboardArgs, context: &Context) -> Result<()> {
    let operation = OnboardDoctorOperation::new(
        Arc::clone(&context.store),
        Arc::clone(&context.store),
        Arc::clone(&context.store),
        Arc::clone(&context.clock),
        context.config.provisioning().clone(),
    );

    let input = OnboardDoctorInput {
        full_name: args.name,
        login_address: args.login_address,
        phone: args.phone,
        specialization: args.specialization,
        qualification: args.qualification,
        registration_number: args.registration_number,
        consultation_fee: args.fee,
        sessions: args.sessions,
    };
    let onboarded = operation.execute(&input).map_err(CliError::Onboard)?;
    let view = &onboarded.doctor;

    println!("Onboarded doctor: {}", view.doctor.doctor_code);
    println!("Name: {}", view.full_name);
    println!("Login address: {}", view.email);
    if let Some(code) = &view.employee_code {
        println!("Employee code: {code}");
    }
    println!("Sort position: {}", view.doctor.sort_order);
    if onboarded.reused_profile {
        println!("Reused existing profile");
    }
    Ok(())
}

pub(super) fn list(context: &Context) -> Result<()> {
    let roster = RosterOperation::new(
        Arc::clone(&context.store),
        Arc::clone(&context.store),
        Arc::clone(&context.store),
    );
    let doctors = roster.list_doctors().map_err(CliError::Roster)?;

    if doctors.is_empty() {
        println!("No doctors onboarded.");
        return Ok(());
    }

    for view in &doctors {
        println!(
            "{:>4}  {}  {}  <{}>  {}  [{}]",
            view.doctor.sort_order,
            view.doctor.doctor_code,
            view.full_name,
            view.email,
            view.doctor.specialization,
            session_names(&view.doctor.sessions),
        );
    }
    Ok(())
}

fn session_names(sessions: &[Session]) -> String {
    sessions
        .iter()
        .filter_map(<Session as ValueEnum>::to_possible_value)
        .map(|value| value.get_name().to_owned())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_use_their_flag_names() {
        assert_eq!(
            session_names(&[Session::Morning, Session::Evening]),
            "morning, evening"
        );
        assert_eq!(session_names(&[]), "");
    }
}
