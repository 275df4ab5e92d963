use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use frontdesk_config::{BillingConfig, ProvisioningConfig};
use frontdesk_core::{Clock, FixedClock, PatientId, Session};
use frontdesk_operations::OperationError;
use frontdesk_operations::operations::admission::{
    AdmitInput, AdmitPatientOperation, DischargeInput, DischargeOperation,
};
use frontdesk_operations::operations::onboard::{OnboardDoctorInput, OnboardDoctorOperation};
use frontdesk_operations::operations::{AddBedInput, RosterOperation};
use frontdesk_operations::providers::FileStore;

fn clock() -> Result<Arc<dyn Clock>> {
    let now = Utc
        .with_ymd_and_hms(2024, 3, 9, 9, 30, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("invalid date"))?;
    Ok(Arc::new(FixedClock::new(now)))
}

fn doctor(full_name: &str) -> OnboardDoctorInput {
    OnboardDoctorInput {
        full_name: full_name.to_string(),
        specialization: "Paediatrics".to_string(),
        consultation_fee: 45_000,
        sessions: vec![Session::Afternoon],
        ..OnboardDoctorInput::default()
    }
}

#[test]
fn onboarding_persists_across_store_instances() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let clock = clock()?;
    let store = Arc::new(FileStore::open(dir.path())?.with_clock(Arc::clone(&clock)));
    let operation = OnboardDoctorOperation::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&clock),
        ProvisioningConfig::default().with_login_domain("x.test"),
    );

    let first = operation.execute(&doctor("Asha Rao"))?;
    let second = operation.execute(&doctor("Asha Iyer"))?;

    assert_eq!(first.doctor.email.as_str(), "asha0001@x.test");
    assert_eq!(second.doctor.email.as_str(), "asha0002@x.test");

    let reopened = Arc::new(FileStore::open(dir.path())?);
    let roster = RosterOperation::new(
        Arc::clone(&reopened),
        Arc::clone(&reopened),
        Arc::clone(&reopened),
    );
    let positions: Vec<u32> = roster
        .list_doctors()?
        .iter()
        .map(|view| view.doctor.sort_order.get())
        .collect();
    assert_eq!(positions, [1, 2]);
    Ok(())
}

#[test]
fn rolled_back_onboarding_leaves_no_rows_on_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let clock = clock()?;
    let store = Arc::new(FileStore::open(dir.path())?);
    let operation = OnboardDoctorOperation::new(
        Arc::clone(&store),
        Arc::clone(&store),
        Arc::clone(&store),
        clock,
        ProvisioningConfig::default(),
    );
    let licensed = |name: &str| OnboardDoctorInput {
        registration_number: Some("TNMC-101".to_string()),
        ..doctor(name)
    };
    operation.execute(&licensed("Asha Rao"))?;

    let err = operation
        .execute(&licensed("Ravi Menon"))
        .expect_err("license already registered");

    assert!(matches!(err, OperationError::DuplicateLicenseNumber { .. }));
    let rows = store.backend().read(|data| {
        (
            data.identities().len(),
            data.profiles().len(),
            data.doctors().len(),
        )
    })?;
    assert_eq!(rows, (1, 1, 1));
    Ok(())
}

#[test]
fn admission_and_discharge_round_trip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let clock = clock()?;
    let store = Arc::new(FileStore::open(dir.path())?.with_clock(Arc::clone(&clock)));
    RosterOperation::new(Arc::clone(&store), Arc::clone(&store), Arc::clone(&store)).add_bed(
        AddBedInput {
            ward: "General".to_string(),
            label: "G-07".to_string(),
            daily_rate: 120_000,
        },
    )?;

    let admitted = AdmitPatientOperation::new(
        Arc::clone(&store),
        Arc::clone(&clock),
        BillingConfig::default(),
    )
    .execute(&AdmitInput {
        patient: PatientId::new("pt-42"),
        bed_label: "G-07".to_string(),
    })?;
    let discharged = DischargeOperation::new(Arc::clone(&store), clock, BillingConfig::default())
        .execute(&DischargeInput {
            admission_code: admitted.admission.admission_code.clone(),
            at: Some(admitted.admission.admitted_at + Duration::hours(30)),
        })?;

    assert_eq!(discharged.bill.billable_days, 2);
    assert_eq!(discharged.bill.total, 240_000);
    let bed_free = store
        .backend()
        .read(|data| data.bed_by_label("G-07").is_some_and(|bed| bed.is_free()))?;
    assert!(bed_free);
    Ok(())
}
