mod doctors;
mod ward;

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use frontdesk_config::FrontdeskConfig;
use frontdesk_core::{Clock, Session, SystemClock};
use frontdesk_operations::providers::FileStore;

use crate::error::{CliError, Result};

/// Shared state for one command invocation.
pub(crate) struct Context {
    config: FrontdeskConfig,
    store: Arc<FileStore>,
    clock: Arc<dyn Clock>,
}

impl Context {
    pub(crate) fn open(config: FrontdeskConfig, data_dir: &Path) -> Result<Self> {
        let store = FileStore::open(data_dir).map_err(|source| CliError::DataDir {
            path: data_dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            config,
            store: Arc::new(store),
            clock: Arc::new(SystemClock),
        })
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Onboard a doctor: login account, profile and doctor record
    OnboardDoctor(OnboardArgs),
    /// List doctors in display order
    ListDoctors,
    /// Register a bed in a ward
    AddBed(AddBedArgs),
    /// List beds and their occupancy
    ListBeds,
    /// Admit a patient to a free bed
    Admit(AdmitArgs),
    /// Discharge an admission and write its billing summary
    Discharge(DischargeArgs),
}

#[derive(Args)]
pub(crate) struct OnboardArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Login address (default: synthesized from the name)
    #[arg(long = "login-address")]
    login_address: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    specialization: String,

    #[arg(long)]
    qualification: Option<String>,

    /// Medical council registration number
    #[arg(long = "registration-number")]
    registration_number: Option<String>,

    /// Consultation fee in minor currency units
    #[arg(long, default_value_t = 0)]
    fee: u64,

    /// Consultation session (repeatable)
    #[arg(long = "session", value_enum)]
    sessions: Vec<Session>,
}

#[derive(Args)]
pub(crate) struct AddBedArgs {
    #[arg(long)]
    ward: String,

    /// Unique bed label
    #[arg(long)]
    label: String,

    /// Daily rate in minor currency units
    #[arg(long = "daily-rate")]
    daily_rate: u64,
}

#[derive(Args)]
pub(crate) struct AdmitArgs {
    /// Patient reference
    #[arg(long)]
    patient: String,

    /// Bed label
    #[arg(long)]
    bed: String,
}

#[derive(Args)]
pub(crate) struct DischargeArgs {
    /// Admission code printed by `admit`
    admission_code: String,

    /// Discharge time as RFC 3339 (default: now)
    #[arg(long, value_parser = parse_timestamp)]
    at: Option<DateTime<Utc>>,
}

fn parse_timestamp(raw: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|at| at.with_timezone(&Utc))
}

impl Commands {
    pub(crate) fn execute(self, context: &Context) -> Result<()> {
        match self {
            Self::OnboardDoctor(args) => doctors::onboard(args, context),
            Self::ListDoctors => doctors::list(context),
            Self::AddBed(args) => ward::add_bed(args, context),
            Self::ListBeds => ward::list_beds(context),
            Self::Admit(args) => ward::admit(args, context),
            Self::Discharge(args) => ward::discharge(args, context),
        }
    }
}
