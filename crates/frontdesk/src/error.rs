use std::path::PathBuf;

use frontdesk_backend::StoreError;
use frontdesk_config::ConfigError;
use frontdesk_operations::OperationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("could not determine the current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("configuration error")]
    Config(#[from] ConfigError),

    #[error("could not open the data directory '{path}'")]
    DataDir {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error("doctor onboarding failed")]
    Onboard(#[source] OperationError),

    #[error("roster command failed")]
    Roster(#[source] OperationError),

    #[error("admission failed")]
    Admit(#[source] OperationError),

    #[error("discharge failed")]
    Discharge(#[source] OperationError),
}

pub type Result<T> = std::result::Result<T, CliError>;
