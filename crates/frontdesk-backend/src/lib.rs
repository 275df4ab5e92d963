//! Backing-store contract for the front desk and a local implementation.
//!
//! The hosted store offers per-row unique and foreign-key constraints and no
//! cross-table transactions. [`Dataset`] reproduces exactly that: every
//! mutation checks its own constraints and fails with a [`StoreError`] whose
//! code and detail match what a PostgreSQL-backed client reports.
//! [`FileBackend`] persists a dataset as one JSON document.

mod dataset;
mod error;
mod file;

pub use dataset::{Dataset, IdentityRecord};
pub use error::{IdentityError, StoreError, StoreErrorCode};
pub use file::FileBackend;

pub type Result<T> = std::result::Result<T, StoreError>;

pub(crate) fn new_row_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
