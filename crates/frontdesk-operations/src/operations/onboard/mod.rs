//! Doctor onboarding.
//!
//! Runs as a saga of four steps:
//!
//! 1. `generate_identifiers`: doctor code, employee code and login address.
//! 2. `resolve_identity`: reuse the account for the address or provision a
//!    new identity and profile. The only step with a compensation, and it
//!    only deletes what this run created.
//! 3. `allocate_sequence`: propose the next sort position.
//! 4. `insert_doctor`: insert the doctor row, moving to the next position
//!    when another run took the proposed one.
//!
//! The confirmation read happens after the saga and is never compensated.

mod context;
mod operation;
mod saga_data;
mod saga_steps;

pub use context::OnboardSagaContext;
pub use operation::{DoctorOnboarded, OnboardDoctorOperation};
pub use saga_data::OnboardDoctorInput;
