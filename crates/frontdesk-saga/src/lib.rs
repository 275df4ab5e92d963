//! Compensating sagas for operations that span rows with no shared transaction.
//!
//! A saga is an ordered list of steps. Each step consumes the previous step's
//! output and produces its own. When a step fails, every step that already
//! completed is compensated in reverse order, and each compensation receives
//! the output its step produced, which is the record of what that step
//! created.

mod audit;
mod builder;
mod cloneable;
mod erased;
mod error;
mod saga;
mod step;

pub use audit::{SagaAuditLog, StepRecord, StepStatus};
pub use builder::SagaBuilder;
pub use error::{CompensationError, SagaError};
pub use saga::Saga;
pub use step::SagaStep;
