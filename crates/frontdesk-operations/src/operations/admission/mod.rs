//! Bed admission and discharge.
//!
//! Admission reserves a bed, locates or creates the patient's admission and
//! links the two. Discharge bills the stay, closes the admission and frees
//! the bed. Both run as sagas, so a failure part way leaves the bed and the
//! admission as they were.

macro_rules! ward_step {
    ($name:ident) => {
        pub struct $name<W> {
            _marker: std::marker::PhantomData<W>,
        }

        impl<W> $name<W> {
            #[must_use]
            pub fn new() -> Self {
                Self {
                    _marker: std::marker::PhantomData,
                }
            }
        }

        impl<W> Default for $name<W> {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

mod admit_steps;
mod context;
mod discharge_steps;
mod operation;
mod saga_data;

pub use context::WardSagaContext;
pub use operation::{AdmitPatientOperation, DischargeOperation, billable_days};
pub use saga_data::{AdmitInput, Admitted, DischargeInput, Discharged};
