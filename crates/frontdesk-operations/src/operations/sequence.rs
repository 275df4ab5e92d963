use frontdesk_core::SequencePosition;
use tracing::debug;

use crate::Result;
use crate::error::OperationError;
use crate::traits::DoctorRepository;

/// Proposes the next dense display position for a doctor.
///
/// The proposal is only a guess: two runs that read the same maximum propose
/// the same position and the store's unique constraint decides.
pub struct SequenceAllocator<'a, D> {
    doctors: &'a D,
}

impl<'a, D: DoctorRepository> SequenceAllocator<'a, D> {
    pub fn new(doctors: &'a D) -> Self {
        Self { doctors }
    }

    /// `max + 1` over live doctors, or [`SequencePosition::FIRST`] when there
    /// are none.
    pub fn next_position(&self) -> Result<SequencePosition> {
        let max = self
            .doctors
            .max_sort_order()
            .map_err(OperationError::SequenceQueryFailed)?;
        let next = max.map_or(SequencePosition::FIRST, SequencePosition::next);
        debug!(current_max = ?max.map(SequencePosition::get), next = %next, "proposed sort position");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use frontdesk_backend::StoreError;

    use super::*;
    use crate::mocks::MockBackend;

    #[test]
    fn first_doctor_gets_position_one() {
        let backend = MockBackend::new();

        let next = SequenceAllocator::new(&backend)
            .next_position()
            .expect("allocate");

        assert_eq!(next, SequencePosition::FIRST);
    }

    #[test]
    fn proposes_one_past_the_maximum() {
        let backend = MockBackend::new();
        backend.seed_doctor("a@x.test", 1);
        backend.seed_doctor("b@x.test", 4);

        let next = SequenceAllocator::new(&backend)
            .next_position()
            .expect("allocate");

        assert_eq!(next.get(), 5);
    }

    #[test]
    fn read_failure_is_a_query_error() {
        let backend = MockBackend::new();
        backend.fail_max_sort_order(StoreError::unavailable("timeout"));

        let err = SequenceAllocator::new(&backend)
            .next_position()
            .expect_err("fails");

        assert!(matches!(err, OperationError::SequenceQueryFailed(_)));
    }
}
