use frontdesk_backend::StoreError;
use frontdesk_core::{Doctor, IdentityHandle, NewDoctor, SequencePosition};

pub trait DoctorRepository: Send + Sync {
    /// Any doctor row for the identity, soft-deleted rows included.
    fn find_doctor_by_user_id(&self, user_id: &IdentityHandle)
    -> Result<Option<Doctor>, StoreError>;

    /// Highest sort position among live doctors, `None` when there are none.
    fn max_sort_order(&self) -> Result<Option<SequencePosition>, StoreError>;

    /// # Errors
    ///
    /// A taken position is reported as a unique violation naming
    /// `sort_order`; the constraint also covers soft-deleted rows.
    fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError>;

    /// Live doctors in display order.
    fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError>;
}
