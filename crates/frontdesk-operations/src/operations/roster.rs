use std::sync::Arc;

use frontdesk_backend::StoreError;
use frontdesk_core::{Bed, DoctorProfileView, NewBed};
use tracing::info;

use crate::Result;
use crate::traits::{DoctorRepository, ProfileRepository, WardRepository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBedInput {
    pub ward: String,
    pub label: String,
    /// In minor currency units.
    pub daily_rate: u64,
}

/// Read-mostly views over doctors and beds, plus bed registration.
pub struct RosterOperation<P, D, W> {
    profiles: Arc<P>,
    doctors: Arc<D>,
    ward: Arc<W>,
}

impl<P, D, W> RosterOperation<P, D, W>
where
    P: ProfileRepository,
    D: DoctorRepository,
    W: WardRepository,
{
    pub fn new(profiles: Arc<P>, doctors: Arc<D>, ward: Arc<W>) -> Self {
        Self {
            profiles,
            doctors,
            ward,
        }
    }

    /// Live doctors in display order, joined with their profiles.
    pub fn list_doctors(&self) -> Result<Vec<DoctorProfileView>> {
        self.doctors
            .list_doctors()?
            .into_iter()
            .map(|doctor| {
                let profile = self
                    .profiles
                    .find_profile_by_id(&doctor.profile_id)?
                    .ok_or_else(|| {
                        StoreError::not_found("profiles", &format!("id = {}", doctor.profile_id))
                    })?;
                Ok(DoctorProfileView::join(&profile, doctor))
            })
            .collect()
    }

    /// # Errors
    ///
    /// Fails with a store error naming `label` if another bed uses it.
    pub fn add_bed(&self, input: AddBedInput) -> Result<Bed> {
        let bed = self.ward.insert_bed(NewBed {
            ward: input.ward,
            label: input.label,
            daily_rate: input.daily_rate,
        })?;
        info!(bed = %bed.label, ward = %bed.ward, daily_rate = bed.daily_rate, "bed added");
        Ok(bed)
    }

    pub fn list_beds(&self) -> Result<Vec<Bed>> {
        Ok(self.ward.list_beds()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OperationError;
    use crate::mocks::MockBackend;

    fn roster(backend: &Arc<MockBackend>) -> RosterOperation<MockBackend, MockBackend, MockBackend> {
        RosterOperation::new(
            Arc::clone(backend),
            Arc::clone(backend),
            Arc::clone(backend),
        )
    }

    #[test]
    fn doctors_are_listed_in_sort_order_with_profile_fields() {
        let backend = Arc::new(MockBackend::new());
        backend.seed_doctor("b@x.test", 2);
        backend.seed_doctor("a@x.test", 1);

        let doctors = roster(&backend).list_doctors().expect("list");

        let emails: Vec<&str> = doctors.iter().map(|view| view.email.as_str()).collect();
        assert_eq!(emails, ["a@x.test", "b@x.test"]);
        assert_eq!(doctors[0].full_name, "Seeded Doctor");
    }

    #[test]
    fn duplicate_bed_label_is_a_store_error() {
        let backend = Arc::new(MockBackend::new());
        let roster = roster(&backend);
        let input = AddBedInput {
            ward: "ICU".to_string(),
            label: "ICU-1".to_string(),
            daily_rate: 500_000,
        };
        roster.add_bed(input.clone()).expect("first bed");

        let err = roster.add_bed(input).expect_err("duplicate");

        assert!(matches!(err, OperationError::Store(ref e) if e.names_column("label")));
        assert_eq!(roster.list_beds().expect("list").len(), 1);
    }
}
