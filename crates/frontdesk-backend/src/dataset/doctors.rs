use chrono::{DateTime, Utc};
use frontdesk_core::{Doctor, DoctorId, IdentityHandle, NewDoctor, SequencePosition};

use super::Dataset;
use crate::Result;
use crate::error::StoreError;

const TABLE: &str = "doctors";

impl Dataset {
    /// Any doctor row for this identity, soft-deleted rows included.
    #[must_use]
    pub fn doctor_by_user_id(&self, user_id: &IdentityHandle) -> Option<&Doctor> {
        self.doctors.iter().find(|doctor| &doctor.user_id == user_id)
    }

    #[must_use]
    pub fn doctor_by_id(&self, id: &DoctorId) -> Option<&Doctor> {
        self.doctors.iter().find(|doctor| &doctor.id == id)
    }

    /// Highest sort position among doctors that are not soft-deleted.
    #[must_use]
    pub fn max_doctor_sort_order(&self) -> Option<SequencePosition> {
        self.doctors
            .iter()
            .filter(|doctor| !doctor.is_deleted)
            .map(|doctor| doctor.sort_order)
            .max()
    }

    /// Live doctors in display order.
    #[must_use]
    pub fn doctors_in_order(&self) -> Vec<&Doctor> {
        let mut doctors: Vec<&Doctor> = self.doctors.iter().filter(|d| !d.is_deleted).collect();
        doctors.sort_by_key(|doctor| doctor.sort_order);
        doctors
    }

    /// # Errors
    ///
    /// Fails with a foreign-key violation if the profile does not exist, or a
    /// unique violation on `doctor_code`, `sort_order` or `registration_number`.
    /// The `sort_order` constraint covers soft-deleted rows too.
    pub fn insert_doctor(&mut self, new: NewDoctor, now: DateTime<Utc>) -> Result<Doctor> {
        if self.profile_by_id(&new.profile_id).is_none() {
            return Err(StoreError::foreign_key_violation(
                TABLE,
                "profile_id",
                new.profile_id.as_str(),
                "profiles",
            ));
        }
        if self
            .doctors
            .iter()
            .any(|doctor| doctor.doctor_code == new.doctor_code)
        {
            return Err(StoreError::unique_violation(
                TABLE,
                "doctor_code",
                new.doctor_code.as_str(),
            ));
        }
        if self
            .doctors
            .iter()
            .any(|doctor| doctor.sort_order == new.sort_order)
        {
            return Err(StoreError::unique_violation(
                TABLE,
                "sort_order",
                &new.sort_order.to_string(),
            ));
        }
        if let Some(registration) = &new.registration_number {
            if self
                .doctors
                .iter()
                .any(|doctor| doctor.registration_number.as_ref() == Some(registration))
            {
                return Err(StoreError::unique_violation(
                    TABLE,
                    "registration_number",
                    registration,
                ));
            }
        }

        let doctor = Doctor {
            id: DoctorId::new(crate::new_row_id()),
            doctor_code: new.doctor_code,
            user_id: new.user_id,
            profile_id: new.profile_id,
            specialization: new.specialization,
            qualification: new.qualification,
            registration_number: new.registration_number,
            consultation_fee: new.consultation_fee,
            sessions: new.sessions,
            sort_order: new.sort_order,
            is_deleted: false,
            created_at: now,
        };
        self.doctors.push(doctor.clone());
        Ok(doctor)
    }

    /// Flags a doctor as soft-deleted. No command deletes doctors; rows
    /// flagged here stand in for ones removed outside the front desk.
    ///
    /// # Errors
    ///
    /// Fails with not-found if no doctor has this id.
    pub fn set_doctor_deleted(&mut self, id: &DoctorId, deleted: bool) -> Result<Doctor> {
        let doctor = self
            .doctors
            .iter_mut()
            .find(|doctor| &doctor.id == id)
            .ok_or_else(|| StoreError::not_found(TABLE, &format!("id = {id}")))?;
        doctor.is_deleted = deleted;
        Ok(doctor.clone())
    }

    #[must_use]
    pub fn doctors(&self) -> &[Doctor] {
        &self.doctors
    }
}
