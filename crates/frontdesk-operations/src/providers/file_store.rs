use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use frontdesk_backend::{FileBackend, IdentityError, StoreError};
use frontdesk_core::{
    Admission, AdmissionId, Bed, BedId, BillId, BillingSummary, BusinessIdentifier, Clock, Doctor,
    IdentityHandle, LoginAddress, NewAdmission, NewBed, NewBillingSummary, NewDoctor, NewIdentity,
    NewProfile, PatientId, Profile, ProfileId, SequencePosition, SystemClock,
};

use crate::traits::{DoctorRepository, IdentityProvider, ProfileRepository, WardRepository};

/// Every repository and the identity provider, backed by one JSON data file.
pub struct FileStore {
    backend: FileBackend,
    clock: Arc<dyn Clock>,
}

impl FileStore {
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            backend: FileBackend::open(data_dir)?,
            clock: Arc::new(SystemClock),
        })
    }

    /// Timestamps rows with `clock` instead of the system time.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn backend(&self) -> &FileBackend {
        &self.backend
    }
}

impl IdentityProvider for FileStore {
    fn create_identity(&self, request: &NewIdentity) -> Result<IdentityHandle, IdentityError> {
        let now = self.clock.now();
        self.backend
            .write(|data| data.create_identity(request, now))
            .map(|record| record.handle)
    }

    fn delete_identity(&self, handle: &IdentityHandle) -> Result<(), IdentityError> {
        self.backend.write(|data| data.delete_identity(handle))
    }
}

impl ProfileRepository for FileStore {
    fn find_profile_by_email(&self, email: &LoginAddress) -> Result<Option<Profile>, StoreError> {
        self.backend
            .read(|data| data.profile_by_email(email).cloned())
    }

    fn find_profile_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        self.backend.read(|data| data.profile_by_id(id).cloned())
    }

    fn addresses_with_prefix(
        &self,
        base: &str,
        domain: &str,
        limit: usize,
    ) -> Result<Vec<LoginAddress>, StoreError> {
        self.backend
            .read(|data| data.addresses_with_prefix(base, domain, limit))
    }

    fn insert_profile(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        let now = self.clock.now();
        self.backend.write(|data| data.insert_profile(profile, now))
    }

    fn delete_profile(&self, id: &ProfileId) -> Result<(), StoreError> {
        self.backend.write(|data| data.delete_profile(id))
    }
}

impl DoctorRepository for FileStore {
    fn find_doctor_by_user_id(
        &self,
        user_id: &IdentityHandle,
    ) -> Result<Option<Doctor>, StoreError> {
        self.backend
            .read(|data| data.doctor_by_user_id(user_id).cloned())
    }

    fn max_sort_order(&self) -> Result<Option<SequencePosition>, StoreError> {
        self.backend.read(|data| data.max_doctor_sort_order())
    }

    fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        let now = self.clock.now();
        self.backend.write(|data| data.insert_doctor(doctor, now))
    }

    fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        self.backend
            .read(|data| data.doctors_in_order().into_iter().cloned().collect())
    }
}

impl WardRepository for FileStore {
    fn insert_bed(&self, bed: NewBed) -> Result<Bed, StoreError> {
        self.backend.write(|data| data.insert_bed(bed))
    }

    fn find_bed_by_label(&self, label: &str) -> Result<Option<Bed>, StoreError> {
        self.backend.read(|data| data.bed_by_label(label).cloned())
    }

    fn find_bed_by_id(&self, id: &BedId) -> Result<Option<Bed>, StoreError> {
        self.backend.read(|data| data.bed_by_id(id).cloned())
    }

    fn list_beds(&self) -> Result<Vec<Bed>, StoreError> {
        self.backend
            .read(|data| data.beds().into_iter().cloned().collect())
    }

    fn set_bed_state(
        &self,
        id: &BedId,
        occupied: bool,
        current_admission: Option<AdmissionId>,
    ) -> Result<Bed, StoreError> {
        self.backend
            .write(|data| data.set_bed_state(id, occupied, current_admission))
    }

    fn insert_admission(&self, admission: NewAdmission) -> Result<Admission, StoreError> {
        self.backend.write(|data| data.insert_admission(admission))
    }

    fn find_admission_by_code(
        &self,
        code: &BusinessIdentifier,
    ) -> Result<Option<Admission>, StoreError> {
        self.backend
            .read(|data| data.admission_by_code(code).cloned())
    }

    fn find_open_admission(&self, patient: &PatientId) -> Result<Option<Admission>, StoreError> {
        self.backend
            .read(|data| data.open_admission_for_patient(patient).cloned())
    }

    fn set_admission_discharged(
        &self,
        id: &AdmissionId,
        discharged_at: Option<DateTime<Utc>>,
    ) -> Result<Admission, StoreError> {
        self.backend
            .write(|data| data.set_admission_discharged(id, discharged_at))
    }

    fn delete_admission(&self, id: &AdmissionId) -> Result<(), StoreError> {
        self.backend.write(|data| data.delete_admission(id))
    }

    fn insert_bill(&self, bill: NewBillingSummary) -> Result<BillingSummary, StoreError> {
        let now = self.clock.now();
        self.backend.write(|data| data.insert_bill(bill, now))
    }

    fn delete_bill(&self, id: &BillId) -> Result<(), StoreError> {
        self.backend.write(|data| data.delete_bill(id))
    }
}
