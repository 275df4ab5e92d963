use std::collections::VecDeque;
use std::sync::{Arc, Barrier, Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use frontdesk_backend::{Dataset, IdentityError, StoreError};
use frontdesk_core::{
    Admission, AdmissionId, Bed, BedId, BillId, BillingSummary, BusinessIdentifier, Clock, Doctor,
    FixedClock, IdentityHandle, IdentityMetadata, LoginAddress, NewAdmission, NewBed,
    NewBillingSummary, NewDoctor, NewIdentity, NewProfile, PatientId, Profile, ProfileId,
    ProfileStatus, Role, SequencePosition, Session,
};

use crate::traits::{DoctorRepository, IdentityProvider, ProfileRepository, WardRepository};

/// Failures queued against individual calls. Each one fires once.
#[derive(Default)]
struct Faults {
    create_identity: Option<IdentityError>,
    delete_identity: Option<IdentityError>,
    insert_profile: Option<StoreError>,
    delete_profile: Option<StoreError>,
    find_profile_by_id: Option<StoreError>,
    max_sort_order: Option<StoreError>,
    insert_doctor: VecDeque<StoreError>,
    insert_admission: Option<StoreError>,
    link_bed: Option<StoreError>,
    free_bed: Option<StoreError>,
    close_admission: Option<StoreError>,
    release_bed: Option<StoreError>,
}

/// In-memory store with the same constraints as the file backend, plus fault
/// injection and call counters.
pub struct MockBackend {
    data: Mutex<Dataset>,
    clock: FixedClock,
    faults: Mutex<Faults>,
    sequence_barrier: Option<Arc<Barrier>>,
    doctor_insert_attempts: Mutex<Vec<SequencePosition>>,
}

pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 9, 30, 0)
        .single()
        .expect("valid date")
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Mutex::new(Dataset::new()),
            clock: FixedClock::new(test_now()),
            faults: Mutex::new(Faults::default()),
            sequence_barrier: None,
            doctor_insert_attempts: Mutex::new(Vec::new()),
        }
    }

    /// Makes `max_sort_order` wait until `barrier` releases, so concurrent
    /// runs all read the same maximum before any of them inserts.
    #[must_use]
    pub fn with_sequence_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.sequence_barrier = Some(barrier);
        self
    }

    pub fn data(&self) -> MutexGuard<'_, Dataset> {
        self.data.lock().expect("mock data lock")
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().expect("mock fault lock")
    }

    pub fn fail_create_identity(&self, err: IdentityError) {
        self.faults().create_identity = Some(err);
    }

    pub fn fail_delete_identity(&self, err: IdentityError) {
        self.faults().delete_identity = Some(err);
    }

    pub fn fail_insert_profile(&self, err: StoreError) {
        self.faults().insert_profile = Some(err);
    }

    pub fn fail_delete_profile(&self, err: StoreError) {
        self.faults().delete_profile = Some(err);
    }

    pub fn fail_find_profile_by_id(&self, err: StoreError) {
        self.faults().find_profile_by_id = Some(err);
    }

    pub fn fail_max_sort_order(&self, err: StoreError) {
        self.faults().max_sort_order = Some(err);
    }

    /// Queues one failure per upcoming doctor insert.
    pub fn fail_insert_doctor(&self, err: StoreError) {
        self.faults().insert_doctor.push_back(err);
    }

    pub fn fail_insert_admission(&self, err: StoreError) {
        self.faults().insert_admission = Some(err);
    }

    /// Fails the next bed update that links an admission.
    pub fn fail_link_bed(&self, err: StoreError) {
        self.faults().link_bed = Some(err);
    }

    /// Fails the next bed update that marks a bed free.
    pub fn fail_free_bed(&self, err: StoreError) {
        self.faults().free_bed = Some(err);
    }

    pub fn fail_close_admission(&self, err: StoreError) {
        self.faults().close_admission = Some(err);
    }

    /// Fails the next bed update that frees a bed holding an admission.
    pub fn fail_release_bed(&self, err: StoreError) {
        self.faults().release_bed = Some(err);
    }

    /// Positions tried by every doctor insert that reached the store.
    pub fn doctor_insert_attempts(&self) -> Vec<SequencePosition> {
        self.doctor_insert_attempts
            .lock()
            .expect("mock attempts lock")
            .clone()
    }

    /// Seeds an identity, its profile and a doctor row at `position`.
    pub fn seed_doctor(&self, email: &str, position: u32) -> Doctor {
        let (handle, profile) = self.seed_profile(email, "Seeded Doctor");
        let now = self.clock.now();
        self.data()
            .insert_doctor(
                NewDoctor {
                    doctor_code: BusinessIdentifier::new(format!("DRSEED{position:04}")),
                    user_id: handle,
                    profile_id: profile.id,
                    specialization: "General Medicine".to_string(),
                    qualification: None,
                    registration_number: None,
                    consultation_fee: 30_000,
                    sessions: vec![Session::Morning],
                    sort_order: SequencePosition::new(position).expect("positive position"),
                },
                now,
            )
            .expect("seed doctor")
    }

    /// Seeds a doctor and soft-deletes it.
    pub fn seed_deleted_doctor(&self, email: &str, position: u32) -> Doctor {
        let doctor = self.seed_doctor(email, position);
        self.data()
            .set_doctor_deleted(&doctor.id, true)
            .expect("soft delete")
    }

    /// Seeds an identity and profile with no doctor row.
    pub fn seed_profile(&self, email: &str, full_name: &str) -> (IdentityHandle, Profile) {
        let address = LoginAddress::parse(email).expect("valid address");
        let now = self.clock.now();
        let mut data = self.data();
        let handle = data
            .create_identity(
                &NewIdentity {
                    address: address.clone(),
                    initial_secret: "Welcome@123".to_string(),
                    confirmed: true,
                    metadata: IdentityMetadata {
                        role: Role::Doctor,
                        full_name: full_name.to_string(),
                    },
                },
                now,
            )
            .expect("seed identity")
            .handle;
        let profile = data
            .insert_profile(
                NewProfile {
                    user_id: handle.clone(),
                    full_name: full_name.to_string(),
                    email: address,
                    phone: None,
                    role: Role::Doctor,
                    status: ProfileStatus::Active,
                    capabilities: Vec::new(),
                    employee_code: None,
                },
                now,
            )
            .expect("seed profile");
        (handle, profile)
    }

    pub fn seed_bed(&self, label: &str, daily_rate: u64) -> Bed {
        self.data()
            .insert_bed(NewBed {
                ward: "General".to_string(),
                label: label.to_string(),
                daily_rate,
            })
            .expect("seed bed")
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for MockBackend {
    fn create_identity(&self, request: &NewIdentity) -> Result<IdentityHandle, IdentityError> {
        if let Some(err) = self.faults().create_identity.take() {
            return Err(err);
        }
        let now = self.clock.now();
        self.data()
            .create_identity(request, now)
            .map(|record| record.handle)
    }

    fn delete_identity(&self, handle: &IdentityHandle) -> Result<(), IdentityError> {
        if let Some(err) = self.faults().delete_identity.take() {
            return Err(err);
        }
        self.data().delete_identity(handle)
    }
}

impl ProfileRepository for MockBackend {
    fn find_profile_by_email(&self, email: &LoginAddress) -> Result<Option<Profile>, StoreError> {
        Ok(self.data().profile_by_email(email).cloned())
    }

    fn find_profile_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        if let Some(err) = self.faults().find_profile_by_id.take() {
            return Err(err);
        }
        Ok(self.data().profile_by_id(id).cloned())
    }

    fn addresses_with_prefix(
        &self,
        base: &str,
        domain: &str,
        limit: usize,
    ) -> Result<Vec<LoginAddress>, StoreError> {
        Ok(self.data().addresses_with_prefix(base, domain, limit))
    }

    fn insert_profile(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        if let Some(err) = self.faults().insert_profile.take() {
            return Err(err);
        }
        let now = self.clock.now();
        self.data().insert_profile(profile, now)
    }

    fn delete_profile(&self, id: &ProfileId) -> Result<(), StoreError> {
        if let Some(err) = self.faults().delete_profile.take() {
            return Err(err);
        }
        self.data().delete_profile(id)
    }
}

impl DoctorRepository for MockBackend {
    fn find_doctor_by_user_id(
        &self,
        user_id: &IdentityHandle,
    ) -> Result<Option<Doctor>, StoreError> {
        Ok(self.data().doctor_by_user_id(user_id).cloned())
    }

    fn max_sort_order(&self) -> Result<Option<SequencePosition>, StoreError> {
        if let Some(err) = self.faults().max_sort_order.take() {
            return Err(err);
        }
        let max = self.data().max_doctor_sort_order();
        if let Some(barrier) = &self.sequence_barrier {
            barrier.wait();
        }
        Ok(max)
    }

    fn insert_doctor(&self, doctor: NewDoctor) -> Result<Doctor, StoreError> {
        self.doctor_insert_attempts
            .lock()
            .expect("mock attempts lock")
            .push(doctor.sort_order);
        if let Some(err) = self.faults().insert_doctor.pop_front() {
            return Err(err);
        }
        let now = self.clock.now();
        self.data().insert_doctor(doctor, now)
    }

    fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        Ok(self.data().doctors_in_order().into_iter().cloned().collect())
    }
}

impl WardRepository for MockBackend {
    fn insert_bed(&self, bed: NewBed) -> Result<Bed, StoreError> {
        self.data().insert_bed(bed)
    }

    fn find_bed_by_label(&self, label: &str) -> Result<Option<Bed>, StoreError> {
        Ok(self.data().bed_by_label(label).cloned())
    }

    fn find_bed_by_id(&self, id: &BedId) -> Result<Option<Bed>, StoreError> {
        Ok(self.data().bed_by_id(id).cloned())
    }

    fn list_beds(&self) -> Result<Vec<Bed>, StoreError> {
        Ok(self.data().beds().into_iter().cloned().collect())
    }

    fn set_bed_state(
        &self,
        id: &BedId,
        occupied: bool,
        current_admission: Option<AdmissionId>,
    ) -> Result<Bed, StoreError> {
        {
            let mut faults = self.faults();
            let fault = if current_admission.is_some() {
                faults.link_bed.take()
            } else if occupied {
                None
            } else {
                let holds_admission = self
                    .data()
                    .bed_by_id(id)
                    .is_some_and(|bed| bed.current_admission.is_some());
                if holds_admission {
                    faults.release_bed.take()
                } else {
                    faults.free_bed.take()
                }
            };
            if let Some(err) = fault {
                return Err(err);
            }
        }
        self.data().set_bed_state(id, occupied, current_admission)
    }

    fn insert_admission(&self, admission: NewAdmission) -> Result<Admission, StoreError> {
        if let Some(err) = self.faults().insert_admission.take() {
            return Err(err);
        }
        self.data().insert_admission(admission)
    }

    fn find_admission_by_code(
        &self,
        code: &BusinessIdentifier,
    ) -> Result<Option<Admission>, StoreError> {
        Ok(self.data().admission_by_code(code).cloned())
    }

    fn find_open_admission(&self, patient: &PatientId) -> Result<Option<Admission>, StoreError> {
        Ok(self.data().open_admission_for_patient(patient).cloned())
    }

    fn set_admission_discharged(
        &self,
        id: &AdmissionId,
        discharged_at: Option<DateTime<Utc>>,
    ) -> Result<Admission, StoreError> {
        if discharged_at.is_some() {
            if let Some(err) = self.faults().close_admission.take() {
                return Err(err);
            }
        }
        self.data().set_admission_discharged(id, discharged_at)
    }

    fn delete_admission(&self, id: &AdmissionId) -> Result<(), StoreError> {
        self.data().delete_admission(id)
    }

    fn insert_bill(&self, bill: NewBillingSummary) -> Result<BillingSummary, StoreError> {
        let now = self.clock.now();
        self.data().insert_bill(bill, now)
    }

    fn delete_bill(&self, id: &BillId) -> Result<(), StoreError> {
        self.data().delete_bill(id)
    }
}

/// Shorthand for a sort-position collision as the store reports it.
pub fn sort_order_taken(position: u32) -> StoreError {
    StoreError::unique_violation("doctors", "sort_order", &position.to_string())
}
