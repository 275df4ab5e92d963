use chrono::{DateTime, Utc};
use frontdesk_backend::StoreError;
use frontdesk_core::{
    Admission, AdmissionId, Bed, BedId, BillId, BillingSummary, BusinessIdentifier, NewAdmission,
    NewBed, NewBillingSummary, PatientId,
};

/// Beds, admissions and billing summaries.
pub trait WardRepository: Send + Sync {
    fn insert_bed(&self, bed: NewBed) -> Result<Bed, StoreError>;

    fn find_bed_by_label(&self, label: &str) -> Result<Option<Bed>, StoreError>;

    fn find_bed_by_id(&self, id: &BedId) -> Result<Option<Bed>, StoreError>;

    /// Beds ordered by ward, then label.
    fn list_beds(&self) -> Result<Vec<Bed>, StoreError>;

    fn set_bed_state(
        &self,
        id: &BedId,
        occupied: bool,
        current_admission: Option<AdmissionId>,
    ) -> Result<Bed, StoreError>;

    fn insert_admission(&self, admission: NewAdmission) -> Result<Admission, StoreError>;

    fn find_admission_by_code(
        &self,
        code: &BusinessIdentifier,
    ) -> Result<Option<Admission>, StoreError>;

    fn find_open_admission(&self, patient: &PatientId) -> Result<Option<Admission>, StoreError>;

    fn set_admission_discharged(
        &self,
        id: &AdmissionId,
        discharged_at: Option<DateTime<Utc>>,
    ) -> Result<Admission, StoreError>;

    /// Refused while a bill or a bed still references the admission.
    fn delete_admission(&self, id: &AdmissionId) -> Result<(), StoreError>;

    /// A second bill for the same admission is a unique violation naming
    /// `admission_id`.
    fn insert_bill(&self, bill: NewBillingSummary) -> Result<BillingSummary, StoreError>;

    fn delete_bill(&self, id: &BillId) -> Result<(), StoreError>;
}
