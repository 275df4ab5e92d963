use chrono::{DateTime, Utc};
use frontdesk_core::{
    Admission, AdmissionId, Bed, BedId, BillId, BillingSummary, BusinessIdentifier, NewAdmission,
    NewBed, NewBillingSummary, PatientId,
};

use super::Dataset;
use crate::Result;
use crate::error::StoreError;

const BEDS: &str = "beds";
const ADMISSIONS: &str = "admissions";
const BILLS: &str = "bills";

impl Dataset {
    /// # Errors
    ///
    /// Fails with a unique violation if another bed already uses the label.
    pub fn insert_bed(&mut self, new: NewBed) -> Result<Bed> {
        if self.bed_by_label(&new.label).is_some() {
            return Err(StoreError::unique_violation(BEDS, "label", &new.label));
        }
        let bed = Bed {
            id: BedId::new(crate::new_row_id()),
            ward: new.ward,
            label: new.label,
            daily_rate: new.daily_rate,
            occupied: false,
            current_admission: None,
        };
        self.beds.push(bed.clone());
        Ok(bed)
    }

    #[must_use]
    pub fn bed_by_label(&self, label: &str) -> Option<&Bed> {
        self.beds.iter().find(|bed| bed.label == label)
    }

    #[must_use]
    pub fn bed_by_id(&self, id: &BedId) -> Option<&Bed> {
        self.beds.iter().find(|bed| &bed.id == id)
    }

    /// Overwrites the occupancy columns of one bed.
    ///
    /// # Errors
    ///
    /// Fails with not-found if no bed has this id, or a foreign-key violation
    /// if `current_admission` names an admission that does not exist.
    pub fn set_bed_state(
        &mut self,
        id: &BedId,
        occupied: bool,
        current_admission: Option<AdmissionId>,
    ) -> Result<Bed> {
        if let Some(admission) = &current_admission {
            if self.admission_by_id(admission).is_none() {
                return Err(StoreError::foreign_key_violation(
                    BEDS,
                    "current_admission",
                    admission.as_str(),
                    ADMISSIONS,
                ));
            }
        }
        let bed = self
            .beds
            .iter_mut()
            .find(|bed| &bed.id == id)
            .ok_or_else(|| StoreError::not_found(BEDS, &format!("id = {id}")))?;
        bed.occupied = occupied;
        bed.current_admission = current_admission;
        Ok(bed.clone())
    }

    /// Beds ordered by ward, then label.
    #[must_use]
    pub fn beds(&self) -> Vec<&Bed> {
        let mut beds: Vec<&Bed> = self.beds.iter().collect();
        beds.sort_by(|a, b| a.ward.cmp(&b.ward).then_with(|| a.label.cmp(&b.label)));
        beds
    }

    /// # Errors
    ///
    /// Fails with a foreign-key violation for an unknown bed, or a unique
    /// violation on `admission_code`.
    pub fn insert_admission(&mut self, new: NewAdmission) -> Result<Admission> {
        if self.bed_by_id(&new.bed_id).is_none() {
            return Err(StoreError::foreign_key_violation(
                ADMISSIONS,
                "bed_id",
                new.bed_id.as_str(),
                BEDS,
            ));
        }
        if self.admission_by_code(&new.admission_code).is_some() {
            return Err(StoreError::unique_violation(
                ADMISSIONS,
                "admission_code",
                new.admission_code.as_str(),
            ));
        }
        let admission = Admission {
            id: AdmissionId::new(crate::new_row_id()),
            admission_code: new.admission_code,
            patient_id: new.patient_id,
            bed_id: new.bed_id,
            admitted_at: new.admitted_at,
            discharged_at: None,
        };
        self.admissions.push(admission.clone());
        Ok(admission)
    }

    #[must_use]
    pub fn admission_by_id(&self, id: &AdmissionId) -> Option<&Admission> {
        self.admissions.iter().find(|admission| &admission.id == id)
    }

    #[must_use]
    pub fn admission_by_code(&self, code: &BusinessIdentifier) -> Option<&Admission> {
        self.admissions
            .iter()
            .find(|admission| &admission.admission_code == code)
    }

    #[must_use]
    pub fn open_admission_for_patient(&self, patient: &PatientId) -> Option<&Admission> {
        self.admissions
            .iter()
            .find(|admission| &admission.patient_id == patient && admission.is_open())
    }

    /// # Errors
    ///
    /// Fails with not-found if no admission has this id.
    pub fn set_admission_discharged(
        &mut self,
        id: &AdmissionId,
        discharged_at: Option<DateTime<Utc>>,
    ) -> Result<Admission> {
        let admission = self
            .admissions
            .iter_mut()
            .find(|admission| &admission.id == id)
            .ok_or_else(|| StoreError::not_found(ADMISSIONS, &format!("id = {id}")))?;
        admission.discharged_at = discharged_at;
        Ok(admission.clone())
    }

    /// # Errors
    ///
    /// Fails if the admission does not exist, or a bill or bed still
    /// references it.
    pub fn delete_admission(&mut self, id: &AdmissionId) -> Result<()> {
        if self.bills.iter().any(|bill| &bill.admission_id == id) {
            return Err(StoreError::still_referenced(
                ADMISSIONS,
                "id",
                id.as_str(),
                BILLS,
            ));
        }
        if self
            .beds
            .iter()
            .any(|bed| bed.current_admission.as_ref() == Some(id))
        {
            return Err(StoreError::still_referenced(
                ADMISSIONS,
                "id",
                id.as_str(),
                BEDS,
            ));
        }
        let before = self.admissions.len();
        self.admissions.retain(|admission| &admission.id != id);
        if self.admissions.len() == before {
            return Err(StoreError::not_found(ADMISSIONS, &format!("id = {id}")));
        }
        Ok(())
    }

    #[must_use]
    pub fn admissions(&self) -> &[Admission] {
        &self.admissions
    }

    /// # Errors
    ///
    /// Fails with a foreign-key violation for an unknown admission, or a
    /// unique violation on `admission_id` or `bill_code`.
    pub fn insert_bill(
        &mut self,
        new: NewBillingSummary,
        now: DateTime<Utc>,
    ) -> Result<BillingSummary> {
        if self.admission_by_id(&new.admission_id).is_none() {
            return Err(StoreError::foreign_key_violation(
                BILLS,
                "admission_id",
                new.admission_id.as_str(),
                ADMISSIONS,
            ));
        }
        if self.bill_for_admission(&new.admission_id).is_some() {
            return Err(StoreError::unique_violation(
                BILLS,
                "admission_id",
                new.admission_id.as_str(),
            ));
        }
        if self.bills.iter().any(|bill| bill.bill_code == new.bill_code) {
            return Err(StoreError::unique_violation(
                BILLS,
                "bill_code",
                new.bill_code.as_str(),
            ));
        }
        let bill = BillingSummary {
            id: BillId::new(crate::new_row_id()),
            bill_code: new.bill_code,
            admission_id: new.admission_id,
            billable_days: new.billable_days,
            bed_charges: new.bed_charges,
            total: new.total,
            created_at: now,
        };
        self.bills.push(bill.clone());
        Ok(bill)
    }

    #[must_use]
    pub fn bill_for_admission(&self, admission: &AdmissionId) -> Option<&BillingSummary> {
        self.bills
            .iter()
            .find(|bill| &bill.admission_id == admission)
    }

    /// # Errors
    ///
    /// Fails with not-found if no bill has this id.
    pub fn delete_bill(&mut self, id: &BillId) -> Result<()> {
        let before = self.bills.len();
        self.bills.retain(|bill| &bill.id != id);
        if self.bills.len() == before {
            return Err(StoreError::not_found(BILLS, &format!("id = {id}")));
        }
        Ok(())
    }

    #[must_use]
    pub fn bills(&self) -> &[BillingSummary] {
        &self.bills
    }
}
