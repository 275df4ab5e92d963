use chrono::{DateTime, Utc};
use frontdesk_core::{IdentityHandle, NewIdentity};

use super::{Dataset, IdentityRecord};
use crate::error::IdentityError;

impl Dataset {
    /// # Errors
    ///
    /// Returns [`IdentityError::AlreadyRegistered`] if the address has an account.
    pub fn create_identity(
        &mut self,
        request: &NewIdentity,
        now: DateTime<Utc>,
    ) -> Result<IdentityRecord, IdentityError> {
        if self
            .identities
            .iter()
            .any(|identity| identity.address == request.address)
        {
            return Err(IdentityError::AlreadyRegistered(
                request.address.to_string(),
            ));
        }

        let record = IdentityRecord {
            handle: IdentityHandle::new(crate::new_row_id()),
            address: request.address.clone(),
            confirmed: request.confirmed,
            metadata: request.metadata.clone(),
            created_at: now,
        };
        self.identities.push(record.clone());
        Ok(record)
    }

    /// # Errors
    ///
    /// Returns [`IdentityError::NotFound`] if no account has this handle.
    pub fn delete_identity(&mut self, handle: &IdentityHandle) -> Result<(), IdentityError> {
        let before = self.identities.len();
        self.identities.retain(|identity| &identity.handle != handle);
        if self.identities.len() == before {
            return Err(IdentityError::NotFound(handle.to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn identity(&self, handle: &IdentityHandle) -> Option<&IdentityRecord> {
        self.identities
            .iter()
            .find(|identity| &identity.handle == handle)
    }

    #[must_use]
    pub fn identities(&self) -> &[IdentityRecord] {
        &self.identities
    }
}
