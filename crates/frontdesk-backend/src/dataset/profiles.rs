use chrono::{DateTime, Utc};
use frontdesk_core::{IdentityHandle, LoginAddress, NewProfile, Profile, ProfileId};

use super::{Dataset, starts_with_ignore_case};
use crate::Result;
use crate::error::StoreError;

const TABLE: &str = "profiles";

impl Dataset {
    #[must_use]
    pub fn profile_by_email(&self, email: &LoginAddress) -> Option<&Profile> {
        self.profiles.iter().find(|profile| &profile.email == email)
    }

    #[must_use]
    pub fn profile_by_id(&self, id: &ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|profile| &profile.id == id)
    }

    #[must_use]
    pub fn profile_by_user_id(&self, user_id: &IdentityHandle) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|profile| &profile.user_id == user_id)
    }

    /// Addresses whose local part starts with `base` (ignoring case) under
    /// `domain`, at most `limit` of them.
    #[must_use]
    pub fn addresses_with_prefix(
        &self,
        base: &str,
        domain: &str,
        limit: usize,
    ) -> Vec<LoginAddress> {
        self.profiles
            .iter()
            .map(|profile| &profile.email)
            .filter(|email| {
                starts_with_ignore_case(email.local_part(), base)
                    && email.domain().eq_ignore_ascii_case(domain)
            })
            .take(limit)
            .cloned()
            .collect()
    }

    /// # Errors
    ///
    /// Fails with a unique violation on `email`, `phone` or `user_id`, or a
    /// foreign-key violation if `user_id` has no identity.
    pub fn insert_profile(&mut self, new: NewProfile, now: DateTime<Utc>) -> Result<Profile> {
        if self.identity(&new.user_id).is_none() {
            return Err(StoreError::foreign_key_violation(
                TABLE,
                "user_id",
                new.user_id.as_str(),
                "identities",
            ));
        }
        if self.profile_by_email(&new.email).is_some() {
            return Err(StoreError::unique_violation(
                TABLE,
                "email",
                new.email.as_str(),
            ));
        }
        if let Some(phone) = &new.phone {
            if self
                .profiles
                .iter()
                .any(|profile| profile.phone.as_ref() == Some(phone))
            {
                return Err(StoreError::unique_violation(TABLE, "phone", phone));
            }
        }
        if self.profile_by_user_id(&new.user_id).is_some() {
            return Err(StoreError::unique_violation(
                TABLE,
                "user_id",
                new.user_id.as_str(),
            ));
        }

        let profile = Profile {
            id: ProfileId::new(crate::new_row_id()),
            user_id: new.user_id,
            full_name: new.full_name,
            email: new.email,
            phone: new.phone,
            role: new.role,
            status: new.status,
            capabilities: new.capabilities,
            employee_code: new.employee_code,
            created_at: now,
        };
        self.profiles.push(profile.clone());
        Ok(profile)
    }

    /// # Errors
    ///
    /// Fails if the profile does not exist or a doctor still references it.
    pub fn delete_profile(&mut self, id: &ProfileId) -> Result<()> {
        if self.doctors.iter().any(|doctor| &doctor.profile_id == id) {
            return Err(StoreError::still_referenced(
                TABLE,
                "id",
                id.as_str(),
                "doctors",
            ));
        }
        let before = self.profiles.len();
        self.profiles.retain(|profile| &profile.id != id);
        if self.profiles.len() == before {
            return Err(StoreError::not_found(TABLE, &format!("id = {id}")));
        }
        Ok(())
    }

    #[must_use]
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }
}
