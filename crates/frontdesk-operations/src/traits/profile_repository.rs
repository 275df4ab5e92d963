use frontdesk_backend::StoreError;
use frontdesk_core::{LoginAddress, NewProfile, Profile, ProfileId};

pub trait ProfileRepository: Send + Sync {
    fn find_profile_by_email(&self, email: &LoginAddress) -> Result<Option<Profile>, StoreError>;

    fn find_profile_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError>;

    /// Existing addresses whose local part starts with `base`, compared
    /// without regard to case, under `domain`. Returns at most `limit` rows.
    fn addresses_with_prefix(
        &self,
        base: &str,
        domain: &str,
        limit: usize,
    ) -> Result<Vec<LoginAddress>, StoreError>;

    /// Unique violations name `email`, `phone` or `user_id` in their detail.
    fn insert_profile(&self, profile: NewProfile) -> Result<Profile, StoreError>;

    fn delete_profile(&self, id: &ProfileId) -> Result<(), StoreError>;
}
