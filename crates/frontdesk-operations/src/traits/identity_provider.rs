use frontdesk_backend::IdentityError;
use frontdesk_core::{IdentityHandle, NewIdentity};

/// External login accounts. Each account owns exactly one profile row.
pub trait IdentityProvider: Send + Sync {
    /// Creates a confirmed (or unconfirmed) account carrying role and display
    /// name metadata.
    fn create_identity(&self, request: &NewIdentity) -> Result<IdentityHandle, IdentityError>;

    fn delete_identity(&self, handle: &IdentityHandle) -> Result<(), IdentityError>;
}
