use frontdesk_backend::StoreError;
use frontdesk_config::ProvisioningConfig;
use frontdesk_core::{
    BusinessIdentifier, IdentityHandle, IdentityMetadata, LoginAddress, NewIdentity, NewProfile,
    Profile, ProfileStatus, Role,
};
use tracing::{debug, info, warn};

use crate::Result;
use crate::error::OperationError;
use crate::traits::{DoctorRepository, IdentityProvider, ProfileRepository};

/// Descriptive fields of the person being provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileAttributes {
    pub full_name: String,
    pub address: LoginAddress,
    pub phone: Option<String>,
    pub role: Role,
    pub employee_code: Option<BusinessIdentifier>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub identity: IdentityHandle,
    pub profile: Profile,
    /// The pair existed before this run; nothing was written.
    pub was_preexisting: bool,
}

/// Finds the shared account for a login address, or provisions a new
/// identity and profile for it.
pub struct IdentityResolver<'a, I, P, D> {
    identities: &'a I,
    profiles: &'a P,
    doctors: &'a D,
    config: &'a ProvisioningConfig,
}

impl<'a, I, P, D> IdentityResolver<'a, I, P, D>
where
    I: IdentityProvider,
    P: ProfileRepository,
    D: DoctorRepository,
{
    pub fn new(
        identities: &'a I,
        profiles: &'a P,
        doctors: &'a D,
        config: &'a ProvisioningConfig,
    ) -> Self {
        Self {
            identities,
            profiles,
            doctors,
            config,
        }
    }

    /// # Errors
    ///
    /// * [`OperationError::DuplicateBusinessEntity`] if a doctor already
    ///   references the existing account.
    /// * [`OperationError::IdentityCreationFailed`] if the provider refuses
    ///   the account; nothing was written.
    /// * [`OperationError::DuplicateLoginAddress`],
    ///   [`OperationError::DuplicatePhoneNumber`] or
    ///   [`OperationError::ProfileCreationFailed`] if the profile insert
    ///   fails; the new identity has been deleted again unless
    ///   `orphaned_identity` says otherwise.
    pub fn resolve(&self, attributes: &ProfileAttributes) -> Result<ResolvedIdentity> {
        if let Some(profile) = self.profiles.find_profile_by_email(&attributes.address)? {
            if self
                .doctors
                .find_doctor_by_user_id(&profile.user_id)?
                .is_some()
            {
                return Err(OperationError::DuplicateBusinessEntity {
                    address: attributes.address.clone(),
                });
            }
            debug!(address = %attributes.address, "reusing existing profile");
            return Ok(ResolvedIdentity {
                identity: profile.user_id.clone(),
                profile,
                was_preexisting: true,
            });
        }

        let identity = self
            .identities
            .create_identity(&NewIdentity {
                address: attributes.address.clone(),
                initial_secret: self.config.initial_secret().to_string(),
                confirmed: true,
                metadata: IdentityMetadata {
                    role: attributes.role,
                    full_name: attributes.full_name.clone(),
                },
            })
            .map_err(|source| OperationError::IdentityCreationFailed {
                address: attributes.address.clone(),
                source,
            })?;

        let new_profile = NewProfile {
            user_id: identity.clone(),
            full_name: attributes.full_name.clone(),
            email: attributes.address.clone(),
            phone: attributes.phone.clone(),
            role: attributes.role,
            status: ProfileStatus::Active,
            capabilities: self.config.capabilities().for_role(attributes.role).to_vec(),
            employee_code: attributes.employee_code.clone(),
        };
        let profile = match self.profiles.insert_profile(new_profile) {
            Ok(profile) => profile,
            Err(err) => {
                let orphaned_identity = self.discard_identity(&identity);
                return Err(classify_profile_error(err, attributes, orphaned_identity));
            }
        };

        info!(address = %attributes.address, profile = %profile.id, "provisioned identity and profile");
        Ok(ResolvedIdentity {
            identity,
            profile,
            was_preexisting: false,
        })
    }

    /// Deletes the profile, then the identity, of a pair this run created.
    ///
    /// # Errors
    ///
    /// Stops at the first delete that fails.
    pub fn release(&self, resolved: &ResolvedIdentity) -> Result<()> {
        self.profiles.delete_profile(&resolved.profile.id)?;
        self.identities
            .delete_identity(&resolved.identity)
            .map_err(OperationError::Identity)?;
        debug!(identity = %resolved.identity, "deleted provisioned profile and identity");
        Ok(())
    }

    /// Returns the handle if it could not be deleted.
    fn discard_identity(&self, identity: &IdentityHandle) -> Option<IdentityHandle> {
        match self.identities.delete_identity(identity) {
            Ok(()) => None,
            Err(err) => {
                warn!(%identity, error = %err, "identity left without a profile");
                Some(identity.clone())
            }
        }
    }
}

fn classify_profile_error(
    err: StoreError,
    attributes: &ProfileAttributes,
    orphaned_identity: Option<IdentityHandle>,
) -> OperationError {
    if err.is_unique_violation() && err.names_column("email") {
        return OperationError::DuplicateLoginAddress {
            address: attributes.address.clone(),
            orphaned_identity,
        };
    }
    if err.is_unique_violation() && err.names_column("phone") {
        let phone = err
            .conflicting_value()
            .map(str::to_string)
            .or_else(|| attributes.phone.clone())
            .unwrap_or_default();
        return OperationError::DuplicatePhoneNumber {
            phone,
            orphaned_identity,
        };
    }
    OperationError::ProfileCreationFailed {
        address: attributes.address.clone(),
        orphaned_identity,
        source: err,
    }
}

#[cfg(test)]
mod tests {
    use frontdesk_backend::IdentityError;
    use frontdesk_core::Capability;

    use super::*;
    use crate::mocks::MockBackend;

    fn attributes(address: &str, phone: Option<&str>) -> ProfileAttributes {
        ProfileAttributes {
            full_name: "Asha Rao".to_string(),
            address: LoginAddress::parse(address).expect("valid address"),
            phone: phone.map(str::to_string),
            role: Role::Doctor,
            employee_code: Some(BusinessIdentifier::new("EMP24030900000001")),
        }
    }

    fn resolve(backend: &MockBackend, attributes: &ProfileAttributes) -> Result<ResolvedIdentity> {
        let config = ProvisioningConfig::default();
        IdentityResolver::new(backend, backend, backend, &config).resolve(attributes)
    }

    #[test]
    fn creates_identity_and_profile_with_role_capabilities() {
        let backend = MockBackend::new();

        let resolved = resolve(&backend, &attributes("asha0001@x.test", None)).expect("resolve");

        assert!(!resolved.was_preexisting);
        assert_eq!(resolved.profile.status, ProfileStatus::Active);
        assert!(
            resolved
                .profile
                .capabilities
                .contains(&Capability::WritePrescriptions)
        );
        let data = backend.data();
        assert_eq!(data.identities().len(), 1);
        assert!(data.identities()[0].confirmed);
        assert_eq!(data.profiles().len(), 1);
    }

    #[test]
    fn existing_profile_without_doctor_is_reused() {
        let backend = MockBackend::new();
        let (handle, profile) = backend.seed_profile("asha0001@x.test", "Asha Rao");

        let resolved = resolve(&backend, &attributes("asha0001@x.test", None)).expect("resolve");

        assert!(resolved.was_preexisting);
        assert_eq!(resolved.identity, handle);
        assert_eq!(resolved.profile.id, profile.id);
        assert_eq!(backend.data().identities().len(), 1);
    }

    #[test]
    fn existing_doctor_is_a_duplicate() {
        let backend = MockBackend::new();
        backend.seed_doctor("asha0001@x.test", 1);

        let err = resolve(&backend, &attributes("asha0001@x.test", None)).expect_err("duplicate");

        assert!(matches!(
            err,
            OperationError::DuplicateBusinessEntity { ref address } if address.as_str() == "asha0001@x.test"
        ));
    }

    #[test]
    fn identity_failure_writes_nothing() {
        let backend = MockBackend::new();
        backend.fail_create_identity(IdentityError::Unavailable("down".to_string()));

        let err = resolve(&backend, &attributes("asha0001@x.test", None)).expect_err("fails");

        assert!(matches!(err, OperationError::IdentityCreationFailed { .. }));
        assert_eq!(backend.data().row_count(), 0);
    }

    #[test]
    fn duplicate_phone_deletes_the_new_identity() {
        let backend = MockBackend::new();
        backend.fail_insert_profile(StoreError::unique_violation(
            "profiles",
            "phone",
            "9845000001",
        ));

        let err = resolve(&backend, &attributes("asha0001@x.test", Some("9845000001")))
            .expect_err("duplicate phone");

        assert!(matches!(
            err,
            OperationError::DuplicatePhoneNumber { ref phone, orphaned_identity: None } if phone == "9845000001"
        ));
        assert!(backend.data().identities().is_empty());
    }

    #[test]
    fn duplicate_email_is_a_login_address_conflict() {
        let backend = MockBackend::new();
        backend.fail_insert_profile(StoreError::unique_violation(
            "profiles",
            "email",
            "asha0001@x.test",
        ));

        let err = resolve(&backend, &attributes("asha0001@x.test", None)).expect_err("race");

        assert!(matches!(err, OperationError::DuplicateLoginAddress { .. }));
        assert!(backend.data().identities().is_empty());
    }

    #[test]
    fn failed_identity_cleanup_is_reported() {
        let backend = MockBackend::new();
        backend.fail_insert_profile(StoreError::unavailable("timeout"));
        backend.fail_delete_identity(IdentityError::Unavailable("down".to_string()));

        let err = resolve(&backend, &attributes("asha0001@x.test", None)).expect_err("fails");

        assert!(matches!(err, OperationError::ProfileCreationFailed { .. }));
        let orphan = err.orphaned_identity().expect("orphan reported");
        assert_eq!(&backend.data().identities()[0].handle, orphan);
    }

    #[test]
    fn release_deletes_profile_then_identity() {
        let backend = MockBackend::new();
        let config = ProvisioningConfig::default();
        let resolver = IdentityResolver::new(&backend, &backend, &backend, &config);
        let resolved = resolver
            .resolve(&attributes("asha0001@x.test", None))
            .expect("resolve");

        resolver.release(&resolved).expect("release");

        assert_eq!(backend.data().row_count(), 0);
    }
}
