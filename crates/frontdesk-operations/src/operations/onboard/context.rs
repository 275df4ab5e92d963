use std::sync::Arc;

use frontdesk_config::ProvisioningConfig;
use frontdesk_core::Clock;

use crate::operations::IdentityResolver;
use crate::traits::{DoctorRepository, IdentityProvider, ProfileRepository};

pub struct OnboardSagaContext<I, P, D> {
    identities: Arc<I>,
    profiles: Arc<P>,
    doctors: Arc<D>,
    clock: Arc<dyn Clock>,
    config: Arc<ProvisioningConfig>,
}

impl<I, P, D> Clone for OnboardSagaContext<I, P, D> {
    fn clone(&self) -> Self {
        Self {
            identities: Arc::clone(&self.identities),
            profiles: Arc::clone(&self.profiles),
            doctors: Arc::clone(&self.doctors),
            clock: Arc::clone(&self.clock),
            config: Arc::clone(&self.config),
        }
    }
}

impl<I, P, D> OnboardSagaContext<I, P, D>
where
    I: IdentityProvider,
    P: ProfileRepository,
    D: DoctorRepository,
{
    pub fn new(
        identities: Arc<I>,
        profiles: Arc<P>,
        doctors: Arc<D>,
        clock: Arc<dyn Clock>,
        config: Arc<ProvisioningConfig>,
    ) -> Self {
        Self {
            identities,
            profiles,
            doctors,
            clock,
            config,
        }
    }

    #[must_use]
    pub fn profiles(&self) -> &P {
        &self.profiles
    }

    #[must_use]
    pub fn doctors(&self) -> &D {
        &self.doctors
    }

    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    #[must_use]
    pub fn config(&self) -> &ProvisioningConfig {
        &self.config
    }

    #[must_use]
    pub fn resolver(&self) -> IdentityResolver<'_, I, P, D> {
        IdentityResolver::new(
            self.identities.as_ref(),
            self.profiles.as_ref(),
            self.doctors.as_ref(),
            &self.config,
        )
    }
}
