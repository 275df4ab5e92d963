use std::sync::Arc;

use frontdesk_config::BillingConfig;
use frontdesk_core::Clock;

use crate::traits::WardRepository;

pub struct WardSagaContext<W> {
    ward: Arc<W>,
    clock: Arc<dyn Clock>,
    billing: Arc<BillingConfig>,
}

impl<W> Clone for WardSagaContext<W> {
    fn clone(&self) -> Self {
        Self {
            ward: Arc::clone(&self.ward),
            clock: Arc::clone(&self.clock),
            billing: Arc::clone(&self.billing),
        }
    }
}

impl<W: WardRepository> WardSagaContext<W> {
    pub fn new(ward: Arc<W>, clock: Arc<dyn Clock>, billing: Arc<BillingConfig>) -> Self {
        Self {
            ward,
            clock,
            billing,
        }
    }

    #[must_use]
    pub fn ward(&self) -> &W {
        &self.ward
    }

    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    #[must_use]
    pub fn billing(&self) -> &BillingConfig {
        &self.billing
    }
}
