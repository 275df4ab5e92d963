use frontdesk_core::Capability;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawConfig {
    pub(crate) provisioning: Option<RawProvisioning>,
    pub(crate) billing: Option<RawBilling>,
    pub(crate) storage: Option<RawStorage>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct RawProvisioning {
    pub(crate) login_domain: Option<String>,
    pub(crate) fallback_login_token: Option<String>,
    pub(crate) initial_secret: Option<String>,
    pub(crate) sequence_attempts: Option<u32>,
    pub(crate) address_scan_limit: Option<usize>,
    pub(crate) doctor_code_prefix: Option<String>,
    pub(crate) employee_code_prefix: Option<String>,
    pub(crate) capabilities: Option<RawCapabilities>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawCapabilities {
    pub(crate) admin: Option<Vec<Capability>>,
    pub(crate) doctor: Option<Vec<Capability>>,
    pub(crate) nurse: Option<Vec<Capability>>,
    pub(crate) receptionist: Option<Vec<Capability>>,
    pub(crate) pharmacist: Option<Vec<Capability>>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct RawBilling {
    pub(crate) admission_code_prefix: Option<String>,
    pub(crate) bill_code_prefix: Option<String>,
    pub(crate) minimum_billable_days: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub(crate) struct RawStorage {
    pub(crate) data_dir: Option<String>,
}
