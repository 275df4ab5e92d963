use std::path::{Path, PathBuf};

use frontdesk_core::{Capability, Role};

use crate::error::ConfigError;
use crate::raw::{RawBilling, RawCapabilities, RawConfig, RawProvisioning, RawStorage};

/// Default capability set granted to a new profile, per role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityDefaults {
    admin: Vec<Capability>,
    doctor: Vec<Capability>,
    nurse: Vec<Capability>,
    receptionist: Vec<Capability>,
    pharmacist: Vec<Capability>,
}

impl Default for CapabilityDefaults {
    fn default() -> Self {
        use Capability::{
            EditPatients, ManageAppointments, ManageBilling, ManagePharmacy, ManageStaff,
            ViewPatients, WritePrescriptions,
        };
        Self {
            admin: vec![
                ViewPatients,
                EditPatients,
                ManageAppointments,
                WritePrescriptions,
                ManageBilling,
                ManagePharmacy,
                ManageStaff,
            ],
            doctor: vec![
                ViewPatients,
                EditPatients,
                ManageAppointments,
                WritePrescriptions,
            ],
            nurse: vec![ViewPatients, EditPatients],
            receptionist: vec![ViewPatients, ManageAppointments, ManageBilling],
            pharmacist: vec![ViewPatients, ManagePharmacy],
        }
    }
}

impl CapabilityDefaults {
    #[must_use]
    pub fn for_role(&self, role: Role) -> &[Capability] {
        match role {
            Role::Admin => &self.admin,
            Role::Doctor => &self.doctor,
            Role::Nurse => &self.nurse,
            Role::Receptionist => &self.receptionist,
            Role::Pharmacist => &self.pharmacist,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
    login_domain: String,
    fallback_login_token: String,
    initial_secret: String,
    sequence_attempts: u32,
    address_scan_limit: usize,
    doctor_code_prefix: String,
    employee_code_prefix: String,
    capabilities: CapabilityDefaults,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            login_domain: String::from("frontdesk.hospital"),
            fallback_login_token: String::from("user"),
            initial_secret: String::from("Welcome@123"),
            sequence_attempts: 3,
            address_scan_limit: 1000,
            doctor_code_prefix: String::from("DR"),
            employee_code_prefix: String::from("EMP"),
            capabilities: CapabilityDefaults::default(),
        }
    }
}

impl ProvisioningConfig {
    /// Domain of synthesized login addresses.
    #[must_use]
    pub fn login_domain(&self) -> &str {
        &self.login_domain
    }

    /// Base used when a display name has no usable characters.
    #[must_use]
    pub fn fallback_login_token(&self) -> &str {
        &self.fallback_login_token
    }

    #[must_use]
    pub fn initial_secret(&self) -> &str {
        &self.initial_secret
    }

    /// Upper bound on doctor insert attempts when sort positions collide.
    #[must_use]
    pub fn sequence_attempts(&self) -> u32 {
        self.sequence_attempts
    }

    /// Maximum number of existing addresses read when choosing a suffix.
    #[must_use]
    pub fn address_scan_limit(&self) -> usize {
        self.address_scan_limit
    }

    #[must_use]
    pub fn doctor_code_prefix(&self) -> &str {
        &self.doctor_code_prefix
    }

    #[must_use]
    pub fn employee_code_prefix(&self) -> &str {
        &self.employee_code_prefix
    }

    #[must_use]
    pub fn capabilities(&self) -> &CapabilityDefaults {
        &self.capabilities
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_login_domain(mut self, domain: &str) -> Self {
        self.login_domain = domain.to_string();
        self
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_sequence_attempts(mut self, attempts: u32) -> Self {
        self.sequence_attempts = attempts;
        self
    }
}

#[derive(Debug, Clone)]
pub struct BillingConfig {
    admission_code_prefix: String,
    bill_code_prefix: String,
    minimum_billable_days: u32,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            admission_code_prefix: String::from("ADM"),
            bill_code_prefix: String::from("BILL"),
            minimum_billable_days: 1,
        }
    }
}

impl BillingConfig {
    #[must_use]
    pub fn admission_code_prefix(&self) -> &str {
        &self.admission_code_prefix
    }

    #[must_use]
    pub fn bill_code_prefix(&self) -> &str {
        &self.bill_code_prefix
    }

    /// Same-day discharges are billed for at least this many days.
    #[must_use]
    pub fn minimum_billable_days(&self) -> u32 {
        self.minimum_billable_days
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(crate::DEFAULT_DATA_DIR),
        }
    }
}

impl StorageConfig {
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[derive(Debug, Clone, Default)]
pub struct FrontdeskConfig {
    provisioning: ProvisioningConfig,
    billing: BillingConfig,
    storage: StorageConfig,
}

impl FrontdeskConfig {
    #[must_use]
    pub fn provisioning(&self) -> &ProvisioningConfig {
        &self.provisioning
    }

    #[must_use]
    pub fn billing(&self) -> &BillingConfig {
        &self.billing
    }

    #[must_use]
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    #[cfg(any(test, feature = "testing"))]
    #[must_use]
    pub fn with_provisioning(mut self, provisioning: ProvisioningConfig) -> Self {
        self.provisioning = provisioning;
        self
    }
}

/// Reads and validates a `frontdesk.toml` file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or holds an invalid value.
pub fn load_config(path: &Path) -> Result<FrontdeskConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, path)
}

/// Parses configuration text; `origin` is only used in error messages.
///
/// # Errors
///
/// Returns an error if the text is not valid TOML for this schema, or holds an invalid value.
pub fn parse_config(content: &str, origin: &Path) -> Result<FrontdeskConfig, ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })?;

    Ok(FrontdeskConfig {
        provisioning: build_provisioning(raw.provisioning.unwrap_or_default())?,
        billing: build_billing(raw.billing.unwrap_or_default())?,
        storage: build_storage(raw.storage.unwrap_or_default()),
    })
}

fn build_provisioning(raw: RawProvisioning) -> Result<ProvisioningConfig, ConfigError> {
    let defaults = ProvisioningConfig::default();

    let login_domain = raw
        .login_domain
        .map_or(defaults.login_domain, |d| d.trim().to_lowercase());
    if login_domain.is_empty() || login_domain.contains('@') || login_domain.contains(' ') {
        return Err(invalid(
            "provisioning.login-domain",
            format!("'{login_domain}' is not a domain"),
        ));
    }

    let fallback_login_token = raw
        .fallback_login_token
        .unwrap_or(defaults.fallback_login_token);
    if fallback_login_token.is_empty()
        || !fallback_login_token
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(invalid(
            "provisioning.fallback-login-token",
            "must be non-empty lowercase ascii letters and digits".to_string(),
        ));
    }

    let initial_secret = raw.initial_secret.unwrap_or(defaults.initial_secret);
    if initial_secret.len() < 8 {
        return Err(invalid(
            "provisioning.initial-secret",
            "must be at least 8 characters".to_string(),
        ));
    }

    let sequence_attempts = raw.sequence_attempts.unwrap_or(defaults.sequence_attempts);
    if sequence_attempts == 0 {
        return Err(invalid(
            "provisioning.sequence-attempts",
            "must be at least 1".to_string(),
        ));
    }

    let address_scan_limit = raw
        .address_scan_limit
        .unwrap_or(defaults.address_scan_limit);
    if address_scan_limit == 0 {
        return Err(invalid(
            "provisioning.address-scan-limit",
            "must be at least 1".to_string(),
        ));
    }

    let doctor_code_prefix = validate_prefix(
        "provisioning.doctor-code-prefix",
        raw.doctor_code_prefix.unwrap_or(defaults.doctor_code_prefix),
    )?;
    let employee_code_prefix = validate_prefix(
        "provisioning.employee-code-prefix",
        raw.employee_code_prefix
            .unwrap_or(defaults.employee_code_prefix),
    )?;

    Ok(ProvisioningConfig {
        login_domain,
        fallback_login_token,
        initial_secret,
        sequence_attempts,
        address_scan_limit,
        doctor_code_prefix,
        employee_code_prefix,
        capabilities: build_capabilities(raw.capabilities),
    })
}

fn build_capabilities(raw: Option<RawCapabilities>) -> CapabilityDefaults {
    let defaults = CapabilityDefaults::default();
    match raw {
        None => defaults,
        Some(caps) => CapabilityDefaults {
            admin: caps.admin.unwrap_or(defaults.admin),
            doctor: caps.doctor.unwrap_or(defaults.doctor),
            nurse: caps.nurse.unwrap_or(defaults.nurse),
            receptionist: caps.receptionist.unwrap_or(defaults.receptionist),
            pharmacist: caps.pharmacist.unwrap_or(defaults.pharmacist),
        },
    }
}

fn build_billing(raw: RawBilling) -> Result<BillingConfig, ConfigError> {
    let defaults = BillingConfig::default();
    Ok(BillingConfig {
        admission_code_prefix: validate_prefix(
            "billing.admission-code-prefix",
            raw.admission_code_prefix
                .unwrap_or(defaults.admission_code_prefix),
        )?,
        bill_code_prefix: validate_prefix(
            "billing.bill-code-prefix",
            raw.bill_code_prefix.unwrap_or(defaults.bill_code_prefix),
        )?,
        minimum_billable_days: raw
            .minimum_billable_days
            .unwrap_or(defaults.minimum_billable_days),
    })
}

fn build_storage(raw: RawStorage) -> StorageConfig {
    raw.data_dir.map_or_else(StorageConfig::default, |dir| StorageConfig {
        data_dir: PathBuf::from(dir),
    })
}

fn validate_prefix(key: &'static str, prefix: String) -> Result<String, ConfigError> {
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(invalid(
            key,
            format!("'{prefix}' must be non-empty uppercase ascii letters"),
        ));
    }
    Ok(prefix)
}

fn invalid(key: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { key, reason }
}
