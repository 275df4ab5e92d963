use std::path::{Path, PathBuf};

use frontdesk_config::{ConfigError, DEFAULT_CONFIG_FILE, FrontdeskConfig, load_config};
use tracing::debug;

/// Loads the explicit file if given, else `./frontdesk.toml` when present, else defaults.
pub(crate) fn resolve_config(
    explicit: Option<&Path>,
    cwd: &Path,
) -> Result<FrontdeskConfig, ConfigError> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "loading configuration");
        return load_config(path);
    }

    let local = cwd.join(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        debug!(path = %local.display(), "loading configuration");
        return load_config(&local);
    }

    debug!("no configuration file, using defaults");
    Ok(FrontdeskConfig::default())
}

pub(crate) fn resolve_data_dir(
    flag: Option<PathBuf>,
    config: &FrontdeskConfig,
    cwd: &Path,
) -> PathBuf {
    let dir = flag.unwrap_or_else(|| config.storage().data_dir().to_path_buf());
    if dir.is_absolute() { dir } else { cwd.join(dir) }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_without_any_file() {
        let dir = TempDir::new().expect("create temp dir");

        let config = resolve_config(None, dir.path()).expect("defaults");

        assert_eq!(config.provisioning().login_domain(), "frontdesk.hospital");
    }

    #[test]
    fn picks_up_local_file() {
        let dir = TempDir::new().expect("create temp dir");
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[provisioning]\nlogin-domain = \"x.test\"\n",
        )
        .expect("write config");

        let config = resolve_config(None, dir.path()).expect("load local file");

        assert_eq!(config.provisioning().login_domain(), "x.test");
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = TempDir::new().expect("create temp dir");
        let missing = dir.path().join("missing.toml");

        let err = resolve_config(Some(&missing), dir.path()).expect_err("file is missing");

        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn flag_wins_over_configured_data_dir() {
        let cwd = Path::new("/srv/hospital");
        let config = FrontdeskConfig::default();

        assert_eq!(
            resolve_data_dir(Some(PathBuf::from("state")), &config, cwd),
            PathBuf::from("/srv/hospital/state")
        );
        assert_eq!(
            resolve_data_dir(None, &config, cwd),
            PathBuf::from("/srv/hospital/.frontdesk")
        );
    }
}
