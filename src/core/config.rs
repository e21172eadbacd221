use crate::core::currency::{Crypto, Fiat};
use crate::core::error::HodlError;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use ini::Ini;
use rust_decimal::Decimal;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const SECTION_CURRENCY: &str = "currency";
pub const SECTION_READINGS: &str = "readings";
pub const SECTION_PORTFOLIO: &str = "portfolio";
pub const SECTION_PROVIDERS: &str = "providers";
pub const KEY_FIAT: &str = "FIAT";

/// Settings persisted in an INI file, grouped into the `currency`,
/// `readings` and `portfolio` sections.
///
/// The file is read once by [`ConfigStore::open`]. Every [`ConfigStore::set`]
/// writes the whole file back and syncs it before returning.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    ini: Ini,
}

impl ConfigStore {
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("", "", "hodl")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.ini"))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HodlError> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading config from {}", path.display());
        let ini = Ini::load_from_file(&path).map_err(|source| HodlError::Ini {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path, ini })
    }

    /// Writes the default settings to `path`. Fails if a file is already there.
    pub fn init_at_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            anyhow::bail!("Configuration file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let store = Self {
            path: path.to_path_buf(),
            ini: Self::defaults(),
        };
        store.persist()?;

        tracing::info!("Created default configuration at {}", path.display());
        Ok(store)
    }

    pub fn open_or_init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Ok(Self::open(path)?)
        } else {
            Self::init_at_path(path)
        }
    }

    fn defaults() -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some(SECTION_CURRENCY))
            .set(KEY_FIAT, Fiat::default().code());
        for section in [SECTION_READINGS, SECTION_PORTFOLIO] {
            for crypto in Crypto::MAJORS {
                ini.set_to(Some(section), crypto.key(), "0".to_string());
            }
        }
        ini
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, section: &str, key: &str) -> Result<&str, HodlError> {
        self.ini
            .get_from(Some(section), key)
            .ok_or_else(|| HodlError::NotFound {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// Reads a stored quantity or price.
    pub fn get_decimal(&self, section: &str, key: &str) -> Result<Decimal, HodlError> {
        let raw = self.get(section, key)?;
        parse_decimal(raw).ok_or_else(|| HodlError::NotANumber(raw.to_string()))
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) -> Result<(), HodlError> {
        self.ini
            .set_to(Some(section), key.to_string(), value.to_string());
        debug!(section, key, value, "Persisting setting");
        self.persist()
    }

    pub fn keys(&self, section: &str) -> Vec<String> {
        self.ini
            .section(Some(section))
            .map(|props| props.iter().map(|(k, _)| k.to_string()).collect())
            .unwrap_or_default()
    }

    pub fn standard_fiat(&self) -> Result<Fiat> {
        let code = self.get(SECTION_CURRENCY, KEY_FIAT)?;
        code.parse::<Fiat>()
            .with_context(|| format!("Invalid standard fiat in {}", self.path.display()))
    }

    /// Base URL override from the optional `[providers]` section, e.g.
    /// `coinbase_url = http://localhost:8080`.
    pub fn provider_url(&self, provider: &str, default: &str) -> String {
        self.ini
            .get_from(Some(SECTION_PROVIDERS), &format!("{provider}_url"))
            .unwrap_or(default)
            .to_string()
    }

    pub fn set_standard_fiat(&mut self, fiat: Fiat) -> Result<(), HodlError> {
        self.set(SECTION_CURRENCY, KEY_FIAT, fiat.code())
    }

    /// Writes to a sibling temp file and renames it over the config, so a
    /// reader never sees a half written file.
    fn persist(&self) -> Result<(), HodlError> {
        let tmp_path = self.path.with_extension("ini.tmp");
        let written = write_synced(&self.ini, &tmp_path)
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(source) = written {
            if let Err(e) = fs::remove_file(&tmp_path) {
                debug!(error = %e, "Could not remove {}", tmp_path.display());
            }
            return Err(HodlError::Io {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }
}

fn write_synced(ini: &Ini, path: &Path) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    ini.write_to(&mut file)?;
    file.flush()?;
    file.sync_all()
}

/// Accepts plain (`12.5`) and scientific (`1.25e1`) notation.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("conf").join("config.ini");

        let store = ConfigStore::init_at_path(&path)?;
        assert!(path.exists());
        assert_eq!(store.standard_fiat()?, Fiat::Usd);
        assert_eq!(store.get(SECTION_READINGS, "btc")?, "0");
        assert_eq!(store.get(SECTION_PORTFOLIO, "xrp")?, "0");
        assert_eq!(store.keys(SECTION_READINGS).len(), Crypto::MAJORS.len());

        let content = fs::read_to_string(&path)?;
        assert!(content.contains("[currency]"));
        assert!(content.contains("FIAT=USD"));
        assert!(content.contains("[portfolio]"));
        Ok(())
    }

    #[test]
    fn test_init_fails_if_config_exists() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.ini");
        fs::write(&path, "test")?;

        let result = ConfigStore::init_at_path(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));
        Ok(())
    }

    #[test]
    fn test_set_is_visible_to_a_fresh_reader() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.ini");
        let mut store = ConfigStore::init_at_path(&path)?;

        store.set(SECTION_READINGS, "btc", "64000.5")?;
        store.set_standard_fiat(Fiat::Chf)?;

        let reread = ConfigStore::open(&path)?;
        assert_eq!(reread.get(SECTION_READINGS, "btc")?, "64000.5");
        assert_eq!(reread.standard_fiat()?, Fiat::Chf);
        assert_eq!(
            reread.get_decimal(SECTION_READINGS, "btc")?,
            Decimal::from_str("64000.5")?
        );
        Ok(())
    }

    #[test]
    fn test_missing_key_is_not_found() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let store = ConfigStore::init_at_path(temp_dir.path().join("config.ini"))?;

        let err = store.get(SECTION_PORTFOLIO, "doge").unwrap_err();
        assert!(matches!(err, HodlError::NotFound { .. }));
        assert_eq!(err.to_string(), "no value for key 'doge' in section [portfolio]");
        assert!(store.get("nope", "FIAT").is_err());
        Ok(())
    }

    #[test]
    fn test_open_or_init_keeps_existing_values() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.ini");
        fs::write(
            &path,
            "[currency]\nFIAT=EUR\n\n[readings]\nbtc=100\n\n[portfolio]\nbtc=2\n",
        )?;

        let store = ConfigStore::open_or_init(&path)?;
        assert_eq!(store.standard_fiat()?, Fiat::Eur);
        assert_eq!(store.provider_url("coinbase", "https://x"), "https://x");
        assert_eq!(store.get_decimal(SECTION_PORTFOLIO, "btc")?, Decimal::from(2));
        Ok(())
    }

    #[test]
    fn test_provider_url_override() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.ini");
        fs::write(
            &path,
            "[currency]\nFIAT=USD\n\n[providers]\nbinance_url=http://127.0.0.1:9000\n",
        )?;

        let store = ConfigStore::open(&path)?;
        assert_eq!(
            store.provider_url("binance", "https://api.binance.com"),
            "http://127.0.0.1:9000"
        );
        Ok(())
    }

    #[test]
    fn test_keys_match_case_insensitively() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.ini");
        fs::write(
            &path,
            "[currency]\nfiat = USD\n\n[readings]\nBTC = 100\n\n[portfolio]\nbtc = 2\n",
        )?;

        let mut store = ConfigStore::open(&path)?;
        assert_eq!(store.standard_fiat()?, Fiat::Usd);
        assert_eq!(store.get_decimal(SECTION_READINGS, "btc")?, Decimal::from(100));

        store.set_standard_fiat(Fiat::Eur)?;
        let reread = ConfigStore::open(&path)?;
        assert_eq!(reread.standard_fiat()?, Fiat::Eur);
        assert_eq!(reread.keys(SECTION_CURRENCY).len(), 1);
        Ok(())
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.ini");
        let mut store = ConfigStore::init_at_path(&path)?;

        // A directory in place of the config makes the final rename fail.
        fs::remove_file(&path)?;
        fs::create_dir(&path)?;
        fs::write(path.join("keep"), "x")?;

        let result = store.set(SECTION_READINGS, "btc", "1");
        assert!(matches!(result, Err(HodlError::Io { .. })));
        assert!(!path.with_extension("ini.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_get_decimal_reads_scientific_notation() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let mut store = ConfigStore::init_at_path(temp_dir.path().join("config.ini"))?;
        store.set(SECTION_PORTFOLIO, "xrp", "1.5e2")?;
        assert_eq!(store.get_decimal(SECTION_PORTFOLIO, "xrp")?, Decimal::from(150));
        assert!(parse_decimal("twelve").is_none());
        Ok(())
    }

    #[test]
    fn test_open_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConfigStore::open(temp_dir.path().join("missing.ini"));
        assert!(matches!(result, Err(HodlError::Ini { .. })));
    }
}
