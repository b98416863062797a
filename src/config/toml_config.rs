use crate::core::importer::ImportOptions;
use crate::core::nickname::NicknameExpander;
use crate::utils::error::{CrmError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const LOG_FORMATS: &[&str] = &["compact", "json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub nicknames: NicknameConfig,
    pub store: StoreConfig,
    pub import: ImportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NicknameConfig {
    /// Replaces the embedded nickname table.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub snapshot: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub format_contacts: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "compact".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CrmError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CrmError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SNAPSHOT_PATH})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CrmError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(path) = &self.nicknames.path {
            validation::validate_path("nicknames.path", path)?;
        }
        if let Some(path) = &self.store.snapshot {
            validation::validate_path("store.snapshot", path)?;
        }
        validation::validate_one_of("logging.format", &self.logging.format, LOG_FORMATS)?;
        Ok(())
    }

    /// The configured table, or the embedded one when no path is set.
    pub fn nickname_expander(&self) -> Result<NicknameExpander> {
        match &self.nicknames.path {
            Some(path) => NicknameExpander::from_file(path),
            None => Ok(NicknameExpander::embedded()),
        }
    }

    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            format_contacts: self.import.format_contacts,
        }
    }

    /// Command line value first, then `store.snapshot`.
    pub fn snapshot_path(&self, cli_override: Option<String>) -> Result<String> {
        let chosen = cli_override.or_else(|| self.store.snapshot.clone());
        let path = validation::validate_required_field("store.snapshot", &chosen)?;
        validation::validate_path("store.snapshot", path)?;
        Ok(path.clone())
    }

    pub fn json_logging(&self) -> bool {
        self.logging.format == "json"
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
