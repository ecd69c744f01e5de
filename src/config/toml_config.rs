use crate::utils::error::{MirageError, Result};
use crate::utils::validation::{validate_module_path, validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub destination: Option<DestinationConfig>,
    pub toolchain: Option<ToolchainConfig>,
    pub copy: Option<CopyConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DestinationConfig {
    pub module: Option<String>,
    pub local_imports: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainConfig {
    pub go: Option<String>,
    pub goimports: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyConfig {
    pub clean: Option<bool>,
    pub tidy: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MirageError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MirageError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GO_MODULE})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn dst_module(&self) -> Option<&str> {
        self.destination.as_ref()?.module.as_deref()
    }

    pub fn local_imports(&self) -> Option<bool> {
        self.destination.as_ref()?.local_imports
    }

    pub fn go_binary(&self) -> Option<&str> {
        self.toolchain.as_ref()?.go.as_deref()
    }

    pub fn goimports_binary(&self) -> Option<&str> {
        self.toolchain.as_ref()?.goimports.as_deref()
    }

    pub fn clean(&self) -> Option<bool> {
        self.copy.as_ref()?.clean
    }

    pub fn tidy(&self) -> Option<bool> {
        self.copy.as_ref()?.tidy
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(module) = self.dst_module() {
            validate_module_path("destination.module", module)?;
        }
        if let Some(go) = self.go_binary() {
            validate_non_empty_string("toolchain.go", go)?;
        }
        if let Some(goimports) = self.goimports_binary() {
            validate_non_empty_string("toolchain.goimports", goimports)?;
        }
        Ok(())
    }
}
