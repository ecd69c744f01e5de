#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_existing_dir, validate_module_path, validate_path, Validate};
use std::path::{Path, PathBuf};
use toml_config::TomlConfig;

/// Effective run settings: command line first, then the config file, then
/// built-in defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub src_dir: PathBuf,
    pub dst_dir: PathBuf,
    pub dst_module: Option<String>,
    pub local_imports: bool,
    pub clean: bool,
    pub tidy: bool,
    pub dry_run: bool,
    pub go_binary: String,
    pub goimports_binary: String,
}

impl Settings {
    pub fn new(src_dir: impl Into<PathBuf>, dst_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
            dst_dir: dst_dir.into(),
            dst_module: None,
            local_imports: true,
            clean: true,
            tidy: true,
            dry_run: false,
            go_binary: "go".to_string(),
            goimports_binary: "goimports".to_string(),
        }
    }

    /// 套用設定檔的值（只覆蓋有設定的欄位）
    pub fn with_file(mut self, file: &TomlConfig) -> Self {
        if let Some(module) = file.dst_module() {
            self.dst_module = Some(module.to_string());
        }
        if let Some(local_imports) = file.local_imports() {
            self.local_imports = local_imports;
        }
        if let Some(clean) = file.clean() {
            self.clean = clean;
        }
        if let Some(tidy) = file.tidy() {
            self.tidy = tidy;
        }
        if let Some(go) = file.go_binary() {
            self.go_binary = go.to_string();
        }
        if let Some(goimports) = file.goimports_binary() {
            self.goimports_binary = goimports.to_string();
        }
        self
    }

    #[cfg(feature = "cli")]
    pub fn from_cli(cli: &cli::CliConfig, file: Option<&TomlConfig>) -> Self {
        let mut settings = Self::new(&cli.src_dir, &cli.dst_dir);
        if let Some(file) = file {
            settings = settings.with_file(file);
        }

        if let Some(module) = &cli.dst_module {
            settings.dst_module = Some(module.clone());
        }
        if let Some(local_imports) = cli.local_imports {
            settings.local_imports = local_imports;
        }
        if cli.no_clean {
            settings.clean = false;
        }
        if cli.no_tidy {
            settings.tidy = false;
        }
        settings.dry_run = cli.dry_run;
        settings
    }
}

impl ConfigProvider for Settings {
    fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    fn dst_dir(&self) -> &Path {
        &self.dst_dir
    }

    fn dst_module(&self) -> Option<&str> {
        self.dst_module.as_deref()
    }

    fn local_imports(&self) -> bool {
        self.local_imports
    }

    fn clean_destination(&self) -> bool {
        self.clean
    }

    fn tidy(&self) -> bool {
        self.tidy
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_existing_dir("src_dir", &self.src_dir)?;
        validate_path("dst_dir", &self.dst_dir)?;
        if let Some(module) = &self.dst_module {
            validate_module_path("dst_module", module)?;
        }
        Ok(())
    }
}
