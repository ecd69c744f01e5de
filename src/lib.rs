pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::{toml_config::TomlConfig, Settings};

pub use adapters::{GoToolchain, LocalStorage};
pub use core::{
    engine::{MirageEngine, RunReport},
    executor::{CopyExecutor, ExecuteOptions, ExecuteReport},
    planner::ClosurePlanner,
    substitution::ImportRewriter,
};
pub use domain::model::{CopyPlan, ModuleInfo, PackageInfo, PlannedPackage, Substitution};
pub use utils::error::{MirageError, Result};
