pub mod engine;
pub mod executor;
pub mod planner;
pub mod substitution;

pub use crate::domain::model::{CopyPlan, ModuleInfo, PackageInfo, Substitution};
pub use crate::domain::ports::{ConfigProvider, MetadataProvider, ModuleEditor, SourceRewriter, Storage};
pub use crate::utils::error::Result;
