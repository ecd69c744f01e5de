use crate::core::executor::{CopyExecutor, ExecuteOptions, ExecuteReport};
use crate::core::planner::ClosurePlanner;
use crate::domain::model::CopyPlan;
use crate::domain::ports::{ConfigProvider, MetadataProvider, ModuleEditor, SourceRewriter, Storage};
use crate::utils::error::{MirageError, Result};
use crate::utils::validation::validate_module_path;

#[derive(Debug)]
pub struct RunReport {
    pub plan: CopyPlan,
    /// `None` 代表 dry run，沒有寫入任何檔案
    pub executed: Option<ExecuteReport>,
}

pub struct MirageEngine<C, M, S, T>
where
    C: ConfigProvider,
    M: MetadataProvider,
    S: Storage,
    T: SourceRewriter + ModuleEditor,
{
    config: C,
    metadata: M,
    executor: CopyExecutor<S, T>,
}

impl<C, M, S, T> MirageEngine<C, M, S, T>
where
    C: ConfigProvider,
    M: MetadataProvider,
    S: Storage,
    T: SourceRewriter + ModuleEditor,
{
    pub fn new(config: C, metadata: M, storage: S, tools: T) -> Self {
        Self {
            config,
            metadata,
            executor: CopyExecutor::new(storage, tools),
        }
    }

    /// Destination module: an explicit one wins, otherwise the module
    /// declared by `go.mod` in the destination directory.
    pub fn resolve_dst_module(&self) -> Result<String> {
        let dst_dir = self.config.dst_dir();

        let detected = if self.executor.storage().is_file(&dst_dir.join("go.mod")) {
            let module = self.metadata.module_path(dst_dir).map_err(|e| {
                MirageError::metadata(format!("destination {}", dst_dir.display()), e)
            })?;
            tracing::debug!("Detected destination module {}", module);
            Some(module)
        } else {
            None
        };

        let module = match (self.config.dst_module(), detected) {
            (Some(explicit), detected) => {
                if let Some(detected) = detected.filter(|d| d != explicit) {
                    tracing::warn!(
                        "⚠️ Destination go.mod declares {}, using {} instead",
                        detected,
                        explicit
                    );
                }
                explicit.to_string()
            }
            (None, Some(detected)) if !detected.is_empty() => detected,
            _ => {
                return Err(MirageError::ConfigError {
                    message: "no destination module available; use --dst-module or create go.mod at the destination"
                        .to_string(),
                })
            }
        };

        validate_module_path("dst_module", &module)?;
        Ok(module)
    }

    pub fn plan(&self) -> Result<CopyPlan> {
        let dst_module = self.resolve_dst_module()?;
        tracing::info!("🔍 Building work for {}...", dst_module);
        ClosurePlanner::new(&self.metadata).plan(
            self.config.src_dir(),
            self.config.dst_dir(),
            &dst_module,
        )
    }

    pub fn run(&self) -> Result<RunReport> {
        let plan = self.plan()?;

        if self.config.dry_run() {
            tracing::info!("🔍 DRY RUN MODE - destination left untouched");
            return Ok(RunReport {
                plan,
                executed: None,
            });
        }

        let options = ExecuteOptions {
            local_imports: self.config.local_imports(),
            clean: self.config.clean_destination(),
            tidy: self.config.tidy(),
        };
        let report = self.executor.execute(&plan, &options)?;
        tracing::info!(
            "✅ Copied {} Go file(s) and {} other file(s)",
            report.source_files,
            report.other_files
        );

        Ok(RunReport {
            plan,
            executed: Some(report),
        })
    }
}
