use crate::core::substitution::ImportRewriter;
use crate::domain::model::CopyPlan;
use crate::domain::ports::{ModuleEditor, SourceRewriter, Storage};
use crate::utils::error::{MirageError, Result};

#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    pub local_imports: bool,
    pub clean: bool,
    pub tidy: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            local_imports: true,
            clean: true,
            tidy: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteReport {
    pub source_files: usize,
    pub other_files: usize,
}

/// Materializes a [`CopyPlan`] in the destination directory.
pub struct CopyExecutor<S: Storage, T: SourceRewriter + ModuleEditor> {
    storage: S,
    tools: T,
}

impl<S: Storage, T: SourceRewriter + ModuleEditor> CopyExecutor<S, T> {
    pub fn new(storage: S, tools: T) -> Self {
        Self { storage, tools }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn execute(&self, plan: &CopyPlan, options: &ExecuteOptions) -> Result<ExecuteReport> {
        let rewriter = ImportRewriter::new(&plan.substitutions)?;
        let mut report = ExecuteReport::default();

        if options.clean {
            tracing::info!("🧹 Cleaning destination...");
            self.storage.clean_dir(&plan.dst_dir)?;
        }

        tracing::info!("📝 Preparing go.mod...");
        let go_mod = self.storage.read_file(&plan.src_module.go_mod)?;
        self.storage.write_file(&plan.dst_go_mod(), &go_mod)?;
        self.tools.set_module_path(&plan.dst_dir, &plan.dst_module)?;

        tracing::info!("📄 Copying Go source files...");
        let local_module = options.local_imports.then_some(plan.dst_module.as_str());
        for (src, dst) in plan.source_files() {
            let data = self.storage.read_file(src)?;
            let code = String::from_utf8(data).map_err(|e| {
                MirageError::copy(
                    src,
                    std::io::Error::new(std::io::ErrorKind::InvalidData, e.utf8_error()),
                )
            })?;

            let rewritten = rewriter.rewrite(&code);
            self.storage.write_file(dst, rewritten.as_bytes())?;
            self.tools.normalize_imports(dst, local_module)?;

            tracing::debug!("{} -> {}", src.display(), dst.display());
            report.source_files += 1;
        }

        tracing::info!("📄 Copying non-Go source files...");
        for (src, dst) in plan.other_files() {
            let data = self.storage.read_file(src)?;
            self.storage.write_file(dst, &data)?;
            tracing::debug!("{} -> {}", src.display(), dst.display());
            report.other_files += 1;
        }

        if options.tidy {
            tracing::info!("🔧 Tidying...");
            self.tools.tidy(&plan.dst_dir)?;
        }

        Ok(report)
    }
}
