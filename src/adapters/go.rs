use crate::adapters::process::{exec_in_dir, exec_in_dir_json};
use crate::domain::model::{ModuleInfo, PackageInfo};
use crate::domain::ports::{MetadataProvider, ModuleEditor, SourceRewriter};
use crate::utils::error::{MirageError, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Go toolchain backed by the `go` and `goimports` binaries.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    go: String,
    goimports: String,
}

impl Default for GoToolchain {
    fn default() -> Self {
        Self::new("go", "goimports")
    }
}

impl GoToolchain {
    pub fn new(go: impl Into<String>, goimports: impl Into<String>) -> Self {
        Self {
            go: go.into(),
            goimports: goimports.into(),
        }
    }
}

/// Subset of `go list -json` output.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GoListPackage {
    pub import_path: String,
    pub module: Option<GoListModule>,
    pub go_files: Vec<String>,
    pub cgo_files: Vec<String>,
    pub ignored_go_files: Vec<String>,
    pub ignored_other_files: Vec<String>,
    pub c_files: Vec<String>,
    #[serde(rename = "CXXFiles")]
    pub cxx_files: Vec<String>,
    pub m_files: Vec<String>,
    pub h_files: Vec<String>,
    pub f_files: Vec<String>,
    pub s_files: Vec<String>,
    pub swig_files: Vec<String>,
    #[serde(rename = "SwigCXXFiles")]
    pub swig_cxx_files: Vec<String>,
    pub syso_files: Vec<String>,
    pub embed_files: Vec<String>,
    pub deps: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GoListModule {
    pub path: String,
    pub dir: PathBuf,
    pub go_mod: PathBuf,
}

impl GoListPackage {
    /// Every file the package needs, in category order without duplicates.
    pub fn all_files(&self) -> Vec<String> {
        let categories = [
            &self.go_files,
            &self.cgo_files,
            &self.ignored_go_files,
            &self.ignored_other_files,
            &self.c_files,
            &self.cxx_files,
            &self.m_files,
            &self.h_files,
            &self.f_files,
            &self.s_files,
            &self.swig_files,
            &self.swig_cxx_files,
            &self.syso_files,
            &self.embed_files,
        ];

        let mut seen = HashSet::new();
        categories
            .into_iter()
            .flatten()
            .filter(|f| seen.insert(f.as_str()))
            .cloned()
            .collect()
    }

    pub fn into_package_info(self) -> Result<PackageInfo> {
        let files = self.all_files();
        let module = self.module.ok_or_else(|| {
            MirageError::metadata(
                format!("package {}", self.import_path),
                "package is not part of a Go module",
            )
        })?;

        Ok(PackageInfo {
            import_path: self.import_path,
            module: ModuleInfo {
                path: module.path,
                dir: module.dir,
                go_mod: module.go_mod,
            },
            files,
            deps: self.deps,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GoModEdit {
    #[serde(rename = "Module")]
    module: GoModModule,
}

#[derive(Debug, Deserialize)]
struct GoModModule {
    #[serde(rename = "Path")]
    path: String,
}

impl MetadataProvider for GoToolchain {
    fn package_info(&self, dir: &Path) -> Result<PackageInfo> {
        let package: GoListPackage = exec_in_dir_json(dir, &self.go, &["list", "-json", "."])
            .map_err(|e| MirageError::metadata(dir.display().to_string(), e))?;
        package.into_package_info()
    }

    fn module_path(&self, dir: &Path) -> Result<String> {
        let edit: GoModEdit = exec_in_dir_json(dir, &self.go, &["mod", "edit", "-json", "go.mod"])
            .map_err(|e| MirageError::metadata(dir.join("go.mod").display().to_string(), e))?;
        Ok(edit.module.path)
    }
}

impl SourceRewriter for GoToolchain {
    fn normalize_imports(&self, file: &Path, local_module: Option<&str>) -> Result<()> {
        let dir = file.parent().unwrap_or_else(|| Path::new("."));
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MirageError::ValidationError {
                message: format!("invalid Go file name: {}", file.display()),
            })?;

        exec_in_dir(dir, &self.goimports, &goimports_args(name, local_module))
    }
}

/// `goimports -w [-local <module>] <file>`
fn goimports_args<'a>(file_name: &'a str, local_module: Option<&'a str>) -> Vec<&'a str> {
    let mut args = vec!["-w"];
    if let Some(module) = local_module {
        args.extend(["-local", module]);
    }
    args.push(file_name);
    args
}

impl ModuleEditor for GoToolchain {
    fn set_module_path(&self, dir: &Path, module: &str) -> Result<()> {
        exec_in_dir(dir, &self.go, &["mod", "edit", "-module", module])
    }

    fn tidy(&self, dir: &Path) -> Result<()> {
        exec_in_dir(dir, &self.go, &["mod", "tidy"])
    }
}
