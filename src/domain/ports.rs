use crate::domain::model::PackageInfo;
use crate::utils::error::Result;
use std::path::Path;

/// Package and module information for directories of a Go source tree.
pub trait MetadataProvider {
    fn package_info(&self, dir: &Path) -> Result<PackageInfo>;
    /// Module path declared by the `go.mod` file in `dir`.
    fn module_path(&self, dir: &Path) -> Result<String>;
}

pub trait SourceRewriter {
    /// 重新整理 import 區塊；`local_module` 的 import 會獨立成一組
    fn normalize_imports(&self, file: &Path, local_module: Option<&str>) -> Result<()>;
}

pub trait ModuleEditor {
    fn set_module_path(&self, dir: &Path, module: &str) -> Result<()>;
    fn tidy(&self, dir: &Path) -> Result<()>;
}

pub trait Storage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;
    /// Writes `data`, creating parent directories as needed.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
    fn is_file(&self, path: &Path) -> bool;
    /// Removes Go sources below `dir` and then any directory left empty.
    fn clean_dir(&self, dir: &Path) -> Result<()>;
}

pub trait ConfigProvider {
    fn src_dir(&self) -> &Path;
    fn dst_dir(&self) -> &Path;
    fn dst_module(&self) -> Option<&str>;
    fn local_imports(&self) -> bool;
    fn clean_destination(&self) -> bool;
    fn tidy(&self) -> bool;
    fn dry_run(&self) -> bool;
}
