use crate::domain::model::is_go_source;
use crate::domain::ports::Storage;
use crate::utils::error::{MirageError, Result};
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

fn walk_error(dir: &Path, err: walkdir::Error) -> MirageError {
    let path = err.path().unwrap_or(dir).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    MirageError::copy(path, source)
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| MirageError::copy(path, e))
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| MirageError::copy(parent, e))?;
        }

        fs::write(path, data).map_err(|e| MirageError::copy(path, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o644))
                .map_err(|e| MirageError::copy(path, e))?;
        }

        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn clean_dir(&self, dir: &Path) -> Result<()> {
        if !dir.is_dir() {
            tracing::debug!("Nothing to clean at {}", dir.display());
            return Ok(());
        }

        // 先刪除 Go 原始碼，略過 . 開頭的檔案與目錄
        for entry in WalkDir::new(dir).into_iter().filter_entry(|e| !is_hidden(e)) {
            let entry = entry.map_err(|e| walk_error(dir, e))?;
            if entry.file_type().is_file() && is_go_source(entry.path()) {
                fs::remove_file(entry.path()).map_err(|e| MirageError::copy(entry.path(), e))?;
            }
        }

        // 再由下往上移除空目錄，目的地根目錄保留
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_entry(|e| !is_hidden(e))
        {
            let entry = entry.map_err(|e| walk_error(dir, e))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let is_empty = fs::read_dir(entry.path())
                .map_err(|e| MirageError::copy(entry.path(), e))?
                .next()
                .is_none();
            if is_empty {
                fs::remove_dir(entry.path()).map_err(|e| MirageError::copy(entry.path(), e))?;
            }
        }

        Ok(())
    }
}
