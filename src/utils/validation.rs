use crate::utils::error::{MirageError, Result};
use std::path::Path;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &Path) -> Result<()> {
    let display = path.display().to_string();
    if path.as_os_str().is_empty() {
        return Err(MirageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display,
            reason: "Path cannot be empty".to_string(),
        });
    }

    if display.contains('\0') {
        return Err(MirageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: display,
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_existing_dir(field_name: &str, path: &Path) -> Result<()> {
    validate_path(field_name, path)?;
    if !path.is_dir() {
        return Err(MirageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.display().to_string(),
            reason: "Directory does not exist".to_string(),
        });
    }
    Ok(())
}

/// Go 模組路徑：以 `/` 分隔、不可有空白或空段落
pub fn validate_module_path(field_name: &str, module: &str) -> Result<()> {
    validate_non_empty_string(field_name, module)?;

    let invalid = |reason: &str| MirageError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: module.to_string(),
        reason: reason.to_string(),
    };

    if module.chars().any(|c| c.is_whitespace() || c == '"' || c == '\\') {
        return Err(invalid("Module path contains whitespace, quotes or backslashes"));
    }

    if module
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(invalid("Module path has an empty, '.' or '..' segment"));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MirageError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
