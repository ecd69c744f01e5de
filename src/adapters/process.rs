use crate::utils::error::{MirageError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::process::{Command, Output};

fn describe(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn run(dir: &Path, program: &str, args: &[&str]) -> Result<Output> {
    tracing::debug!("Running `{}` in {}", describe(program, args), dir.display());
    Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| MirageError::ToolError {
            command: describe(program, args),
            output: e.to_string(),
        })
}

/// Runs a command in `dir`; on failure the combined output is reported.
pub fn exec_in_dir(dir: &Path, program: &str, args: &[&str]) -> Result<()> {
    let output = run(dir, program, args)?;
    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(MirageError::ToolError {
            command: describe(program, args),
            output: format!("{}: {}", output.status, combined.trim()),
        });
    }
    Ok(())
}

/// Runs a command in `dir` and parses its stdout as JSON.
pub fn exec_in_dir_json<T: DeserializeOwned>(dir: &Path, program: &str, args: &[&str]) -> Result<T> {
    let output = run(dir, program, args)?;
    if !output.status.success() {
        return Err(MirageError::ToolError {
            command: describe(program, args),
            output: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(serde_json::from_slice(&output.stdout)?)
}
