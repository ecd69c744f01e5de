use crate::domain::model::Substitution;
use crate::utils::error::{MirageError, Result};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashMap;

/// Rewrites quoted import paths. Only a complete `"old/path"` literal
/// matches, so `"m/foo"` never touches `"m/foopkg"` or `"m/foo/bar"`.
#[derive(Debug)]
pub struct ImportRewriter {
    pattern: Option<Regex>,
    replacements: HashMap<String, String>,
}

impl ImportRewriter {
    pub fn new(substitutions: &[Substitution]) -> Result<Self> {
        let mut replacements = HashMap::with_capacity(substitutions.len());
        for sub in substitutions {
            let quoted = quote(&sub.from);
            if replacements.insert(quoted, quote(&sub.to)).is_some() {
                return Err(MirageError::invariant(
                    &sub.from,
                    "import path has more than one substitution",
                ));
            }
        }

        if replacements.is_empty() {
            return Ok(Self {
                pattern: None,
                replacements,
            });
        }

        let alternation = substitutions
            .iter()
            .map(|sub| regex::escape(&quote(&sub.from)))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&alternation).map_err(|e| MirageError::ValidationError {
            message: format!("cannot build import substitution pattern: {}", e),
        })?;

        Ok(Self {
            pattern: Some(pattern),
            replacements,
        })
    }

    pub fn rewrite<'t>(&self, code: &'t str) -> Cow<'t, str> {
        let Some(pattern) = &self.pattern else {
            return Cow::Borrowed(code);
        };
        pattern.replace_all(code, |caps: &Captures| {
            // 每個匹配必定來自 replacements 的 key
            self.replacements
                .get(&caps[0])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
    }
}

fn quote(import_path: &str) -> String {
    format!("\"{}\"", import_path)
}
