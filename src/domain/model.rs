use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Go 原始碼副檔名；只有這類檔案會做 import 改寫
pub const GO_SOURCE_EXT: &str = "go";

/// Subtree of the destination that receives every copied dependency.
pub const INTERNAL_DIR: &str = "internal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub path: String,
    pub dir: PathBuf,
    pub go_mod: PathBuf,
}

impl ModuleInfo {
    /// Returns the part of `import_path` below this module, if the import
    /// path is strictly inside it (`<module>/<suffix>`).
    pub fn suffix_of<'a>(&self, import_path: &'a str) -> Option<&'a str> {
        import_path
            .strip_prefix(self.path.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub import_path: String,
    pub module: ModuleInfo,
    pub files: Vec<String>,
    pub deps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedPackage {
    pub import_path: String,
    pub dst_import_path: String,
    pub src_dir: PathBuf,
    pub dst_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyPlan {
    pub src_import_path: String,
    pub src_module: ModuleInfo,
    pub dst_dir: PathBuf,
    pub dst_module: String,
    pub packages: Vec<PlannedPackage>,
    pub files: BTreeMap<PathBuf, PathBuf>,
    pub substitutions: Vec<Substitution>,
}

impl CopyPlan {
    pub fn dst_go_mod(&self) -> PathBuf {
        self.dst_dir.join("go.mod")
    }

    pub fn source_files(&self) -> impl Iterator<Item = (&PathBuf, &PathBuf)> {
        self.files.iter().filter(|(src, _)| is_go_source(src))
    }

    pub fn other_files(&self) -> impl Iterator<Item = (&PathBuf, &PathBuf)> {
        self.files.iter().filter(|(src, _)| !is_go_source(src))
    }

    pub fn dependency_count(&self) -> usize {
        self.packages.len().saturating_sub(1)
    }
}

pub fn is_go_source(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(GO_SOURCE_EXT)
}

impl fmt::Display for CopyPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "source:      {}", self.src_import_path)?;
        writeln!(f, "module:      {} ({})", self.src_module.path, self.src_module.dir.display())?;
        writeln!(f, "destination: {} ({})", self.dst_module, self.dst_dir.display())?;
        writeln!(f, "substitutions:")?;
        for sub in &self.substitutions {
            writeln!(f, "  {} => {}", sub.from, sub.to)?;
        }
        writeln!(f, "files:")?;
        for (src, dst) in &self.files {
            writeln!(f, "  {} -> {}", src.display(), dst.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(path: &str) -> ModuleInfo {
        ModuleInfo {
            path: path.to_string(),
            dir: PathBuf::from("/src"),
            go_mod: PathBuf::from("/src/go.mod"),
        }
    }

    #[test]
    fn test_suffix_requires_segment_boundary() {
        let m = module("example.com/foo");
        assert_eq!(m.suffix_of("example.com/foo/x"), Some("x"));
        assert_eq!(m.suffix_of("example.com/foo/x/y"), Some("x/y"));
        assert_eq!(m.suffix_of("example.com/foobar/x"), None);
        assert_eq!(m.suffix_of("example.com/foo"), None);
        assert_eq!(m.suffix_of("other.org/example.com/foo/x"), None);
    }

    #[test]
    fn test_display_lists_substitutions_and_files() {
        let mut files = BTreeMap::new();
        files.insert(PathBuf::from("/src/cmd/tool/main.go"), PathBuf::from("/dst/main.go"));
        files.insert(
            PathBuf::from("/src/util/util.go"),
            PathBuf::from("/dst/internal/util/util.go"),
        );
        let plan = CopyPlan {
            src_import_path: "example.com/m/cmd/tool".to_string(),
            src_module: ModuleInfo {
                path: "example.com/m".to_string(),
                dir: PathBuf::from("/src"),
                go_mod: PathBuf::from("/src/go.mod"),
            },
            dst_dir: PathBuf::from("/dst"),
            dst_module: "example.com/dst".to_string(),
            packages: Vec::new(),
            files,
            substitutions: vec![
                Substitution {
                    from: "example.com/m/cmd/tool".to_string(),
                    to: "example.com/dst".to_string(),
                },
                Substitution {
                    from: "example.com/m/util".to_string(),
                    to: "example.com/dst/internal/util".to_string(),
                },
            ],
        };

        let dump = plan.to_string();

        assert!(dump.contains("source:      example.com/m/cmd/tool\n"));
        assert!(dump.contains("destination: example.com/dst (/dst)\n"));
        assert!(dump.contains("  example.com/m/cmd/tool => example.com/dst\n"));
        assert!(dump.contains("  example.com/m/util => example.com/dst/internal/util\n"));
        assert!(dump.contains("  /src/cmd/tool/main.go -> /dst/main.go\n"));
        assert!(dump.contains("  /src/util/util.go -> /dst/internal/util/util.go\n"));
        assert!(dump.find("substitutions:").unwrap() < dump.find("files:").unwrap());
    }

    #[test]
    fn test_is_go_source() {
        assert!(is_go_source(Path::new("/a/b/main.go")));
        assert!(!is_go_source(Path::new("/a/b/asm_amd64.s")));
        assert!(!is_go_source(Path::new("/a/b/go")));
    }
}
