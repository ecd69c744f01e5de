use crate::domain::model::{CopyPlan, ModuleInfo, PackageInfo, PlannedPackage, Substitution, INTERNAL_DIR};
use crate::domain::ports::MetadataProvider;
use crate::utils::error::{MirageError, Result};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// Computes which packages of the source module have to be copied, where
/// every file lands and how import paths are renamed.
pub struct ClosurePlanner<'a, M: MetadataProvider> {
    metadata: &'a M,
}

impl<'a, M: MetadataProvider> ClosurePlanner<'a, M> {
    pub fn new(metadata: &'a M) -> Self {
        Self { metadata }
    }

    /// Relative `entry_dir` and `dst_dir` are resolved against the current
    /// directory; every path in the returned plan is absolute.
    pub fn plan(&self, entry_dir: &Path, dst_dir: &Path, dst_module: &str) -> Result<CopyPlan> {
        let entry_dir = &absolute_dir("src_dir", entry_dir)?;
        let dst_dir = &absolute_dir("dst_dir", dst_dir)?;

        let entry = self
            .metadata
            .package_info(entry_dir)
            .map_err(|e| MirageError::metadata(format!("source {}", entry_dir.display()), e))?;

        tracing::debug!(
            "Entry package {} in module {}",
            entry.import_path,
            entry.module.path
        );

        let mut builder = PlanBuilder::new(&entry, dst_dir, dst_module);
        builder.add_package(&entry, entry_dir, dst_dir, dst_module.to_string())?;

        let mut done: HashSet<String> = HashSet::new();
        done.insert(entry.import_path.clone());

        let mut queue: VecDeque<String> = entry.deps.iter().cloned().collect();

        while let Some(dep) = queue.pop_front() {
            if !done.insert(dep.clone()) {
                continue;
            }

            let Some(suffix) = entry.module.suffix_of(&dep) else {
                if dep == entry.module.path {
                    tracing::warn!(
                        "⚠️ {} is the module root package; it stays an external import",
                        dep
                    );
                }
                continue;
            };

            let segments = split_suffix(&dep, suffix)?;
            let dep_src_dir = join_segments(&entry.module.dir, &segments);
            let dep_dst_dir = join_segments(&dst_dir.join(INTERNAL_DIR), &segments);

            tracing::debug!("Fetching dependency {} from {}", dep, dep_src_dir.display());
            let info = self.metadata.package_info(&dep_src_dir).map_err(|e| {
                MirageError::metadata(format!("dependency package {:?}", suffix), e)
            })?;

            check_resolved(&dep, &entry.module, &info)?;
            builder.claim_suffix(&dep, suffix)?;

            let dst_import_path = format!("{}/{}/{}", dst_module, INTERNAL_DIR, suffix);
            builder.add_package(&info, &dep_src_dir, &dep_dst_dir, dst_import_path)?;

            queue.extend(info.deps.iter().filter(|d| !done.contains(*d)).cloned());
        }

        let plan = builder.finish();
        tracing::info!(
            "📦 Planned {} package(s), {} file(s)",
            plan.packages.len(),
            plan.files.len()
        );
        Ok(plan)
    }
}

struct PlanBuilder {
    plan: CopyPlan,
    // 小寫後綴 -> import path，偵測大小寫不同但落在同一目錄的套件
    suffixes: HashMap<String, String>,
    // 目的檔案 -> 來源檔案
    destinations: HashMap<PathBuf, PathBuf>,
}

impl PlanBuilder {
    fn new(entry: &PackageInfo, dst_dir: &Path, dst_module: &str) -> Self {
        Self {
            plan: CopyPlan {
                src_import_path: entry.import_path.clone(),
                src_module: entry.module.clone(),
                dst_dir: dst_dir.to_path_buf(),
                dst_module: dst_module.to_string(),
                packages: Vec::new(),
                files: BTreeMap::new(),
                substitutions: Vec::new(),
            },
            suffixes: HashMap::new(),
            destinations: HashMap::new(),
        }
    }

    fn claim_suffix(&mut self, import_path: &str, suffix: &str) -> Result<()> {
        if let Some(existing) = self.suffixes.get(&suffix.to_lowercase()) {
            return Err(MirageError::invariant(
                import_path,
                format!("destination internal/{} is already used by {}", suffix, existing),
            ));
        }
        self.suffixes
            .insert(suffix.to_lowercase(), import_path.to_string());
        Ok(())
    }

    fn add_package(
        &mut self,
        info: &PackageInfo,
        src_dir: &Path,
        dst_dir: &Path,
        dst_import_path: String,
    ) -> Result<()> {
        for file in &info.files {
            if Path::new(file).is_absolute() {
                return Err(MirageError::invariant(
                    &info.import_path,
                    format!("file {} is not relative to the package directory", file),
                ));
            }

            let src = src_dir.join(file);
            let dst = dst_dir.join(file);

            if let Some(other) = self.destinations.get(&dst).filter(|other| **other != src) {
                return Err(MirageError::invariant(
                    &info.import_path,
                    format!(
                        "{} and {} would both be copied to {}",
                        src.display(),
                        other.display(),
                        dst.display()
                    ),
                ));
            }
            self.destinations.insert(dst.clone(), src.clone());
            self.plan.files.insert(src, dst);
        }

        self.plan.substitutions.push(Substitution {
            from: info.import_path.clone(),
            to: dst_import_path.clone(),
        });
        self.plan.packages.push(PlannedPackage {
            import_path: info.import_path.clone(),
            dst_import_path,
            src_dir: src_dir.to_path_buf(),
            dst_dir: dst_dir.to_path_buf(),
        });
        Ok(())
    }

    fn finish(self) -> CopyPlan {
        self.plan
    }
}

fn absolute_dir(field_name: &str, dir: &Path) -> Result<PathBuf> {
    std::path::absolute(dir).map_err(|e| MirageError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: dir.display().to_string(),
        reason: format!("cannot resolve to an absolute path: {}", e),
    })
}

fn split_suffix<'s>(import_path: &str, suffix: &'s str) -> Result<Vec<&'s str>> {
    let segments: Vec<&str> = suffix.split('/').collect();
    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == "..")
    {
        return Err(MirageError::invariant(
            import_path,
            "import path has an empty, '.' or '..' segment",
        ));
    }
    Ok(segments)
}

fn join_segments(base: &Path, segments: &[&str]) -> PathBuf {
    segments.iter().fold(base.to_path_buf(), |dir, s| dir.join(s))
}

fn check_resolved(expected: &str, module: &ModuleInfo, info: &PackageInfo) -> Result<()> {
    if info.import_path != expected {
        return Err(MirageError::invariant(
            expected,
            format!("its directory holds package {} instead", info.import_path),
        ));
    }
    if info.module.path != module.path {
        return Err(MirageError::invariant(
            expected,
            format!(
                "it belongs to module {} rather than {}",
                info.module.path, module.path
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const SRC_ROOT: &str = "/src/m";
    const DST_ROOT: &str = "/dst";

    struct FakeMetadata {
        module: ModuleInfo,
        packages: HashMap<PathBuf, PackageInfo>,
        fetched: RefCell<Vec<PathBuf>>,
    }

    impl FakeMetadata {
        fn new(module_path: &str) -> Self {
            Self {
                module: ModuleInfo {
                    path: module_path.to_string(),
                    dir: PathBuf::from(SRC_ROOT),
                    go_mod: PathBuf::from(SRC_ROOT).join("go.mod"),
                },
                packages: HashMap::new(),
                fetched: RefCell::new(Vec::new()),
            }
        }

        fn with(mut self, suffix: &str, files: &[&str], deps: &[&str]) -> Self {
            let import_path = format!("{}/{}", self.module.path, suffix);
            self.packages.insert(
                PathBuf::from(SRC_ROOT).join(suffix),
                PackageInfo {
                    import_path,
                    module: self.module.clone(),
                    files: files.iter().map(|f| f.to_string()).collect(),
                    deps: deps.iter().map(|d| d.to_string()).collect(),
                },
            );
            self
        }

        fn fetch_count(&self, suffix: &str) -> usize {
            let dir = PathBuf::from(SRC_ROOT).join(suffix);
            self.fetched.borrow().iter().filter(|d| **d == dir).count()
        }
    }

    impl MetadataProvider for FakeMetadata {
        fn package_info(&self, dir: &Path) -> Result<PackageInfo> {
            self.fetched.borrow_mut().push(dir.to_path_buf());
            self.packages.get(dir).cloned().ok_or_else(|| MirageError::ToolError {
                command: "go list -json .".to_string(),
                output: format!("no Go package in {}", dir.display()),
            })
        }

        fn module_path(&self, _dir: &Path) -> Result<String> {
            Ok(self.module.path.clone())
        }
    }

    fn plan(metadata: &FakeMetadata, entry: &str) -> Result<CopyPlan> {
        ClosurePlanner::new(metadata).plan(
            &PathBuf::from(SRC_ROOT).join(entry),
            Path::new(DST_ROOT),
            "example.com/dst",
        )
    }

    fn froms(plan: &CopyPlan) -> Vec<&str> {
        plan.substitutions.iter().map(|s| s.from.as_str()).collect()
    }

    #[test]
    fn test_destination_path_shape() {
        let metadata = FakeMetadata::new("example.com/m")
            .with("cmd/tool", &["main.go"], &["example.com/m/internal/util", "fmt"])
            .with("internal/util", &["util.go", "util_amd64.s"], &["strings"]);

        let plan = plan(&metadata, "cmd/tool").unwrap();

        assert_eq!(
            plan.substitutions,
            vec![
                Substitution {
                    from: "example.com/m/cmd/tool".to_string(),
                    to: "example.com/dst".to_string(),
                },
                Substitution {
                    from: "example.com/m/internal/util".to_string(),
                    to: "example.com/dst/internal/internal/util".to_string(),
                },
            ]
        );
        assert_eq!(
            plan.files.get(Path::new("/src/m/cmd/tool/main.go")),
            Some(&PathBuf::from("/dst/main.go"))
        );
        assert_eq!(
            plan.files.get(Path::new("/src/m/internal/util/util.go")),
            Some(&PathBuf::from("/dst/internal/internal/util/util.go"))
        );
        assert_eq!(
            plan.files.get(Path::new("/src/m/internal/util/util_amd64.s")),
            Some(&PathBuf::from("/dst/internal/internal/util/util_amd64.s"))
        );
        assert_eq!(plan.files.len(), 3);
        assert_eq!(plan.dependency_count(), 1);
    }

    #[test]
    fn test_transitive_closure_is_complete() {
        let metadata = FakeMetadata::new("example.com/m")
            .with("cmd/tool", &["main.go"], &["example.com/m/a"])
            .with("a", &["a.go"], &["example.com/m/b"])
            .with("b", &["b.go"], &["example.com/m/c/d"])
            .with("c/d", &["d.go"], &[]);

        let plan = plan(&metadata, "cmd/tool").unwrap();

        assert_eq!(
            froms(&plan),
            vec![
                "example.com/m/cmd/tool",
                "example.com/m/a",
                "example.com/m/b",
                "example.com/m/c/d",
            ]
        );
        assert_eq!(
            plan.files.get(Path::new("/src/m/c/d/d.go")),
            Some(&PathBuf::from("/dst/internal/c/d/d.go"))
        );
    }

    #[test]
    fn test_cycle_terminates_and_fetches_once() {
        let metadata = FakeMetadata::new("example.com/m")
            .with("cmd/tool", &["main.go"], &["example.com/m/a"])
            .with("a", &["a.go"], &["example.com/m/b"])
            .with("b", &["b.go"], &["example.com/m/a", "example.com/m/cmd/tool"]);

        let plan = plan(&metadata, "cmd/tool").unwrap();

        assert_eq!(plan.substitutions.len(), 3);
        assert_eq!(metadata.fetch_count("a"), 1);
        assert_eq!(metadata.fetch_count("b"), 1);
        // 入口套件只抓一次，且不會被放進 internal/
        assert_eq!(metadata.fetch_count("cmd/tool"), 1);
        assert!(!plan.files.values().any(|dst| dst.starts_with("/dst/internal/cmd")));
    }

    #[test]
    fn test_diamond_fetches_shared_dependency_once() {
        let metadata = FakeMetadata::new("example.com/m")
            .with("cmd/tool", &["main.go"], &["example.com/m/left", "example.com/m/right"])
            .with("left", &["left.go"], &["example.com/m/base"])
            .with("right", &["right.go"], &["example.com/m/base"])
            .with("base", &["base.go"], &[]);

        let plan = plan(&metadata, "cmd/tool").unwrap();

        assert_eq!(metadata.fetch_count("base"), 1);
        assert_eq!(
            froms(&plan).iter().filter(|f| **f == "example.com/m/base").count(),
            1
        );
    }

    #[test]
    fn test_external_dependencies_are_excluded() {
        let metadata = FakeMetadata::new("example.com/foo")
            .with(
                "cmd/tool",
                &["main.go"],
                &["example.com/foobar/x", "github.com/pkg/errors", "fmt", "example.com/foo/x"],
            )
            .with("x", &["x.go"], &[]);

        let plan = plan(&metadata, "cmd/tool").unwrap();

        assert_eq!(froms(&plan), vec!["example.com/foo/cmd/tool", "example.com/foo/x"]);
        assert!(plan.files.keys().all(|src| src.starts_with(SRC_ROOT)));
        assert_eq!(metadata.fetched.borrow().len(), 2);
    }

    #[test]
    fn test_module_root_package_stays_external() {
        let metadata = FakeMetadata::new("example.com/m")
            .with("cmd/tool", &["main.go"], &["example.com/m"]);

        let plan = plan(&metadata, "cmd/tool").unwrap();

        assert_eq!(froms(&plan), vec!["example.com/m/cmd/tool"]);
    }

    #[test]
    fn test_nested_fetch_failure_aborts_plan() {
        let metadata = FakeMetadata::new("example.com/m")
            .with("cmd/tool", &["main.go"], &["example.com/m/a"])
            .with("a", &["a.go"], &["example.com/m/b"])
            .with("b", &["b.go"], &["example.com/m/v2/missing"]);

        let err = plan(&metadata, "cmd/tool").unwrap_err();

        match err {
            MirageError::MetadataError { target, .. } => assert!(target.contains("v2/missing")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_entry_fetch_failure() {
        let metadata = FakeMetadata::new("example.com/m");
        let err = plan(&metadata, "nowhere").unwrap_err();
        assert!(matches!(err, MirageError::MetadataError { .. }));
    }

    #[test]
    fn test_directory_with_other_package_is_rejected() {
        let mut metadata = FakeMetadata::new("example.com/m")
            .with("cmd/tool", &["main.go"], &["example.com/m/sub"])
            .with("sub", &["sub.go"], &[]);
        // sub 其實是獨立的 nested module
        let sub = metadata.packages.get_mut(Path::new("/src/m/sub")).unwrap();
        sub.module.path = "example.com/m/sub".to_string();

        let err = plan(&metadata, "cmd/tool").unwrap_err();
        assert!(matches!(err, MirageError::PlanningInvariantError { .. }));
    }

    #[test]
    fn test_case_only_collision_is_rejected() {
        let metadata = FakeMetadata::new("example.com/m")
            .with("cmd/tool", &["main.go"], &["example.com/m/Util", "example.com/m/util"])
            .with("Util", &["a.go"], &[])
            .with("util", &["b.go"], &[]);

        let err = plan(&metadata, "cmd/tool").unwrap_err();
        match err {
            MirageError::PlanningInvariantError { import_path, .. } => {
                assert_eq!(import_path, "example.com/m/util")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_destination_file_collision_is_rejected() {
        let metadata = FakeMetadata::new("example.com/m")
            .with("cmd/tool", &["main.go", "internal/a/data.txt"], &["example.com/m/a"])
            .with("a", &["data.txt"], &[]);

        let err = plan(&metadata, "cmd/tool").unwrap_err();
        assert!(matches!(err, MirageError::PlanningInvariantError { .. }));
    }

    #[test]
    fn test_relative_inputs_give_absolute_plan() {
        let mut metadata = FakeMetadata::new("example.com/m")
            .with("internal/util", &["util.go"], &[]);
        let entry_dir = std::path::absolute("cmd/tool").unwrap();
        metadata.packages.insert(
            entry_dir.clone(),
            PackageInfo {
                import_path: "example.com/m/cmd/tool".to_string(),
                module: metadata.module.clone(),
                files: vec!["main.go".to_string()],
                deps: vec!["example.com/m/internal/util".to_string()],
            },
        );

        let plan = ClosurePlanner::new(&metadata)
            .plan(Path::new("cmd/tool"), Path::new("../dst"), "example.com/dst")
            .unwrap();

        let dst_root = std::path::absolute("../dst").unwrap();
        assert_eq!(plan.files.len(), 2);
        assert!(plan
            .files
            .iter()
            .all(|(src, dst)| src.is_absolute() && dst.is_absolute()));
        assert_eq!(
            plan.files.get(&entry_dir.join("main.go")),
            Some(&dst_root.join("main.go"))
        );
        assert_eq!(
            plan.files.get(Path::new("/src/m/internal/util/util.go")),
            Some(&dst_root.join("internal").join("internal").join("util").join("util.go"))
        );
        assert!(plan.dst_dir.is_absolute());
        assert!(plan.packages.iter().all(|p| p.src_dir.is_absolute() && p.dst_dir.is_absolute()));
    }

    #[test]
    fn test_planning_is_idempotent() {
        let metadata = FakeMetadata::new("example.com/m")
            .with("cmd/tool", &["main.go"], &["example.com/m/a", "example.com/m/b"])
            .with("a", &["a.go"], &["example.com/m/b"])
            .with("b", &["b.go", "b.h"], &["example.com/m/a"]);

        let first = plan(&metadata, "cmd/tool").unwrap();
        let second = plan(&metadata, "cmd/tool").unwrap();
        assert_eq!(first, second);
    }
}
