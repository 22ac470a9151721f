//! Output side of `conquery gen`: compare rendered files against disk and
//! replace the stale ones.

use std::path::{Path, PathBuf};

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

impl GeneratedFile {
    /// True when the file on disk is missing or differs from `content`.
    fn is_stale(&self) -> bool {
        std::fs::read_to_string(&self.path).map_or(true, |on_disk| on_disk != self.content)
    }
}

/// What `sync` does with stale files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Write,
    /// Report stale files, touch nothing.
    DryRun,
    /// Report stale files; the caller fails when any exist.
    Check,
}

/// Files that differed from their rendered content, in path order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub stale: Vec<PathBuf>,
    /// Whether `stale` was written to disk.
    pub written: bool,
}

/// Find stale outputs and, in `Write` mode, replace each one atomically.
pub fn sync(files: &[GeneratedFile], mode: WriteMode) -> anyhow::Result<SyncReport> {
    let mut stale: Vec<&GeneratedFile> = files.iter().filter(|f| f.is_stale()).collect();
    stale.sort_by(|a, b| a.path.cmp(&b.path));

    let written = mode == WriteMode::Write;
    if written {
        for file in &stale {
            write_atomic(&file.path, &file.content)?;
            tracing::info!(path = %file.path.display(), "wrote generated file");
        }
    }

    Ok(SyncReport {
        stale: stale.into_iter().map(|f| f.path.clone()).collect(),
        written,
    })
}

fn write_atomic(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("failed to create directory {}: {e}", parent.display()))?;
    }

    let tmp = tmp_path(path);
    std::fs::write(&tmp, content)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", tmp.display()))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        anyhow::anyhow!("failed to replace {} with {}: {e}", path.display(), tmp.display())
    })
}

/// Sibling temp file, so the final rename stays on one filesystem.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("conquery-write-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn tmp_path_is_a_sibling() {
        assert_eq!(tmp_path(Path::new("a/gen.rs")), PathBuf::from("a/gen.rs.tmp"));
        assert_eq!(tmp_path(Path::new("a/gen")), PathBuf::from("a/gen.tmp"));
    }

    #[test]
    fn writes_only_stale_files() {
        let dir = scratch("sync");
        let fresh = GeneratedFile {
            path: dir.join("a.rs"),
            content: "// a\n".to_string(),
        };
        let file = GeneratedFile {
            path: dir.join("nested/gen.rs"),
            content: "// v1\n".to_string(),
        };
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&fresh.path, &fresh.content).unwrap();

        let files = [file.clone(), fresh.clone()];
        let check = sync(&files, WriteMode::Check).unwrap();
        assert_eq!(check, SyncReport {
            stale: vec![file.path.clone()],
            written: false,
        });
        assert!(!file.path.exists());

        let report = sync(&files, WriteMode::Write).unwrap();
        assert_eq!(report.stale, vec![file.path.clone()]);
        assert!(report.written);
        assert_eq!(std::fs::read_to_string(&file.path).unwrap(), "// v1\n");
        assert!(!tmp_path(&file.path).exists());

        assert_eq!(sync(&files, WriteMode::Check).unwrap().stale, Vec::<PathBuf>::new());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn stale_paths_are_sorted() {
        let dir = scratch("order");
        let files = [
            GeneratedFile {
                path: dir.join("b.rs"),
                content: String::new(),
            },
            GeneratedFile {
                path: dir.join("a.rs"),
                content: String::new(),
            },
        ];
        let report = sync(&files, WriteMode::DryRun).unwrap();
        assert_eq!(report.stale, vec![dir.join("a.rs"), dir.join("b.rs")]);
        assert!(!report.written);
        assert!(!dir.exists());
    }
}
