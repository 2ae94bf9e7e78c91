use crate::codegen::{GeneratedFile, HEADER};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    /// Report planned changes without touching the disk.
    pub dry_run: bool,
    /// Fail if anything would change.
    pub check: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Update,
    /// A previously generated file no table maps to anymore.
    Remove,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChangeKind::Create => "create",
            ChangeKind::Update => "update",
            ChangeKind::Remove => "remove",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

#[derive(Debug, Default)]
pub struct WriteSummary {
    pub planned: Vec<FileChange>,
    pub applied: usize,
}

impl WriteSummary {
    pub fn is_clean(&self) -> bool {
        self.planned.is_empty()
    }
}

/// Compare `files` with the contents of `out_dir` and bring it up to date.
///
/// Only `.rs` files in `out_dir` that start with the `@generated` header are
/// considered for removal.
pub fn apply_generated_files(
    files: &[GeneratedFile],
    out_dir: &Path,
    opts: WriteOptions,
) -> anyhow::Result<WriteSummary> {
    let planned = plan(files, out_dir)?;
    let mut summary = WriteSummary {
        planned,
        applied: 0,
    };

    if opts.dry_run {
        for change in &summary.planned {
            println!("would {} {}", change.kind, change.path.display());
        }
        return Ok(summary);
    }

    if opts.check {
        if !summary.is_clean() {
            let listed: Vec<String> = summary
                .planned
                .iter()
                .map(|c| format!("{} ({})", c.path.display(), c.kind))
                .collect();
            anyhow::bail!("generated files are out of date: {}", listed.join(", "));
        }
        return Ok(summary);
    }

    for change in &summary.planned {
        match change.kind {
            ChangeKind::Create | ChangeKind::Update => {
                let Some(file) = files.iter().find(|f| f.path == change.path) else {
                    continue;
                };
                write_atomic(&file.path, &file.content)?;
            }
            ChangeKind::Remove => std::fs::remove_file(&change.path).map_err(|e| {
                anyhow::anyhow!("failed to remove {}: {e}", change.path.display())
            })?,
        }
        tracing::info!(path = %change.path.display(), kind = %change.kind, "applied");
        summary.applied += 1;
    }

    Ok(summary)
}

/// Changes needed for `out_dir` to hold exactly `files`, sorted by path.
pub fn plan(files: &[GeneratedFile], out_dir: &Path) -> anyhow::Result<Vec<FileChange>> {
    let mut changes = Vec::new();

    for file in files {
        let kind = match std::fs::read_to_string(&file.path) {
            Ok(existing) if existing == file.content => {
                tracing::debug!(path = %file.path.display(), "unchanged");
                continue;
            }
            Ok(_) => ChangeKind::Update,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => ChangeKind::Create,
            Err(e) => anyhow::bail!("failed to read {}: {e}", file.path.display()),
        };
        changes.push(FileChange {
            path: file.path.clone(),
            kind,
        });
    }

    for path in stale_files(files, out_dir)? {
        changes.push(FileChange {
            path,
            kind: ChangeKind::Remove,
        });
    }

    changes.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(changes)
}

fn stale_files(files: &[GeneratedFile], out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(out_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => anyhow::bail!("failed to list {}: {e}", out_dir.display()),
    };

    let mut stale = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("rs") {
            continue;
        }
        if files.iter().any(|f| f.path == path) {
            continue;
        }
        let generated = std::fs::read_to_string(&path)
            .map(|content| content.starts_with(HEADER))
            .unwrap_or(false);
        if generated {
            stale.push(path);
        }
    }
    Ok(stale)
}

/// Replace `path` with `content` by renaming a sibling temporary file over it.
pub fn write_atomic(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("failed to create directory {}: {e}", parent.display()))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, content)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .map_err(|e| anyhow::anyhow!("failed to move {} into place: {e}", path.display()))
}
