use std::cmp::Reverse;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::mapping::MappingRules;
use crate::{RenameError, RenameFailure, RenameReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

/// A rename captured during the scan, relative to the unmodified tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTask {
    pub relative_path: PathBuf,
    pub kind: EntryKind,
    /// Directory name, or file name without its extension.
    pub lookup_key: String,
}

impl RenameTask {
    pub fn depth(&self) -> usize {
        self.relative_path.components().count()
    }
}

/// What happened to a single task.
#[derive(Debug)]
pub enum TaskOutcome {
    Renamed { from: PathBuf, to: PathBuf, collided: bool },
    Unchanged(PathBuf),
    Failed(RenameFailure),
}

/// Splits a name into base and extension at the last dot. Leading dots never
/// start an extension, so `.bashrc` has none.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading = name.len() - name.trim_start_matches('.').len();
    match name[leading..].rfind('.') {
        Some(idx) => name.split_at(leading + idx),
        None => (name, ""),
    }
}

/// Walks the tree under `root` and records every entry whose name matches a rule.
///
/// The root itself is never a candidate. Symlinks are not followed and are
/// matched against the file rules. Unreadable entries are skipped.
pub fn scan_tree(root: &Path, rules: &MappingRules) -> Vec<RenameTask> {
    info!("Scanning {:?} for entries to rename", root);

    let mut tasks = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };

        let Some(name) = entry.file_name().to_str() else {
            debug!("Skipping non UTF-8 name: {:?}", entry.path());
            continue;
        };

        let (kind, lookup_key) = if entry.file_type().is_dir() {
            if !rules.directories.contains(name) {
                continue;
            }
            (EntryKind::Directory, name)
        } else {
            let (base, _) = split_extension(name);
            if !rules.files.contains(base) {
                continue;
            }
            (EntryKind::File, base)
        };

        let relative_path = match entry.path().strip_prefix(root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => continue,
        };

        debug!("Found {:?} to rename: {:?}", kind, relative_path);
        tasks.push(RenameTask {
            relative_path,
            kind,
            lookup_key: lookup_key.to_string(),
        });
    }

    info!("Found {} entr(ies) to rename", tasks.len());
    tasks
}

/// Orders tasks so that children are renamed before their ancestors.
pub fn sort_deepest_first(tasks: &mut [RenameTask]) {
    tasks.sort_by_key(|task| Reverse(task.depth()));
}

/// First free path in `dir` for `name`, probing `base_1.ext`, `base_2.ext`, ...
/// Returns the path and whether probing was needed.
pub fn resolve_collision(dir: &Path, name: &str) -> (PathBuf, bool) {
    let candidate = dir.join(name);
    if !occupied(&candidate) {
        return (candidate, false);
    }

    let (base, ext) = split_extension(name);
    let mut counter = 1usize;
    loop {
        let candidate = dir.join(format!("{}_{}{}", base, counter, ext));
        if !occupied(&candidate) {
            return (candidate, true);
        }
        counter += 1;
    }
}

fn occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn validate_name(name: &str) -> Result<(), RenameError> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == name
    );
    if single_normal {
        Ok(())
    } else {
        Err(RenameError::InvalidName {
            name: name.to_string(),
        })
    }
}

fn target_name(task: &RenameTask, rules: &MappingRules) -> Option<String> {
    match task.kind {
        EntryKind::Directory => rules.directories.get(&task.lookup_key).map(str::to_string),
        EntryKind::File => {
            let file_name = task.relative_path.file_name()?.to_str()?;
            let (_, ext) = split_extension(file_name);
            rules
                .files
                .get(&task.lookup_key)
                .map(|new_base| format!("{}{}", new_base, ext))
        }
    }
}

fn failed(path: PathBuf, reason: RenameError) -> TaskOutcome {
    TaskOutcome::Failed(RenameFailure { path, reason })
}

fn execute_task(root: &Path, task: &RenameTask, rules: &MappingRules) -> TaskOutcome {
    let old_path = root.join(&task.relative_path);

    let Some(new_name) = target_name(task, rules) else {
        let reason = RenameError::InvalidName {
            name: task.lookup_key.clone(),
        };
        return failed(old_path, reason);
    };
    if let Err(reason) = validate_name(&new_name) {
        error!("Refusing to rename {:?}: {}", old_path, reason);
        return failed(old_path, reason);
    }

    let parent = old_path.parent().unwrap_or(root).to_path_buf();
    if parent.join(&new_name) == old_path {
        debug!("Name unchanged: {:?}", old_path);
        return TaskOutcome::Unchanged(old_path);
    }

    let (new_path, collided) = resolve_collision(&parent, &new_name);
    if collided {
        warn!(
            "Name collision for '{}', using {:?} instead",
            new_name,
            new_path.file_name().unwrap_or_default()
        );
    }

    match fs::rename(&old_path, &new_path) {
        Ok(()) => {
            info!("Renamed: {:?} -> {:?}", old_path, new_path);
            TaskOutcome::Renamed {
                from: old_path,
                to: new_path,
                collided,
            }
        }
        Err(err) => {
            error!("Failed to rename {:?}: {}", old_path, err);
            failed(old_path, RenameError::Io(err))
        }
    }
}

/// Applies the tasks in the given order. A failure only affects its own task.
pub fn execute_tasks(root: &Path, tasks: &[RenameTask], rules: &MappingRules) -> RenameReport {
    info!("Renaming {} entr(ies)", tasks.len());

    let mut report = RenameReport {
        scanned: tasks.len(),
        ..RenameReport::default()
    };

    for task in tasks {
        match execute_task(root, task, rules) {
            TaskOutcome::Renamed { collided, .. } => {
                report.renamed += 1;
                if collided {
                    report.collisions += 1;
                }
            }
            TaskOutcome::Unchanged(_) => report.unchanged += 1,
            TaskOutcome::Failed(failure) => report.failures.push(failure),
        }
    }

    report
}
