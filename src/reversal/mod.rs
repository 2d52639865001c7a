//! Reversal-index configuration housekeeping
//!
//! Each analysis writing system gets its own reversal configuration file in
//! the reversal directory. When the set of writing systems changes, files
//! for new writing systems are created from the shared template (the file
//! without a `writingSystem` attribute) and files for writing systems that
//! are gone are removed.

pub mod xml;

use log::{debug, info, warn};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::writing_system::{InvalidWritingSystem, WritingSystem};

pub const REVERSAL_EXTENSION: &str = "fwdictconfig";

#[derive(Debug, Error)]
pub enum ReversalError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed reversal configuration {path:?}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("no reversal template (a file without a writingSystem attribute) in {0:?}")]
    MissingTemplate(PathBuf),

    #[error(transparent)]
    InvalidWritingSystem(#[from] InvalidWritingSystem),
}

pub type Result<T> = std::result::Result<T, ReversalError>;

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> ReversalError + '_ {
    move |source| ReversalError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A reversal configuration file bound to one writing system
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReversalFile {
    pub path: PathBuf,
    pub name: Option<String>,
    pub writing_system: String,
}

/// What reconciling a reversal directory would do
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcilePlan {
    pub dir: PathBuf,
    pub template: Option<PathBuf>,
    pub create: Vec<(WritingSystem, PathBuf)>,
    pub remove: Vec<ReversalFile>,
    pub keep: Vec<ReversalFile>,
    pub skipped: Vec<(PathBuf, String)>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.create.is_empty() && self.remove.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub created: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

struct Scan {
    files: Vec<ReversalFile>,
    template: Option<PathBuf>,
    skipped: Vec<(PathBuf, String)>,
}

fn scan(dir: &Path) -> Result<Scan> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == REVERSAL_EXTENSION))
        .collect();
    paths.sort();

    let mut scan = Scan {
        files: Vec::new(),
        template: None,
        skipped: Vec::new(),
    };

    for path in paths {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("Skipping reversal configuration {:?}: not UTF-8 text", path);
                scan.skipped.push((path, e.to_string()));
                continue;
            }
            Err(e) => return Err(io_error(&path)(e)),
        };
        match xml::read_header(&content) {
            Ok(header) => match header.writing_system {
                Some(writing_system) => scan.files.push(ReversalFile {
                    path,
                    name: header.name,
                    writing_system,
                }),
                None if scan.template.is_none() => scan.template = Some(path),
                None => debug!("Ignoring extra template {:?}", path),
            },
            Err(message) => {
                warn!("Skipping unreadable reversal configuration {:?}: {}", path, message);
                scan.skipped.push((path, message));
            }
        }
    }

    Ok(scan)
}

/// Characters that are unsafe in file names are replaced with '_'
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '(' | ')') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Work out which files to create and remove so that `dir` holds exactly
/// one reversal configuration per writing system.
pub fn plan(dir: &Path, writing_systems: &[WritingSystem]) -> Result<ReconcilePlan> {
    let scan = scan(dir)?;
    let wanted: HashSet<&str> = writing_systems.iter().map(WritingSystem::tag).collect();

    let mut plan = ReconcilePlan {
        dir: dir.to_path_buf(),
        template: scan.template,
        skipped: scan.skipped,
        ..Default::default()
    };

    let mut covered = HashSet::new();
    for file in scan.files {
        if wanted.contains(file.writing_system.as_str()) {
            covered.insert(file.writing_system.clone());
            plan.keep.push(file);
        } else {
            plan.remove.push(file);
        }
    }

    let mut taken: HashSet<PathBuf> = plan
        .keep
        .iter()
        .map(|f| f.path.clone())
        .chain(plan.template.iter().cloned())
        .chain(plan.skipped.iter().map(|(p, _)| p.clone()))
        .collect();

    for ws in writing_systems {
        if !covered.insert(ws.tag().to_string()) {
            continue;
        }
        let stem = match file_stem(ws.name()) {
            stem if stem.is_empty() => ws.tag().to_string(),
            stem => stem,
        };
        let mut path = dir.join(format!("{}.{}", stem, REVERSAL_EXTENSION));
        if taken.contains(&path) || (path.exists() && !plan.remove.iter().any(|f| f.path == path)) {
            path = dir.join(format!("{} ({}).{}", stem, ws.tag(), REVERSAL_EXTENSION));
        }
        taken.insert(path.clone());
        plan.create.push((ws.clone(), path));
    }

    debug!(
        "Reversal plan for {:?}: {} to create, {} to remove, {} kept, {} skipped",
        dir,
        plan.create.len(),
        plan.remove.len(),
        plan.keep.len(),
        plan.skipped.len()
    );
    Ok(plan)
}

/// Carry out a plan: remove obsolete files, then create new ones from the
/// template. Nothing is touched if files need creating and there is no
/// template.
pub fn apply(plan: &ReconcilePlan) -> Result<ReconcileReport> {
    let template = match (&plan.template, plan.create.is_empty()) {
        (_, true) => None,
        (Some(path), false) => Some((path, fs::read_to_string(path).map_err(io_error(path))?)),
        (None, false) => return Err(ReversalError::MissingTemplate(plan.dir.clone())),
    };

    let mut report = ReconcileReport::default();

    for file in &plan.remove {
        fs::remove_file(&file.path).map_err(io_error(&file.path))?;
        info!(
            "Removed reversal configuration {:?} ({})",
            file.path, file.writing_system
        );
        report.removed.push(file.path.clone());
    }

    let Some((template_path, template)) = template else {
        return Ok(report);
    };

    for (ws, path) in &plan.create {
        let content = xml::rewrite_header(&template, ws.name(), ws.tag()).map_err(|message| ReversalError::Xml {
            path: template_path.clone(),
            message,
        })?;
        fs::write(path, content).map_err(io_error(path))?;
        info!("Created reversal configuration {:?} for {}", path, ws);
        report.created.push(path.clone());
    }

    Ok(report)
}

/// Plan and apply in one step
pub fn reconcile(dir: &Path, writing_systems: &[WritingSystem]) -> Result<ReconcileReport> {
    let plan = plan(dir, writing_systems)?;
    apply(&plan)
}
