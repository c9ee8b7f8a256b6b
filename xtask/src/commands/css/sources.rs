//! Source discovery and the parallel transform sweep.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use ignore::WalkBuilder;
use rayon::prelude::*;
use tracing::debug;
use utility_css::{BuildContext, BuildPass};

use crate::runtime::error::{XtaskError, XtaskResult};

/// Counters from one sweep over the source tree.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(super) struct SourceScan {
    pub files_seen: usize,
    pub files_transformed: usize,
    pub files_unreadable: usize,
}

/// Collect every regular file under `src_dir`, honouring ignore files and skipping hidden
/// entries. The result is sorted.
pub(super) fn collect_files(src_dir: &Path) -> XtaskResult<Vec<PathBuf>> {
    if !src_dir.is_dir() {
        return Err(XtaskError::validation(format!(
            "source directory not found: {}",
            src_dir.display()
        ))
        .with_path(src_dir)
        .with_hint("pass an existing directory to --src"));
    }

    let walker = WalkBuilder::new(src_dir)
        .standard_filters(true)
        .hidden(true)
        .build();

    let mut files: Vec<PathBuf> = walker
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|kind| kind.is_file()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    Ok(files)
}

/// Run the transform hook over `files` in parallel.
///
/// Module ids are workspace-relative with `/` separators. Files that are not valid UTF-8 are
/// skipped, as a bundler would never hand them to a transform hook.
pub(super) fn scan_files(
    pass: &BuildPass,
    ctx: &dyn BuildContext,
    root: &Path,
    files: &[PathBuf],
) -> SourceScan {
    let transformed = AtomicUsize::new(0);
    let unreadable = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        let code = match fs::read_to_string(path) {
            Ok(code) => code,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "skipping unreadable source");
                unreadable.fetch_add(1, Ordering::Relaxed);
                return;
            }
        };
        if pass.transform(&code, &module_id(root, path), ctx).is_some() {
            transformed.fetch_add(1, Ordering::Relaxed);
        }
    });

    SourceScan {
        files_seen: files.len(),
        files_transformed: transformed.into_inner(),
        files_unreadable: unreadable.into_inner(),
    }
}

fn module_id(root: &Path, path: &Path) -> String {
    let Ok(relative) = path.strip_prefix(root) else {
        return path.to_string_lossy().replace('\\', "/");
    };
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
