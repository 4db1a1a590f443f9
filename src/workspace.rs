//! Run-scoped artifact directory management.
//!
//! The workspace (`<base_folder>/<run_id>`) is the only shared mutable
//! resource in a run. It is created lazily on the first write, every
//! artifact gets a disjoint filename, and when persistence is disabled the
//! whole directory is removed after the report is assembled — along with
//! the base folder if no other run occupies it. Cleanup is idempotent: an
//! already-absent path is success, not an error.

use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

use crate::context::RunContext;

/// Create the workspace directory (and any missing parents); a no-op when
/// it already exists
pub fn ensure(ctx: &RunContext) -> io::Result<()> {
    fs::create_dir_all(&ctx.workspace)
}

/// Write an artifact into the workspace, creating it on first use.
///
/// Returns the full path of the written file.
pub fn write_artifact(ctx: &RunContext, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    ensure(ctx)?;
    let path = ctx.workspace.join(file_name);
    fs::write(&path, bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote artifact");
    Ok(path)
}

/// Remove the workspace and, if it is now empty, the base folder.
///
/// Safe to call more than once and safe when another run has already
/// removed a shared empty parent.
pub fn cleanup(ctx: &RunContext) -> io::Result<()> {
    match fs::remove_dir_all(&ctx.workspace) {
        Ok(()) => debug!(workspace = %ctx.workspace.display(), "removed workspace"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let base = &ctx.options.base_folder;
    let is_empty = match fs::read_dir(base) {
        Ok(mut entries) => entries.next().is_none(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if is_empty {
        match fs::remove_dir(base) {
            Ok(()) => debug!(base = %base.display(), "removed empty base folder"),
            // Another run may have removed it, or raced us into it.
            Err(e)
                if e.kind() == io::ErrorKind::NotFound
                    || e.kind() == io::ErrorKind::DirectoryNotEmpty => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
