//! Reading sources and writing converted output.
//!
//! Output goes to a temporary file in the destination directory which is
//! then renamed over the target, so a failed run never leaves a truncated
//! output file behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{PortError, PortResult};

/// Read a whole source file as text.
pub fn read_source(path: &Path) -> PortResult<String> {
    fs::read_to_string(path).map_err(|err| PortError::from_io(path, err))
}

fn write_error(path: &Path, err: std::io::Error) -> PortError {
    PortError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Write `content` to `path` via temp file plus rename.
///
/// An existing target keeps its permissions. New files get the usual
/// `0644` mode on Unix rather than the temp file's private mode.
pub fn write_output(path: &Path, content: &str) -> PortResult<()> {
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir).map_err(|err| write_error(path, err))?;
    temp.write_all(content.as_bytes())
        .map_err(|err| write_error(path, err))?;
    temp.as_file()
        .sync_all()
        .map_err(|err| write_error(path, err))?;

    let permissions = match fs::metadata(path) {
        Ok(meta) => Some(meta.permissions()),
        Err(_) => default_permissions(),
    };
    if let Some(permissions) = permissions {
        fs::set_permissions(temp.path(), permissions).map_err(|err| write_error(path, err))?;
    }

    temp.persist(path)
        .map_err(|err| write_error(path, err.error))?;
    debug!(path = %path.display(), bytes = content.len(), "output written");
    Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}
