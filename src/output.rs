use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

/// Write a file so that `path` either keeps its previous state or holds the
/// complete new contents.
///
/// Data goes to a temporary file in the same directory, is flushed and
/// synced, then renamed over `path`. On error the temporary file is removed
/// when it is dropped.
///
/// A replaced file keeps its permissions; a new file gets the same mode a
/// plain `fs::write` would (0666 less the umask on Unix). With
/// `replace == false` an existing `path` is never touched and the call fails
/// with [`io::ErrorKind::AlreadyExists`], even if the file appeared while
/// `fill` was running.
pub fn write_atomic<F>(path: &Path, replace: bool, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = new_temp_file(dir)?;
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        fill(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    if replace {
        tmp.persist(path).map_err(|e| e.error)?;
    } else {
        tmp.persist_noclobber(path).map_err(|e| e.error)?;
    }

    log::debug!("Published {}", path.display());
    Ok(())
}

/// Temporary file created with the default file mode, which the OS filters
/// through the umask.
#[cfg(unix)]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Builder::new()
        .permissions(fs::Permissions::from_mode(0o666))
        .tempfile_in(dir)
}

#[cfg(not(unix))]
fn new_temp_file(dir: &Path) -> io::Result<NamedTempFile> {
    Builder::new().tempfile_in(dir)
}
