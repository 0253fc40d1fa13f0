//! Source-tree snapshot packaging.
//!
//! The fix consumer unpacks snapshots as root inside its sandbox, so
//! every archive entry carries uid/gid 0 regardless of local ownership,
//! and entries are rooted at the repo directory name.

use std::fs::File;
use std::io;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use walkdir::WalkDir;

use crate::error::DispatchError;

/// Key prefix under which snapshots live in the bucket.
pub const SNAPSHOT_PREFIX: &str = "tmp/codefix/source/";

/// Packs `repo_path` into a gzipped tar at `out_path`.
///
/// Symlinks are skipped; everything else is archived in walk order.
///
/// # Errors
///
/// Returns [`DispatchError::MissingRepoPath`] when `repo_path` does not
/// exist, or [`DispatchError::Io`] on any filesystem failure.
pub fn create_archive(repo_path: &Path, out_path: &Path) -> Result<(), DispatchError> {
    if !repo_path.is_dir() {
        return Err(DispatchError::MissingRepoPath(repo_path.to_path_buf()));
    }
    let repo_name = repo_path
        .file_name()
        .ok_or_else(|| DispatchError::MissingRepoPath(repo_path.to_path_buf()))?;

    let file = File::create(out_path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for entry in WalkDir::new(repo_path).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        if entry.file_type().is_symlink() {
            continue;
        }
        let metadata = entry.metadata().map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(repo_path)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let arcname = Path::new(repo_name).join(relative);

        let mut header = tar::Header::new_gnu();
        header.set_metadata(&metadata);
        header.set_uid(0);
        header.set_gid(0);
        header.set_username("root")?;
        header.set_groupname("root")?;

        if metadata.is_dir() {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_size(0);
            builder.append_data(&mut header, &arcname, io::empty())?;
        } else {
            let mut source = File::open(entry.path())?;
            builder.append_data(&mut header, &arcname, &mut source)?;
        }
    }

    builder.into_inner()?.finish()?;
    Ok(())
}
