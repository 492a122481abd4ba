//! Publishing artifacts to disk
//!
//! Output is built next to the destination under a temporary name and moved
//! into place only once it is complete. Any error, including an expired
//! deadline, drops the temporary and leaves the destination untouched.
//!
//! Tarballs are reproducible: entries are appended in path order with a
//! fixed mode, owner and mtime, and the gzip header carries no timestamp.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::{Builder as TempBuilder, NamedTempFile};
use tracing::{debug, span, Level};

use crate::core::{ArchiveFormat, ArtifactSet, ExportError, ExportResult};

const FILE_MODE: u32 = 0o644;

/// Wall-clock budget for the filesystem work of one export
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn starting_now(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    /// Fail with a timeout naming `stage` once the budget is spent
    pub fn check(&self, stage: impl FnOnce() -> String) -> ExportResult<()> {
        if self.started.elapsed() >= self.limit {
            return Err(ExportError::timeout(stage(), self.limit));
        }
        Ok(())
    }
}

/// Directory the temporaries are created in, created if missing
fn parent_dir(destination: &Path) -> ExportResult<PathBuf> {
    let parent = match destination.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| ExportError::io(&parent, e))?;
    Ok(parent)
}

/// Reject artifact paths that would escape the output root
fn checked_relative(path: &str) -> ExportResult<&Path> {
    let relative = Path::new(path);
    let escapes = relative.is_absolute()
        || relative
            .components()
            .any(|c| !matches!(c, std::path::Component::Normal(_)));
    if path.is_empty() || escapes {
        return Err(ExportError::archive(format!("refusing artifact path {:?}", path)));
    }
    Ok(relative)
}

/// Write `artifacts` as a gzip-compressed tarball at `destination`
pub fn write_tar_gz(
    artifacts: &ArtifactSet,
    destination: &Path,
    deadline: &Deadline,
) -> ExportResult<usize> {
    let archive_span = span!(Level::DEBUG, "archive", files = artifacts.len());
    let _enter = archive_span.enter();

    let parent = parent_dir(destination)?;
    let mut temp = NamedTempFile::new_in(&parent).map_err(|e| ExportError::io(&parent, e))?;
    let temp_path = temp.path().to_path_buf();
    let io_err = |e: std::io::Error| ExportError::io(&temp_path, e);

    let mut builder = tar::Builder::new(GzEncoder::new(temp.as_file_mut(), Compression::default()));
    let mut count = 0;
    for artifact in artifacts.iter() {
        deadline.check(|| format!("archiving {}", artifact.path))?;
        let relative = checked_relative(&artifact.path)?;
        let bytes = artifact.content.as_bytes();

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(bytes.len() as u64);
        header.set_mode(FILE_MODE);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        builder
            .append_data(&mut header, relative, bytes)
            .map_err(|e| ExportError::archive(format!("{}: {}", artifact.path, e)))?;
        count += 1;
    }

    let encoder = builder.into_inner().map_err(io_err)?;
    let file = encoder.finish().map_err(io_err)?;
    file.flush().map_err(io_err)?;
    file.sync_all().map_err(io_err)?;

    deadline.check(|| "publishing the archive".to_string())?;
    temp.persist(destination)
        .map_err(|e| ExportError::io(destination, e.error))?;
    debug!(path = %destination.display(), files = count, "Archive published");
    Ok(count)
}

/// Write `artifacts` as a directory tree at `destination`, which must not exist
pub fn write_directory(
    artifacts: &ArtifactSet,
    destination: &Path,
    deadline: &Deadline,
) -> ExportResult<usize> {
    let stage_span = span!(Level::DEBUG, "stage_directory", files = artifacts.len());
    let _enter = stage_span.enter();

    if destination.exists() {
        return Err(ExportError::io(
            destination,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "destination already exists"),
        ));
    }
    let parent = parent_dir(destination)?;
    let staging = TempBuilder::new()
        .prefix(".umlgen-stage-")
        .tempdir_in(&parent)
        .map_err(|e| ExportError::io(&parent, e))?;

    let mut count = 0;
    for artifact in artifacts.iter() {
        deadline.check(|| format!("writing {}", artifact.path))?;
        let target = staging.path().join(checked_relative(&artifact.path)?);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))?;
        }
        fs::write(&target, &artifact.content).map_err(|e| ExportError::io(&target, e))?;
        count += 1;
    }

    deadline.check(|| "publishing the output directory".to_string())?;
    // the emptied staging handle is dropped without error after the rename
    fs::rename(staging.path(), destination).map_err(|e| ExportError::io(destination, e))?;
    debug!(path = %destination.display(), files = count, "Directory published");
    Ok(count)
}

/// Publish in the configured format; returns the number of files written
pub fn publish(
    artifacts: &ArtifactSet,
    destination: &Path,
    format: ArchiveFormat,
    deadline: &Deadline,
) -> ExportResult<usize> {
    match format {
        ArchiveFormat::TarGz => write_tar_gz(artifacts, destination, deadline),
        ArchiveFormat::Directory => write_directory(artifacts, destination, deadline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ArtifactKind;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn artifacts() -> ArtifactSet {
        let mut set = ArtifactSet::new();
        set.add("b/two.txt", ArtifactKind::Documentation, "two");
        set.add("a/one.txt", ArtifactKind::Documentation, "one");
        set
    }

    fn generous() -> Deadline {
        Deadline::starting_now(Duration::from_secs(60))
    }

    #[test]
    fn test_tarball_entries_sorted_and_normalised() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tar.gz");
        assert_eq!(write_tar_gz(&artifacts(), &path, &generous()).unwrap(), 2);

        let mut archive = tar::Archive::new(GzDecoder::new(fs::File::open(&path).unwrap()));
        let mut seen = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            assert_eq!(entry.header().mode().unwrap(), FILE_MODE);
            assert_eq!(entry.header().mtime().unwrap(), 0);
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            seen.push((entry.path().unwrap().display().to_string(), content));
        }
        assert_eq!(
            seen,
            vec![
                ("a/one.txt".to_string(), "one".to_string()),
                ("b/two.txt".to_string(), "two".to_string())
            ]
        );
    }

    #[test]
    fn test_tarball_is_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.tar.gz");
        let second = dir.path().join("second.tar.gz");
        write_tar_gz(&artifacts(), &first, &generous()).unwrap();
        write_tar_gz(&artifacts(), &second, &generous()).unwrap();
        assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
    }

    #[test]
    fn test_directory_publication() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("project");
        write_directory(&artifacts(), &out, &generous()).unwrap();
        assert_eq!(fs::read_to_string(out.join("a/one.txt")).unwrap(), "one");
        // only the published tree remains next to it
        let siblings: Vec<_> = fs::read_dir(dir.path().join("nested")).unwrap().collect();
        assert_eq!(siblings.len(), 1);

        let err = write_directory(&artifacts(), &out, &generous()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn test_expired_deadline_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let expired = Deadline::starting_now(Duration::ZERO);
        let tarball = dir.path().join("out.tar.gz");
        let err = write_tar_gz(&artifacts(), &tarball, &expired).unwrap_err();
        assert!(matches!(err, ExportError::Timeout { .. }));
        let tree = dir.path().join("tree");
        let err = write_directory(&artifacts(), &tree, &expired).unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_escaping_paths_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = ArtifactSet::new();
        set.add("../evil.txt", ArtifactKind::Documentation, "x");
        let err = write_directory(&set, &dir.path().join("out"), &generous()).unwrap_err();
        assert!(matches!(err, ExportError::Archive { .. }));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
