//! Archive extraction into an install directory
//!
//! Handles plain and gzip-compressed tarballs. Portable release tarballs
//! nest everything under a single top directory; `strip_top_level` rewrites
//! member paths to drop that segment so the payload lands directly in the
//! install directory.

use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tar::Archive;

use crate::errors::InstallError;

/// Extract `archive_path` into `target_dir`, creating it if necessary.
///
/// With `strip_top_level`, the first member's leading path segment is taken
/// as the common prefix and removed from every member; members that do not
/// live under that prefix are silently excluded.
pub fn extract_archive(
    archive_path: &Path,
    target_dir: &Path,
    strip_top_level: bool,
) -> Result<(), InstallError> {
    let archive_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| archive_path.display().to_string());
    let extraction_error = |reason: String| InstallError::Extraction {
        archive: archive_name.clone(),
        reason,
    };

    fs::create_dir_all(target_dir)
        .map_err(|e| extraction_error(format!("failed to create {}: {}", target_dir.display(), e)))?;

    let file =
        fs::File::open(archive_path).map_err(|e| extraction_error(e.to_string()))?;

    let reader: Box<dyn Read> = if archive_name.ends_with(".tar.gz") || archive_name.ends_with(".tgz")
    {
        Box::new(GzDecoder::new(file))
    } else if archive_name.ends_with(".tar") {
        Box::new(file)
    } else {
        return Err(extraction_error("unsupported archive format".to_string()));
    };

    let mut archive = Archive::new(reader);
    let result = if strip_top_level {
        unpack_stripped(&mut archive, target_dir)
    } else {
        archive.unpack(target_dir)
    };

    result.map_err(|e| extraction_error(e.to_string()))
}

fn unpack_stripped<R: Read>(archive: &mut Archive<R>, target_dir: &Path) -> std::io::Result<()> {
    let mut prefix: Option<PathBuf> = None;

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.into_owned();

        if prefix.is_none() {
            prefix = Some(top_segment(&path));
        }
        let prefix = prefix.as_deref().unwrap_or_else(|| Path::new(""));

        // Members outside the release's top directory are not extracted
        let Ok(stripped) = path.strip_prefix(prefix) else {
            continue;
        };
        if stripped.as_os_str().is_empty() {
            continue;
        }

        let dest = target_dir.join(stripped);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        entry.unpack(&dest)?;
    }

    Ok(())
}

/// Leading path segment of the first archive member
fn top_segment(path: &Path) -> PathBuf {
    path.components()
        .find_map(|c| match c {
            Component::Normal(segment) => Some(PathBuf::from(segment)),
            _ => None,
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tar::{Builder, EntryType, Header};

    fn append_dir(builder: &mut Builder<GzEncoder<Vec<u8>>>, path: &str) {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Directory);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, path, std::io::empty()).unwrap();
    }

    fn append_file(builder: &mut Builder<GzEncoder<Vec<u8>>>, path: &str, contents: &str) {
        let mut header = Header::new_gnu();
        header.set_entry_type(EntryType::Regular);
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .unwrap();
    }

    fn nested_tar_gz() -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = Builder::new(encoder);
        append_dir(&mut builder, "pkg-1.0/");
        append_dir(&mut builder, "pkg-1.0/bin/");
        append_file(&mut builder, "pkg-1.0/bin/tool", "#!/bin/sh\n");
        append_file(&mut builder, "pkg-1.0/README", "readme\n");
        append_file(&mut builder, "stray/notes.txt", "outside the prefix\n");
        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_extract_with_top_level_strip() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("pkg-1.0.linux-portable.tar.gz");
        std::fs::write(&archive_path, nested_tar_gz()).unwrap();

        let target = dir.path().join("install");
        extract_archive(&archive_path, &target, true).unwrap();

        assert_eq!(
            std::fs::read_to_string(target.join("bin/tool")).unwrap(),
            "#!/bin/sh\n"
        );
        assert!(target.join("README").exists());
        // The prefix directory itself is gone and out-of-prefix members are skipped
        assert!(!target.join("pkg-1.0").exists());
        assert!(!target.join("stray").exists());
        assert!(!target.join("notes.txt").exists());
    }

    #[test]
    fn test_extract_without_strip_keeps_layout() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("pkg.tar.gz");
        std::fs::write(&archive_path, nested_tar_gz()).unwrap();

        let target = dir.path().join("install");
        extract_archive(&archive_path, &target, false).unwrap();

        assert!(target.join("pkg-1.0/bin/tool").exists());
        assert!(target.join("stray/notes.txt").exists());
    }

    #[test]
    fn test_corrupt_archive_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("broken.tar.gz");
        std::fs::write(&archive_path, b"definitely not gzip").unwrap();

        let err = extract_archive(&archive_path, &dir.path().join("install"), false).unwrap_err();
        assert!(matches!(err, InstallError::Extraction { .. }));
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("pkg.zip");
        std::fs::write(&archive_path, b"PK").unwrap();

        let err = extract_archive(&archive_path, &dir.path().join("install"), false).unwrap_err();
        assert!(matches!(err, InstallError::Extraction { .. }));
    }
}
