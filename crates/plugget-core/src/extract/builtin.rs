//! Built-in unpacker, the dispatcher's last resort.
//!
//! Handles the two formats the project actually publishes: gzip tarballs
//! and zip archives, chosen by filename suffix.

use anyhow::{anyhow, bail, Context, Result};
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Unpack `archive` into `dest` based on its filename suffix.
pub fn unpack(archive: &Path, dest: &Path) -> Result<()> {
    let name = archive
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("archive {} has no readable name", archive.display()))?;

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        unpack_tar_gz(archive, dest)
    } else if name.ends_with(".zip") {
        unpack_zip(archive, dest)
    } else {
        bail!("unsupported archive format: {}", name)
    }
}

fn unpack_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    tar::Archive::new(GzDecoder::new(file))
        .unpack(dest)
        .with_context(|| format!("unpack {}", archive.display()))?;
    Ok(())
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).with_context(|| format!("open {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(file)
        .with_context(|| format!("read {}", archive.display()))?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        // Entries with traversal-prone names are dropped, same as the
        // `tar` crate does on unpack.
        let out_path = match entry.enclosed_name() {
            Some(rel) => dest.join(rel),
            None => continue,
        };

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)
            .with_context(|| format!("create {}", out_path.display()))?;
        io::copy(&mut entry, &mut out)?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, data) in entries {
            writer
                .start_file(*name, zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn unpacks_gzip_tarball() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("halcyon-linux.tar.gz");
        write_tar_gz(
            &archive,
            &[
                ("halcyon/Halcyon.vst3", b"vst3 plugin body\n"),
                ("halcyon/README", b"docs"),
            ],
        );

        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        unpack(&archive, &out).unwrap();

        assert_eq!(
            fs::read(out.join("halcyon/Halcyon.vst3")).unwrap(),
            b"vst3 plugin body\n"
        );
        assert_eq!(fs::read(out.join("halcyon/README")).unwrap(), b"docs");
    }

    #[test]
    fn unpacks_zip() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("halcyon-linux.zip");
        write_zip(&archive, &[("nested/Halcyon.clap", b"clap plugin body\n")]);

        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        unpack(&archive, &out).unwrap();

        assert_eq!(
            fs::read(out.join("nested/Halcyon.clap")).unwrap(),
            b"clap plugin body\n"
        );
    }

    #[test]
    fn unknown_suffix_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("halcyon.rar");
        fs::write(&archive, b"not an archive").unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        assert!(unpack(&archive, &out).is_err());
    }

    #[test]
    fn corrupt_tarball_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("broken.tar.gz");
        fs::write(&archive, b"definitely not gzip").unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(&out).unwrap();
        assert!(unpack(&archive, &out).is_err());
    }
}
