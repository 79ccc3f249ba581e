//! Plugin file installation.
//!
//! Searches the extracted tree for the two plugin deliverables and copies
//! whichever are found into the target directory. The formats are
//! independent: one of two installed is a successful run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::FatalError;
use crate::report::Reporter;

/// The deliverables, one per plugin format.
pub const PLUGIN_FILES: [&str; 2] = ["Halcyon.vst3", "Halcyon.clap"];

/// Copy every plugin file found under `extracted` into `target`,
/// overwriting existing files. Returns the installed count; zero is an
/// installation error.
pub fn install_plugins(
    extracted: &Path,
    target: &Path,
    report: &Reporter,
) -> Result<u32, FatalError> {
    let mut installed = 0u32;
    for name in PLUGIN_FILES {
        let found = match find_file(extracted, name) {
            Some(found) => found,
            None => {
                tracing::debug!("{} not present in the archive", name);
                continue;
            }
        };
        let dest = target.join(name);
        match fs::copy(&found, &dest) {
            Ok(_) => {
                report.info(&format!("installed {} -> {}", name, dest.display()));
                installed += 1;
            }
            Err(err) => {
                report.warn(&format!("could not copy {} to {}: {}", name, dest.display(), err));
            }
        }
    }

    if installed == 0 {
        return Err(FatalError::Install(
            "no plugin files found in the extracted archive".into(),
        ));
    }
    Ok(installed)
}

/// Depth-first search for an exact file name; first match wins when
/// duplicates exist.
fn find_file(root: &Path, name: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(root).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if entry.file_name().to_str() == Some(name) {
            return Some(path);
        }
    }
    for dir in subdirs {
        if let Some(found) = find_file(&dir, name) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Verbosity;

    fn quiet() -> Reporter {
        Reporter::new(Verbosity::Quiet)
    }

    fn tree_with(files: &[(&str, &[u8])]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (rel, data) in files {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, data).unwrap();
        }
        dir
    }

    #[test]
    fn installs_both_formats() {
        let extracted = tree_with(&[
            ("halcyon/Halcyon.vst3", b"vst3 plugin body\n"),
            ("halcyon/clap/Halcyon.clap", b"clap plugin body\n"),
            ("halcyon/README", b"docs"),
        ]);
        let target = tempfile::tempdir().unwrap();

        let count = install_plugins(extracted.path(), target.path(), &quiet()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            fs::read(target.path().join("Halcyon.vst3")).unwrap(),
            b"vst3 plugin body\n"
        );
        assert_eq!(
            fs::read(target.path().join("Halcyon.clap")).unwrap(),
            b"clap plugin body\n"
        );
    }

    #[test]
    fn single_format_is_success() {
        let extracted = tree_with(&[("deep/nested/dir/Halcyon.vst3", b"vst3 plugin body\n")]);
        let target = tempfile::tempdir().unwrap();

        let count = install_plugins(extracted.path(), target.path(), &quiet()).unwrap();
        assert_eq!(count, 1);
        assert!(target.path().join("Halcyon.vst3").exists());
        assert!(!target.path().join("Halcyon.clap").exists());
    }

    #[test]
    fn empty_tree_is_install_error() {
        let extracted = tree_with(&[("halcyon/CHANGELOG", b"nothing useful")]);
        let target = tempfile::tempdir().unwrap();

        let err = install_plugins(extracted.path(), target.path(), &quiet()).unwrap_err();
        assert!(matches!(err, FatalError::Install(_)));
    }

    #[test]
    fn existing_target_file_is_overwritten() {
        let extracted = tree_with(&[("Halcyon.clap", b"clap plugin body\n")]);
        let target = tempfile::tempdir().unwrap();
        fs::write(target.path().join("Halcyon.clap"), b"stale install").unwrap();

        let count = install_plugins(extracted.path(), target.path(), &quiet()).unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            fs::read(target.path().join("Halcyon.clap")).unwrap(),
            b"clap plugin body\n"
        );
    }

    #[test]
    fn find_file_exact_name_only() {
        let extracted = tree_with(&[("a/Halcyon.vst3.bak", b"x"), ("b/Halcyon.vst3", b"y")]);
        let found = find_file(extracted.path(), "Halcyon.vst3").unwrap();
        assert!(found.ends_with("b/Halcyon.vst3"));
    }
}
