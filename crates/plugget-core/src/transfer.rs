//! Archive download and best-effort checksum verification.
//!
//! The hard requirement is "archive downloaded and non-empty". The sibling
//! `<url>.sha256` file is fetched opportunistically: if it is absent, empty,
//! or unparseable, verification is skipped with an info message; a digest
//! mismatch logs a warning and the run proceeds.

use std::fs;
use std::path::{Path, PathBuf};

use crate::checksum::{self, ChecksumOutcome};
use crate::error::FatalError;
use crate::release::ReleaseAsset;
use crate::report::{Reporter, Verbosity};
use crate::transport::Transport;

/// Used when the asset URL has no usable path segment.
const DEFAULT_ARCHIVE_NAME: &str = "halcyon-release.tar.gz";

/// Suffix convention for the published checksum companion.
const CHECKSUM_SUFFIX: &str = ".sha256";

/// Download the asset into `scratch` and validate it; returns the archive
/// path. Checksum verification never fails the run.
pub fn download_and_verify(
    transport: &dyn Transport,
    asset: &ReleaseAsset,
    scratch: &Path,
    report: &Reporter,
) -> Result<PathBuf, FatalError> {
    let name = archive_filename(&asset.download_url);
    let archive = scratch.join(&name);

    report.step(&format!("downloading {}", asset.download_url));
    transport
        .fetch_file(&asset.download_url, &archive, report.verbosity())
        .map_err(|err| FatalError::Transfer(format!("download failed: {:#}", err)))?;

    let size = fs::metadata(&archive).map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        return Err(FatalError::Transfer(format!(
            "downloaded archive {} is missing or empty",
            archive.display()
        )));
    }
    tracing::debug!("downloaded {} ({} bytes)", archive.display(), size);

    verify_checksum(transport, asset, &archive, report);
    Ok(archive)
}

/// Opportunistic integrity check against `<asset-url>.sha256`.
fn verify_checksum(
    transport: &dyn Transport,
    asset: &ReleaseAsset,
    archive: &Path,
    report: &Reporter,
) {
    let sums_url = format!("{}{}", asset.download_url, CHECKSUM_SUFFIX);
    let sums_path = archive.with_file_name(format!(
        "{}{}",
        archive.file_name().unwrap_or_default().to_string_lossy(),
        CHECKSUM_SUFFIX
    ));

    // Always fetched quietly; a progress meter for a 100-byte file is noise.
    if let Err(err) = transport.fetch_file(&sums_url, &sums_path, Verbosity::Normal) {
        tracing::debug!("checksum file fetch failed: {:#}", err);
        report.info("no checksum file published; skipping verification");
        return;
    }
    let sums_text = match fs::read_to_string(&sums_path) {
        Ok(text) if !text.trim().is_empty() => text,
        _ => {
            report.info("checksum file is empty; skipping verification");
            return;
        }
    };
    let expected = match checksum::parse_digest(&sums_text) {
        Some(digest) => digest,
        None => {
            report.info("checksum file has no usable digest; skipping verification");
            return;
        }
    };

    match checksum::verify_against(archive, &expected) {
        Ok(ChecksumOutcome::Match) => report.info("checksum verified"),
        Ok(ChecksumOutcome::Mismatch { expected, actual }) => report.warn(&format!(
            "checksum mismatch (expected {}, got {}); continuing anyway",
            expected, actual
        )),
        Err(err) => {
            tracing::warn!("checksum computation failed: {:#}", err);
            report.info("could not compute archive checksum; skipping verification");
        }
    }
}

/// Derive the local archive filename from the asset URL's last path
/// segment.
fn archive_filename(url: &str) -> String {
    filename_from_url(url).unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string())
}

/// Extracts the last path segment from a URL for use as a filename.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub(crate) fn filename_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};

    /// Transport serving canned bodies; `None` simulates a failed fetch.
    struct Canned {
        archive: Option<Vec<u8>>,
        sums: Option<Vec<u8>>,
    }

    impl Canned {
        fn new(archive: Option<&[u8]>, sums: Option<&[u8]>) -> Self {
            Self {
                archive: archive.map(|b| b.to_vec()),
                sums: sums.map(|b| b.to_vec()),
            }
        }
    }

    impl Transport for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn fetch_text(&self, _url: &str) -> Result<String> {
            bail!("not served")
        }

        fn fetch_file(&self, url: &str, dest: &Path, _verbosity: Verbosity) -> Result<()> {
            let body = if url.ends_with(CHECKSUM_SUFFIX) {
                &self.sums
            } else {
                &self.archive
            };
            match body {
                Some(bytes) => {
                    fs::write(dest, bytes)?;
                    Ok(())
                }
                None => bail!("404"),
            }
        }
    }

    fn asset() -> ReleaseAsset {
        ReleaseAsset {
            download_url:
                "https://github.com/sable-audio/halcyon/releases/download/v1.4.2/halcyon-v1.4.2-linux-x86_64.tar.gz"
                    .into(),
        }
    }

    fn quiet() -> Reporter {
        Reporter::new(Verbosity::Quiet)
    }

    // sha256 of "plugin archive bytes\n".
    const ARCHIVE_DIGEST: &str =
        "ac1f815c1bfb2c4eb88cd2d31c2dba1256b3c63b18ee88d440604d942b1dd111";

    #[test]
    fn download_lands_under_the_asset_filename() {
        let scratch = tempfile::tempdir().unwrap();
        let transport = Canned::new(Some(b"plugin archive bytes\n"), None);
        let archive =
            download_and_verify(&transport, &asset(), scratch.path(), &quiet()).unwrap();
        assert_eq!(
            archive.file_name().unwrap().to_str().unwrap(),
            "halcyon-v1.4.2-linux-x86_64.tar.gz"
        );
        assert_eq!(fs::read(&archive).unwrap(), b"plugin archive bytes\n");
    }

    #[test]
    fn failed_download_is_transfer_error() {
        let scratch = tempfile::tempdir().unwrap();
        let transport = Canned::new(None, None);
        let err =
            download_and_verify(&transport, &asset(), scratch.path(), &quiet()).unwrap_err();
        assert!(matches!(err, FatalError::Transfer(_)));
    }

    #[test]
    fn empty_archive_is_transfer_error() {
        let scratch = tempfile::tempdir().unwrap();
        let transport = Canned::new(Some(b""), None);
        let err =
            download_and_verify(&transport, &asset(), scratch.path(), &quiet()).unwrap_err();
        assert!(matches!(err, FatalError::Transfer(_)));
    }

    #[test]
    fn checksum_match_passes() {
        let scratch = tempfile::tempdir().unwrap();
        let sums = format!("{}  halcyon-v1.4.2-linux-x86_64.tar.gz\n", ARCHIVE_DIGEST);
        let transport = Canned::new(Some(b"plugin archive bytes\n"), Some(sums.as_bytes()));
        assert!(download_and_verify(&transport, &asset(), scratch.path(), &quiet()).is_ok());
    }

    #[test]
    fn checksum_mismatch_is_not_fatal() {
        let scratch = tempfile::tempdir().unwrap();
        let corrupted = format!("{}  halcyon-v1.4.2-linux-x86_64.tar.gz\n", "0".repeat(64));
        let transport =
            Canned::new(Some(b"plugin archive bytes\n"), Some(corrupted.as_bytes()));
        // The run must still hand the archive onward.
        assert!(download_and_verify(&transport, &asset(), scratch.path(), &quiet()).is_ok());
    }

    #[test]
    fn empty_checksum_file_is_skipped() {
        let scratch = tempfile::tempdir().unwrap();
        let transport = Canned::new(Some(b"plugin archive bytes\n"), Some(b"  \n"));
        assert!(download_and_verify(&transport, &asset(), scratch.path(), &quiet()).is_ok());
    }

    #[test]
    fn filename_from_asset_url() {
        assert_eq!(
            filename_from_url(
                "https://github.com/sable-audio/halcyon/releases/download/v1.4.2/halcyon-v1.4.2-linux-x86_64.tar.gz"
            )
            .as_deref(),
            Some("halcyon-v1.4.2-linux-x86_64.tar.gz")
        );
        assert_eq!(
            filename_from_url("https://example.com/file.tar.gz?token=abc").as_deref(),
            Some("file.tar.gz")
        );
    }

    #[test]
    fn filename_fallback_cases() {
        assert_eq!(filename_from_url("https://example.com/"), None);
        assert_eq!(filename_from_url("https://example.com"), None);
        assert_eq!(filename_from_url("not a url"), None);
        assert_eq!(archive_filename("https://example.com/"), DEFAULT_ARCHIVE_NAME);
    }
}
