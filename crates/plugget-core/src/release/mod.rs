//! Release asset locator.
//!
//! Produces exactly one download URL for the newest Linux archive of the
//! Halcyon plugin, or fails. Strategies are tried in order and the first
//! hit wins; the hosting service's listing order is trusted as newest-first
//! (no version comparison):
//!
//! 1. Structured query of the GitHub releases API, decoded as JSON.
//! 2. Raw-text scan of the same API response (survives shape changes and
//!    malformed JSON).
//! 3. Raw-text scan of the human-readable releases page.

mod parse;

use crate::error::FatalError;
use crate::report::Reporter;
use crate::transport::Transport;

pub(crate) const GITHUB_OWNER: &str = "sable-audio";
pub(crate) const GITHUB_REPO: &str = "halcyon";

/// Reference to the one asset this run will download.
#[derive(Debug, Clone)]
pub struct ReleaseAsset {
    pub download_url: String,
}

fn api_releases_url() -> String {
    format!(
        "https://api.github.com/repos/{}/{}/releases",
        GITHUB_OWNER, GITHUB_REPO
    )
}

fn releases_page_url() -> String {
    format!("https://github.com/{}/{}/releases", GITHUB_OWNER, GITHUB_REPO)
}

/// Walk the strategy chain until one yields a URL.
pub fn locate_asset(
    transport: &dyn Transport,
    report: &Reporter,
) -> Result<ReleaseAsset, FatalError> {
    let api_url = api_releases_url();
    match transport.fetch_text(&api_url) {
        Ok(body) => {
            if let Some(url) = parse::first_asset_from_json(&body) {
                tracing::debug!("asset found via structured release query");
                return Ok(ReleaseAsset { download_url: url });
            }
            // JSON gave nothing; the same body may still contain the URL
            // as plain text.
            if let Some(url) = parse::scan_for_archive_url(&body) {
                tracing::debug!("asset found via raw scan of the API response");
                return Ok(ReleaseAsset {
                    download_url: absolutize(url),
                });
            }
            report.info("release query returned no matching asset; trying the releases page");
        }
        Err(err) => {
            tracing::warn!("release API query failed: {:#}", err);
            report.info("release query failed; trying the releases page");
        }
    }

    match transport.fetch_text(&releases_page_url()) {
        Ok(page) => {
            if let Some(url) = parse::scan_for_archive_url(&page) {
                tracing::debug!("asset found via releases page scan");
                return Ok(ReleaseAsset {
                    download_url: absolutize(url),
                });
            }
        }
        Err(err) => tracing::warn!("releases page fetch failed: {:#}", err),
    }

    Err(FatalError::Locator(format!(
        "no Linux release archive found for {}/{}",
        GITHUB_OWNER, GITHUB_REPO
    )))
}

/// Page scans can yield site-relative `/owner/repo/releases/download/...`
/// links; anchor them to github.com.
fn absolutize(url: String) -> String {
    if url.starts_with('/') {
        format!("https://github.com{}", url)
    } else {
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolutize_relative_link() {
        assert_eq!(
            absolutize("/sable-audio/halcyon/releases/download/v1.0/x-linux.tar.gz".into()),
            "https://github.com/sable-audio/halcyon/releases/download/v1.0/x-linux.tar.gz"
        );
    }

    #[test]
    fn absolutize_keeps_absolute_link() {
        let url = "https://github.com/sable-audio/halcyon/releases/download/v1.0/x-linux.tar.gz";
        assert_eq!(absolutize(url.into()), url);
    }
}
