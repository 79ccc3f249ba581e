//! Asset URL extraction from the release listing, structured and raw.

use serde::Deserialize;

/// Subset of the GitHub release object the locator cares about. Unknown
/// fields are ignored; missing ones default so a sparse release entry does
/// not sink the whole listing.
#[derive(Debug, Deserialize)]
struct Release {
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
struct Asset {
    #[serde(default)]
    browser_download_url: String,
}

/// Does this asset name/URL follow the Linux archive naming convention?
pub(crate) fn is_linux_archive(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("linux") && lower.ends_with(".tar.gz")
}

/// Structured strategy: decode the API response and take the first matching
/// asset in listing order. `None` on malformed JSON or no match.
pub(crate) fn first_asset_from_json(body: &str) -> Option<String> {
    let releases: Vec<Release> = serde_json::from_str(body).ok()?;
    for release in &releases {
        for asset in &release.assets {
            if is_linux_archive(&asset.browser_download_url) {
                return Some(asset.browser_download_url.clone());
            }
        }
    }
    None
}

/// Raw-text strategy: find the first `.tar.gz` URL token matching the
/// naming convention. Works on both the API response body and the releases
/// page HTML; tokens may be absolute or site-relative.
pub(crate) fn scan_for_archive_url(text: &str) -> Option<String> {
    const SUFFIX: &str = ".tar.gz";
    let mut from = 0;
    while let Some(found) = text[from..].find(SUFFIX) {
        let end = from + found + SUFFIX.len();
        let token_start = text[..end]
            .rfind(|c: char| {
                c == '"' || c == '\'' || c == '=' || c == '>' || c == '(' || c.is_whitespace()
            })
            .map(|i| i + 1)
            .unwrap_or(0);
        let token = &text[token_start..end];
        if (token.starts_with("https://") || token.starts_with('/')) && is_linux_archive(token) {
            return Some(token.to_string());
        }
        from = end;
    }
    None
}
