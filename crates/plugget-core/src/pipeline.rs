//! Install pipeline orchestration.
//!
//! Strictly sequential: select transport → locate asset → download and
//! verify → extract → install. Each stage's success is a precondition for
//! the next; there are no retries. Failure is communicated by returning a
//! [`FatalError`], and the scratch workspace is removed on every exit path
//! because it drops with this function's frame.

use std::fs;

use crate::config::RunConfig;
use crate::error::FatalError;
use crate::extract;
use crate::install;
use crate::release;
use crate::report::Reporter;
use crate::transfer;
use crate::transport;
use crate::workspace::ScratchDir;

/// Run the whole install flow and return the number of installed plugin
/// files (at least 1 on success).
pub fn run(config: &RunConfig, report: &Reporter) -> Result<u32, FatalError> {
    // Downloader availability is checked before anything else network- or
    // archive-shaped happens.
    let transport = transport::select()?;
    report.step(&format!("using {} for downloads", transport.name()));

    let asset = release::locate_asset(transport.as_ref(), report)?;
    report.step(&format!("latest Linux release: {}", asset.download_url));

    let scratch = ScratchDir::new()
        .map_err(|err| FatalError::Capability(format!("no usable scratch directory: {:#}", err)))?;

    let archive = transfer::download_and_verify(transport.as_ref(), &asset, scratch.path(), report)?;

    let unpack_dir = scratch.path().join("unpacked");
    fs::create_dir_all(&unpack_dir).map_err(|err| {
        FatalError::Extract(format!("could not create {}: {}", unpack_dir.display(), err))
    })?;
    report.step("extracting the release archive");
    extract::extract(&archive, &unpack_dir, report)?;

    report.step(&format!("installing into {}", config.target_dir.display()));
    install::install_plugins(&unpack_dir, &config.target_dir, report)
}
