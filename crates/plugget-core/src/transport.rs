//! Download transport fallback chain.
//!
//! The pipeline never speaks HTTP itself; it orchestrates the system
//! download tools. Candidates are tried in preference order and the first
//! one present on `$PATH` is used for the whole run. Verbose runs let the
//! tool's own progress output through; otherwise it is captured and only
//! surfaced on failure.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::FatalError;
use crate::probe;
use crate::report::Verbosity;

/// One download tool. `fetch_text` is used for release listings,
/// `fetch_file` for the archive and its checksum companion.
pub trait Transport {
    fn name(&self) -> &'static str;
    fn is_available(&self) -> bool;
    fn fetch_text(&self, url: &str) -> Result<String>;
    fn fetch_file(&self, url: &str, dest: &Path, verbosity: Verbosity) -> Result<()>;
}

/// Primary tool: `curl`.
pub struct CurlTransport;

/// Secondary tool: `wget`.
pub struct WgetTransport;

/// Pick the first available tool in `{curl, wget}` order.
///
/// Raised before anything else in the pipeline runs, so a machine with no
/// downloader fails fast with a capability error.
pub fn select() -> Result<Box<dyn Transport>, FatalError> {
    let candidates: [Box<dyn Transport>; 2] = [Box::new(CurlTransport), Box::new(WgetTransport)];
    for candidate in candidates {
        if candidate.is_available() {
            tracing::debug!("selected {} as download tool", candidate.name());
            return Ok(candidate);
        }
    }
    Err(FatalError::Capability(
        "no download tool found; install curl or wget".into(),
    ))
}

impl Transport for CurlTransport {
    fn name(&self) -> &'static str {
        "curl"
    }

    fn is_available(&self) -> bool {
        probe::is_available(self.name())
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        let output = Command::new("curl")
            .args(["-fsSL", url])
            .stdin(Stdio::null())
            .output()
            .context("failed to spawn curl")?;
        if !output.status.success() {
            bail!(
                "curl {} failed ({}): {}",
                url,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn fetch_file(&self, url: &str, dest: &Path, verbosity: Verbosity) -> Result<()> {
        let mut cmd = Command::new("curl");
        cmd.arg("-fL").arg("-o").arg(dest).arg(url);
        if !verbosity.is_verbose() {
            cmd.arg("-sS");
        }
        run_download(&mut cmd, "curl", verbosity)
    }
}

impl Transport for WgetTransport {
    fn name(&self) -> &'static str {
        "wget"
    }

    fn is_available(&self) -> bool {
        probe::is_available(self.name())
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        let output = Command::new("wget")
            .args(["-qO-", url])
            .stdin(Stdio::null())
            .output()
            .context("failed to spawn wget")?;
        if !output.status.success() {
            bail!(
                "wget {} failed ({}): {}",
                url,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn fetch_file(&self, url: &str, dest: &Path, verbosity: Verbosity) -> Result<()> {
        let mut cmd = Command::new("wget");
        if !verbosity.is_verbose() {
            cmd.arg("-q");
        }
        cmd.arg("-O").arg(dest).arg(url);
        run_download(&mut cmd, "wget", verbosity)
    }
}

/// Run a file download command. Verbose inherits the tool's stdio so its
/// progress meter stays visible; otherwise output is captured and attached
/// to the error. Success is judged solely by the exit status.
fn run_download(cmd: &mut Command, tool: &str, verbosity: Verbosity) -> Result<()> {
    cmd.stdin(Stdio::null());
    if verbosity.is_verbose() {
        let status = cmd
            .status()
            .with_context(|| format!("failed to spawn {}", tool))?;
        if !status.success() {
            bail!("{} exited with {}", tool, status);
        }
    } else {
        let output = cmd
            .output()
            .with_context(|| format!("failed to spawn {}", tool))?;
        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                tool,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
    }
    Ok(())
}
