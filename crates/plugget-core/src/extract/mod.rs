//! Archive extraction dispatcher.
//!
//! Tries an ordered list of external extractor tools, probing availability
//! before each attempt and trusting only the tool's exit status. A present
//! tool that fails logs a warning and falls through to the next candidate.
//! When every external candidate is exhausted, the built-in unpacker runs
//! as the last resort.

pub mod builtin;

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::FatalError;
use crate::probe;
use crate::report::Reporter;

struct Candidate {
    tool: &'static str,
    args: fn(&Path, &Path, bool) -> Vec<OsString>,
}

/// Candidate order: tar first (the archives are gzip tarballs), then the
/// zip-capable tools in decreasing likelihood of being installed.
const CANDIDATES: [Candidate; 4] = [
    Candidate {
        tool: "tar",
        args: tar_args,
    },
    Candidate {
        tool: "unzip",
        args: unzip_args,
    },
    Candidate {
        tool: "7z",
        args: sevenzip_args,
    },
    Candidate {
        tool: "7za",
        args: sevenzip_args,
    },
];

fn tar_args(archive: &Path, dest: &Path, verbose: bool) -> Vec<OsString> {
    let extract_flag = if verbose { "-xvf" } else { "-xf" };
    let mut args: Vec<OsString> = vec![extract_flag.into()];
    args.push(archive.into());
    args.push("-C".into());
    args.push(dest.into());
    args
}

fn unzip_args(archive: &Path, dest: &Path, verbose: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-o".into()];
    if !verbose {
        args.push("-q".into());
    }
    args.push(archive.into());
    args.push("-d".into());
    args.push(dest.into());
    args
}

fn sevenzip_args(archive: &Path, dest: &Path, _verbose: bool) -> Vec<OsString> {
    let mut out_flag = OsString::from("-o");
    out_flag.push(dest);
    vec!["x".into(), "-y".into(), out_flag, archive.into()]
}

/// Unpack `archive` into `dest`, which must already exist.
pub fn extract(archive: &Path, dest: &Path, report: &Reporter) -> Result<(), FatalError> {
    let verbose = report.verbosity().is_verbose();
    for candidate in &CANDIDATES {
        let bin = match probe::find_in_path(candidate.tool) {
            Some(bin) => bin,
            None => {
                tracing::debug!("{} not on PATH; skipping", candidate.tool);
                continue;
            }
        };
        report.info(&format!("extracting with {}", candidate.tool));
        match run_extractor(&bin, (candidate.args)(archive, dest, verbose), verbose) {
            Ok(()) => return Ok(()),
            Err(err) => report.warn(&format!(
                "{} failed: {:#}; trying the next extractor",
                candidate.tool, err
            )),
        }
    }

    report.info("no external extractor succeeded; using the built-in unpacker");
    builtin::unpack(archive, dest)
        .map_err(|err| FatalError::Extract(format!("{:#}", err)))
}

/// Run one extractor invocation. Success is the tool's exit status, even
/// when its output is suppressed.
fn run_extractor(bin: &Path, args: Vec<OsString>, verbose: bool) -> Result<()> {
    let mut cmd = Command::new(bin);
    cmd.args(args).stdin(Stdio::null());
    if verbose {
        let status = cmd
            .status()
            .with_context(|| format!("failed to spawn {}", bin.display()))?;
        if !status.success() {
            bail!("exited with {}", status);
        }
    } else {
        let output = cmd
            .output()
            .with_context(|| format!("failed to spawn {}", bin.display()))?;
        if !output.status.success() {
            bail!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
    }
    Ok(())
}
