//! Target-directory resolution.
//!
//! Resolves `PLUGGET_INSTALL_DIR` (or an interactive answer) into an
//! existing directory before any network activity happens. Interactive I/O
//! sits behind the [`Prompter`] trait so the pipeline itself never reads
//! stdin and tests can script every answer.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::FatalError;
use crate::report::{Reporter, Verbosity};

/// Environment variable naming the installation target directory.
pub const INSTALL_DIR_ENV: &str = "PLUGGET_INSTALL_DIR";

/// Shown when prompting interactively; common Linux plugin locations.
const SUGGESTED_DIRS: [&str; 4] = [
    "~/.vst3",
    "~/.clap",
    "/usr/lib/vst3",
    "/usr/local/lib/vst3",
];

/// Immutable per-run configuration.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub target_dir: PathBuf,
    pub verbosity: Verbosity,
}

/// Interactive question/answer source.
pub trait Prompter {
    /// Ask for a free-form line; the answer is returned trimmed.
    fn ask(&mut self, question: &str) -> io::Result<String>;
    /// Yes/no question, defaulting to no.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Real prompter: writes to stdout, reads one line from stdin.
pub struct StdioPrompter;

impl Prompter for StdioPrompter {
    fn ask(&mut self, question: &str) -> io::Result<String> {
        print!("{}: ", question);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{} [y/N]", question))?;
        Ok(matches!(answer.as_str(), "y" | "Y" | "yes" | "Yes"))
    }
}

/// Resolve the installation directory.
///
/// Quiet runs fail immediately on an unset variable or a missing directory.
/// Interactive runs get a menu of common locations, one chance to correct a
/// bad path, and an offer to create it. On success the returned path exists
/// and is a directory; writability is not validated here (copy failures
/// surface in the installer).
pub fn resolve_target_dir(
    env_value: Option<&str>,
    report: &Reporter,
    prompter: &mut dyn Prompter,
) -> Result<PathBuf, FatalError> {
    let quiet = report.verbosity().is_quiet();
    let home = std::env::var("HOME").ok();

    let raw = match env_value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value.to_string(),
        None if quiet => {
            return Err(FatalError::Config(format!("{} is not set", INSTALL_DIR_ENV)));
        }
        None => {
            report.info("No install directory configured. Common plugin directories:");
            for dir in SUGGESTED_DIRS {
                report.info(&format!("  {}", dir));
            }
            ask(prompter, "Install directory")?
        }
    };

    let mut path = expand_tilde(&raw, home.as_deref());
    if path.is_dir() {
        return Ok(path);
    }

    if quiet {
        return Err(FatalError::Config(format!(
            "install directory {} does not exist",
            path.display()
        )));
    }

    report.info(&format!("{} is not an existing directory", path.display()));
    let corrected = ask(prompter, "Install directory")?;
    path = expand_tilde(&corrected, home.as_deref());
    if path.is_dir() {
        return Ok(path);
    }

    let create = prompter
        .confirm(&format!("Create {}?", path.display()))
        .map_err(|err| FatalError::Config(format!("prompt failed: {}", err)))?;
    if !create {
        return Err(FatalError::Config(format!(
            "install directory {} does not exist and was not created",
            path.display()
        )));
    }
    fs::create_dir_all(&path).map_err(|err| {
        FatalError::Config(format!("failed to create {}: {}", path.display(), err))
    })?;
    tracing::info!("created install directory {}", path.display());
    Ok(path)
}

fn ask(prompter: &mut dyn Prompter, question: &str) -> Result<String, FatalError> {
    prompter
        .ask(question)
        .map_err(|err| FatalError::Config(format!("prompt failed: {}", err)))
}

/// Expand a leading `~` or `~/` to the home directory. `~user` forms and
/// mid-path tildes are left untouched.
pub(crate) fn expand_tilde(input: &str, home: Option<&str>) -> PathBuf {
    if let Some(home) = home {
        if input == "~" {
            return PathBuf::from(home);
        }
        if let Some(rest) = input.strip_prefix("~/") {
            return Path::new(home).join(rest);
        }
    }
    PathBuf::from(input)
}
