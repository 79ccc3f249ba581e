//! Fatal error taxonomy for an install run.
//!
//! Every stage reports failure by returning one of these variants to the
//! orchestrator; the CLI maps the final result to a process exit code. The
//! labels match the error lines the tool prints, so a failed run always
//! names the stage that stopped it.

use thiserror::Error;

/// A fatal, run-ending error. Checksum problems are deliberately absent:
/// integrity issues are warnings, never errors.
#[derive(Debug, Error)]
pub enum FatalError {
    /// No or invalid target directory; user-correctable via re-run.
    #[error("configuration error: {0}")]
    Config(String),
    /// A required external tool is missing; environment-correctable.
    #[error("capability error: {0}")]
    Capability(String),
    /// No release asset URL could be discovered.
    #[error("locator error: {0}")]
    Locator(String),
    /// The archive download failed or produced an empty file.
    #[error("transfer error: {0}")]
    Transfer(String),
    /// Every extraction candidate failed.
    #[error("extraction error: {0}")]
    Extract(String),
    /// No plugin file was found in the extracted tree.
    #[error("installation error: {0}")]
    Install(String),
}
