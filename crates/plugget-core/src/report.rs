//! Console reporting at two verbosity levels.
//!
//! The console is a user surface, separate from the `tracing` log file:
//! quiet suppresses everything except errors, verbose additionally lets the
//! external tools' own progress output through (see `transport` and
//! `extract`). Every console message is mirrored to the log regardless of
//! level.

/// Console verbosity, derived from the `-q`/`-v` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

impl Verbosity {
    /// The flags are mutually exclusive (enforced by the CLI parser);
    /// quiet wins if both somehow arrive.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    pub fn is_quiet(self) -> bool {
        self == Verbosity::Quiet
    }

    pub fn is_verbose(self) -> bool {
        self == Verbosity::Verbose
    }
}

/// Progress/warning printer for one run.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    verbosity: Verbosity,
}

impl Reporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// A major pipeline step ("downloading ...", "extracting ...").
    pub fn step(&self, msg: &str) {
        tracing::info!("{}", msg);
        if !self.verbosity.is_quiet() {
            println!("==> {}", msg);
        }
    }

    /// Informational detail; also used for non-fatal skips.
    pub fn info(&self, msg: &str) {
        tracing::info!("{}", msg);
        if !self.verbosity.is_quiet() {
            println!("{}", msg);
        }
    }

    /// Non-fatal warning (e.g. checksum mismatch). Never alters the outcome.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{}", msg);
        if !self.verbosity.is_quiet() {
            eprintln!("warning: {}", msg);
        }
    }

    /// Final success summary.
    pub fn success(&self, msg: &str) {
        tracing::info!("{}", msg);
        if !self.verbosity.is_quiet() {
            println!("{}", msg);
        }
    }
}
