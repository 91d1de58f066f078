use crate::ast::SourcePosition;
use crate::config::Config;
use crate::error::Error;
use color_print::ceprintln;
use std::fmt;

/// Compilation stopped early, by a fatal error or by hitting the error limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Abort;

pub type Outcome<T> = Result<T, Abort>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub fatal: bool,
    pub pos: Option<SourcePosition>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fatal {
            f.write_str("fatal: ")?;
        }
        match &self.pos {
            Some(pos) => write!(f, "{}: {}", pos, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Collects everything reported during one compilation.
#[derive(Debug)]
pub struct Diagnostics {
    limit: usize,
    quiet: bool,
    errors: usize,
    reported: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(config: &Config) -> Self {
        Self {
            limit: config.error_limit.max(1),
            quiet: config.quiet,
            errors: 0,
            reported: Vec::new(),
        }
    }

    /// Reports a recoverable error. Fails once the error limit is reached.
    pub fn error(&mut self, error: Error, pos: &SourcePosition) -> Outcome<()> {
        self.errors += 1;
        self.push(false, Some(pos), error);
        if self.errors >= self.limit {
            self.push(true, None, Error::TooManyErrors(self.errors));
            return Err(Abort);
        }
        Ok(())
    }

    /// Reports an error that ends compilation. The caller returns the `Abort`.
    pub fn fatal(&mut self, error: Error, pos: &SourcePosition) -> Abort {
        self.errors += 1;
        self.push(true, Some(pos), error);
        Abort
    }

    pub fn internal(&mut self, what: impl Into<String>, pos: &SourcePosition) -> Abort {
        self.fatal(Error::Internal(what.into()), pos)
    }

    pub fn count(&self) -> usize {
        self.errors
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }

    pub fn reported(&self) -> &[Diagnostic] {
        &self.reported
    }

    pub fn into_reported(self) -> Vec<Diagnostic> {
        self.reported
    }

    fn push(&mut self, fatal: bool, pos: Option<&SourcePosition>, error: Error) {
        let diagnostic = Diagnostic {
            fatal,
            pos: pos.cloned(),
            message: error.to_string(),
        };
        if !self.quiet {
            let label = if fatal { "fatal" } else { "error" };
            match &diagnostic.pos {
                Some(pos) => {
                    ceprintln!("<red,bold>{}</>: {}", label, diagnostic.message);
                    ceprintln!("     <blue>--></> <underline>{}</>", pos);
                }
                None => ceprintln!("<red,bold>{}</>: {}", label, diagnostic.message),
            }
        }
        self.reported.push(diagnostic);
    }
}
