use std::fmt;
use std::io;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Stage – which step of the pipeline raised an error
// ---------------------------------------------------------------------------

/// Pipeline stage, carried by every [`DataError`] so messages say where the
/// run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    ComputeDefaults,
    Clean,
    Summarize,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Load => "load",
            Stage::ComputeDefaults => "compute defaults",
            Stage::Clean => "clean",
            Stage::Summarize => "summarize",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// DataError
// ---------------------------------------------------------------------------

/// Every failure is fatal: the pipeline has no partial-completion mode.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("[{stage}] malformed input: {reason}")]
    MalformedInput { stage: Stage, reason: String },

    #[error("[{stage}] column '{column}' has no valid values")]
    EmptyInput { stage: Stage, column: &'static str },

    #[error("[{stage}] line {line}, column '{column}': cannot parse '{value}' as {expected}")]
    Parse {
        stage: Stage,
        line: u64,
        column: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error(
        "[{stage}] column '{column}': {statistic} needs at least {required} values, found {found}"
    )]
    InsufficientData {
        stage: Stage,
        column: &'static str,
        statistic: &'static str,
        required: usize,
        found: usize,
    },

    #[error("[{stage}] csv error: {source}")]
    Csv {
        stage: Stage,
        #[source]
        source: csv::Error,
    },

    #[error("[{stage}] i/o error: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: io::Error,
    },
}

impl DataError {
    /// Wrap a csv error, promoting ragged rows to `MalformedInput`.
    pub fn from_csv(stage: Stage, err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => {
                let line = pos.as_ref().map(|p| p.line()).unwrap_or(0);
                DataError::MalformedInput {
                    stage,
                    reason: format!("line {line} has {len} fields, header has {expected_len}"),
                }
            }
            _ => DataError::Csv { stage, source: err },
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            DataError::MalformedInput { stage, .. }
            | DataError::EmptyInput { stage, .. }
            | DataError::Parse { stage, .. }
            | DataError::InsufficientData { stage, .. }
            | DataError::Csv { stage, .. }
            | DataError::Io { stage, .. } => *stage,
        }
    }
}
