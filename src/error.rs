use thiserror::Error;

/// Everything that can go wrong in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid parameter for {name}: {reason}")]
    Parameter { name: &'static str, reason: String },

    #[error("empty sample sequence")]
    EmptyInput,

    #[error("rejection sampling exhausted after {attempts} attempts")]
    RejectionExhausted { attempts: u64 },

    /// A caller-supplied target or simulator failed. The source error is
    /// preserved unmodified.
    #[error("target evaluation failed")]
    TargetEvaluation(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Error::Parameter {
            name,
            reason: reason.into(),
        }
    }

    /// Wrap a caller error without losing it.
    pub fn target<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::TargetEvaluation(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
