use reinforcer_types::LowerError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a generation run
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("must provide at least one file for generation")]
    NoFiles,

    #[error("multiple errors returned by method signature {method}")]
    MultipleErrors { method: String },

    #[error("method {method} does not return an error and is thus not retryable")]
    NotRetryable { method: String },

    #[error("failed to convert parameter type={ty} of method {method}; error={source}")]
    LowerParam {
        method: String,
        ty: String,
        #[source]
        source: LowerError,
    },

    #[error("failed to convert return type={ty} of method {method}; error={source}")]
    LowerResult {
        method: String,
        ty: String,
        #[source]
        source: LowerError,
    },

    #[error("failed to convert type parameter of {type_name}; error={source}")]
    LowerTypeParam {
        type_name: String,
        #[source]
        source: LowerError,
    },

    #[error("multiple types with same name discovered with name {name}")]
    DuplicateType { name: String },

    #[error("no targetable types were discovered")]
    NoTargetableTypes,

    #[error("failed to load from {source_path}: {message}")]
    Load {
        source_path: String,
        message: String,
    },

    #[error("invalid target expression '{expr}': {source}")]
    InvalidTarget {
        expr: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to parse manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("output file {} for {type_name} is already claimed by {claimed_by}", path.display())]
    OutputCollision {
        path: PathBuf,
        type_name: String,
        claimed_by: String,
    },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenerateError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type GenerateResult<T> = Result<T, GenerateError>;
