use thiserror::Error;

/// Errors raised while lowering a type descriptor into emittable syntax
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LowerError {
    #[error("type not handled: {kind}")]
    TypeNotHandled { kind: String },

    #[error("expected variadic parameter to be a slice, got={found}")]
    VariadicNotSlice { found: String },

    #[error("failed to convert type {ty}: {source}")]
    Nested {
        ty: String,
        #[source]
        source: Box<LowerError>,
    },
}

impl LowerError {
    pub(crate) fn nested(ty: impl ToString, source: LowerError) -> Self {
        LowerError::Nested {
            ty: ty.to_string(),
            source: Box::new(source),
        }
    }

    /// The innermost error, skipping `Nested` wrappers
    pub fn root_cause(&self) -> &LowerError {
        match self {
            LowerError::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type LowerResult<T> = Result<T, LowerError>;
