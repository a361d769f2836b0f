//! Error types shared by every stage of the inference pipeline.

use thiserror::Error;

/// Errors that can occur while loading, batching, or running a model.
///
/// Nothing in the crate retries or swallows these: a failure in any batch
/// aborts the whole call and no partial results are returned.
#[derive(Debug, Error)]
pub enum AdaptError {
    /// The execution context has no model bound yet.
    #[error("No model is bound to the learner, bind one with `set_model` before running inference")]
    Misconfigured,

    /// The operation is not supported by this model family.
    #[error("`{operation}` is not implemented for {model}")]
    NotImplemented {
        model: &'static str,
        operation: &'static str,
    },

    /// A caller supplied an unusable argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An identifier could not be resolved to a tokenizer or model.
    #[error("Failed to resolve '{identifier}': {source}")]
    Resolution {
        identifier: String,
        #[source]
        source: anyhow::Error,
    },

    /// The underlying generation call failed.
    #[error("Generation failed: {0}")]
    Generation(#[source] anyhow::Error),

    /// Encoding or decoding text failed.
    #[error("Tokenization failed: {0}")]
    Tokenization(#[source] anyhow::Error),

    /// A tensor operation failed inside a backend.
    #[error("Tensor operation failed: {0}")]
    Tensor(#[source] anyhow::Error),

    /// A batch carried fewer input tensors than the assembler needs.
    #[error("Malformed batch: expected at least 2 input tensors, got {0}")]
    MalformedBatch(usize),

    /// A hook needed named inputs but the router exposed them positionally.
    #[error("`{hook}` requires dictionary-routed inputs, enable `as_dict` on the learner")]
    RoutingMismatch { hook: &'static str },

    /// A batch was cancelled but no hook stored a prediction for it.
    #[error("Batch {0} was cancelled without producing a prediction")]
    MissingPrediction(usize),

    /// A blocking worker task could not be joined.
    #[error("Worker task failed: {0}")]
    Worker(#[source] anyhow::Error),
}

impl AdaptError {
    /// Wraps an external generation failure.
    pub fn generation<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        AdaptError::Generation(err.into())
    }

    /// Wraps a failure from a tensor library.
    pub fn tensor<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        AdaptError::Tensor(err.into())
    }

    /// Wraps a failure to resolve `identifier`.
    pub fn resolution<E>(identifier: &str, err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        AdaptError::Resolution {
            identifier: identifier.to_string(),
            source: err.into(),
        }
    }
}

/// Result type for every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, AdaptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AdaptError>();
    }

    #[test]
    fn test_not_implemented_message() {
        let err = AdaptError::NotImplemented {
            model: "TransformersTranslator",
            operation: "train",
        };
        assert_eq!(err.to_string(), "`train` is not implemented for TransformersTranslator");
    }

    #[test]
    fn test_resolution_keeps_identifier_and_source() {
        let err = AdaptError::resolution("missing/model", anyhow::anyhow!("404"));
        match &err {
            AdaptError::Resolution { identifier, source } => {
                assert_eq!(identifier, "missing/model");
                assert_eq!(source.to_string(), "404");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("missing/model"));
    }

    #[test]
    fn test_malformed_batch_message() {
        let err = AdaptError::MalformedBatch(1);
        assert!(err.to_string().contains("got 1"));
    }
}
