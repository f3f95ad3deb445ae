//! Error types for SageMaker helper operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while driving SageMaker, IAM or STS.
#[derive(Debug, Error)]
pub enum Error {
    /// An AWS API call failed. The message carries the operation context;
    /// the boxed source is the underlying SDK error.
    #[error("{message}")]
    Api {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The caller identity is not a role, so no execution role can be
    /// derived from it.
    #[error("current AWS identity '{arn}' is not a role")]
    NotARole { arn: String },

    /// No auto-created SageMaker execution role was found under
    /// `/service-role/`.
    #[error("no SageMaker execution role found under /service-role/")]
    NoExecutionRole,

    /// A training-job description lacked a field needed to register a model.
    #[error("training job '{job_name}' description is missing {field}")]
    IncompleteTrainingJob {
        job_name: String,
        field: &'static str,
    },

    /// A transform job finished in a non-success state.
    #[error("transform job '{job_name}' ended as {status}: {reason}")]
    TransformFailed {
        job_name: String,
        status: String,
        reason: String,
    },

    /// A transform job did not reach a terminal state within the configured
    /// timeout. The job keeps running remotely; `stop_transform` cancels it.
    #[error("transform job '{job_name}' still running after {timeout:?}")]
    TransformTimeout { job_name: String, timeout: Duration },

    /// A request descriptor was missing a required member.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] aws_sdk_sagemaker::error::BuildError),

    /// Spawning an external command failed.
    #[error("failed to run '{command}'")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An external command exited with a non-zero status.
    #[error("'{command}' exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// An external command produced output that is not valid UTF-8.
    #[error("'{command}' produced non-UTF-8 output")]
    CommandOutput { command: String },
}

/// Result type for SageMaker helper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Wraps an AWS SDK error with the operation context it occurred in.
pub(crate) fn api_error(
    context: impl std::fmt::Display,
    err: impl std::error::Error + Send + Sync + 'static,
) -> Error {
    Error::Api {
        message: format!("{context}: {err}"),
        source: Box::new(err),
    }
}
