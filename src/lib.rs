//! SageMaker batch-inference helpers.
//!
//! This crate wraps the handful of AWS control-plane calls a batch-prediction
//! pipeline needs: resolving the execution role credentials are attributed
//! to, registering a model from a finished training job, running a batch
//! transform over an S3 input, and stamping results with the source
//! revision. Each operation is a thin, stateless delegation to the AWS API;
//! all durable state (roles, models, jobs, artifacts) lives server-side.
//!
//! # Module Organization
//!
//! - [`session`] - AWS client bundle and config-chain overrides
//! - [`role`] - execution-role resolution with IAM service-role fallback
//! - [`model`] - model registration from a training-job description
//! - [`transform`] - batch-transform submit, bounded wait, and stop
//! - [`revision`] - source revision marker from `git describe`
//! - [`error`] - crate error enum and `Result` alias
//!
//! # Example
//!
//! ```rust,no_run
//! use sagekit::{Session, TransformOptions};
//!
//! # async fn example() -> sagekit::Result<()> {
//! let session = Session::from_env().await;
//! let role = session.resolve_execution_role().await?;
//! let model = session.register_model("churn-2024-06-01").await?;
//! let output = session
//!     .transform(
//!         &model,
//!         "s3://my-bucket/input/records.csv",
//!         "s3://my-bucket/predictions/",
//!         &TransformOptions::default(),
//!     )
//!     .await?;
//! # let _ = (role, output);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod revision;
pub mod role;
pub mod session;
pub mod transform;

pub use error::{Error, Result};
pub use session::{AwsSettings, Session};
pub use transform::TransformOptions;
