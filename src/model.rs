//! Model registration from a finished training job.
//!
//! A training job's description carries everything a model record needs:
//! the artifact location in S3, the container image that produced it, and
//! the execution role. `CreateModel` is idempotent by convention here --
//! registering the same training job twice reuses the existing model.

use aws_sdk_sagemaker::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_sagemaker::operation::create_model::CreateModelError;
use aws_sdk_sagemaker::types::ContainerDefinition;

use crate::error::{api_error, Error, Result};
use crate::session::Session;

/// The deterministic model name derived from a training job name.
pub fn model_name_for(training_job_name: &str) -> String {
    format!("{training_job_name}-model")
}

impl Session {
    /// Registers a model built by `training_job_name` and returns its name.
    ///
    /// The model is named `<training_job_name>-model`. If a model with that
    /// name already exists the existing one is reused; any other
    /// `CreateModel` failure (permissions, limits, malformed request)
    /// propagates.
    pub async fn register_model(&self, training_job_name: &str) -> Result<String> {
        let model_name = model_name_for(training_job_name);

        let info = self
            .sagemaker
            .describe_training_job()
            .training_job_name(training_job_name)
            .send()
            .await
            .map_err(|e| {
                api_error(
                    format!("failed to describe training job '{training_job_name}'"),
                    e,
                )
            })?;

        let model_data = info.model_artifacts().s3_model_artifacts().to_string();
        let image = info
            .algorithm_specification()
            .training_image()
            .ok_or_else(|| Error::IncompleteTrainingJob {
                job_name: training_job_name.to_string(),
                field: "a training image",
            })?
            .to_string();
        let role = info
            .role_arn()
            .ok_or_else(|| Error::IncompleteTrainingJob {
                job_name: training_job_name.to_string(),
                field: "an execution role",
            })?
            .to_string();

        let container = ContainerDefinition::builder()
            .image(image)
            .model_data_url(&model_data)
            .build();

        match self
            .sagemaker
            .create_model()
            .model_name(&model_name)
            .execution_role_arn(role)
            .primary_container(container)
            .send()
            .await
        {
            Ok(created) => {
                tracing::info!(model = %model_name, arn = created.model_arn(), "registered model");
                Ok(model_name)
            }
            Err(err) if is_duplicate_model(&err) => {
                tracing::debug!(model = %model_name, "model already exists, reusing it");
                Ok(model_name)
            }
            Err(err) => Err(api_error(
                format!("failed to create model '{model_name}'"),
                err,
            )),
        }
    }
}

/// True when `CreateModel` rejected the request because the model already
/// exists. Every other service error, including other validation failures,
/// is treated as genuine.
fn is_duplicate_model(err: &SdkError<CreateModelError>) -> bool {
    err.as_service_error()
        .is_some_and(|service| is_duplicate_model_metadata(service.code(), service.message()))
}

fn is_duplicate_model_metadata(code: Option<&str>, message: Option<&str>) -> bool {
    code == Some("ValidationException")
        && message.is_some_and(|m| m.contains("Cannot create already existing model"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_name_is_deterministic() {
        assert_eq!(model_name_for("churn-2024-06-01"), "churn-2024-06-01-model");
        assert_eq!(model_name_for(""), "-model");
    }

    #[test]
    fn duplicate_detection_requires_validation_exception() {
        assert!(is_duplicate_model_metadata(
            Some("ValidationException"),
            Some("Cannot create already existing model \"arn:aws:sagemaker:eu-west-1:1:model/x\"."),
        ));
    }

    #[test]
    fn other_validation_failures_are_not_duplicates() {
        assert!(!is_duplicate_model_metadata(
            Some("ValidationException"),
            Some("Could not access model data at s3://bucket/missing."),
        ));
    }

    #[test]
    fn other_error_codes_are_not_duplicates() {
        assert!(!is_duplicate_model_metadata(
            Some("AccessDeniedException"),
            Some("Cannot create already existing model"),
        ));
        assert!(!is_duplicate_model_metadata(None, None));
    }
}
