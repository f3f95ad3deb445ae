//! Batch transform: submit, bounded wait, stop.
//!
//! A transform job reads records from an S3 prefix, runs them through a
//! registered model, and writes predictions next to an output prefix. The
//! submit and wait halves are exposed separately so callers can bound the
//! wait, poll from elsewhere, or cancel with [`Session::stop_transform`];
//! [`Session::transform`] is the submit-and-wait convenience.

use std::time::Duration;

use aws_sdk_sagemaker::types::{
    AssemblyType, S3DataType, SplitType, TransformDataSource, TransformInput,
    TransformInstanceType, TransformJobStatus, TransformOutput, TransformResources,
    TransformS3DataSource,
};
use chrono::{DateTime, Utc};

use crate::error::{api_error, Error, Result};
use crate::session::Session;

/// Settings for a batch transform run.
#[derive(Debug, Clone)]
pub struct TransformOptions {
    /// Prefix for the generated job name; a UTC timestamp is appended.
    pub base_job_name: String,
    /// Instance type the job runs on.
    pub instance_type: TransformInstanceType,
    /// Number of instances.
    pub instance_count: i32,
    /// MIME type of the input records.
    pub content_type: String,
    /// How often the wait loop re-reads the job status.
    pub poll_interval: Duration,
    /// Upper bound on the wait. `None` waits until the job ends, however
    /// long that takes.
    pub timeout: Option<Duration>,
}

impl Default for TransformOptions {
    /// One `ml.c4.xlarge` instance over line-split CSV, polled every 30
    /// seconds for at most a day.
    fn default() -> Self {
        Self {
            base_job_name: "Batch-Transform".to_string(),
            instance_type: TransformInstanceType::MlC4Xlarge,
            instance_count: 1,
            content_type: "text/csv".to_string(),
            poll_interval: Duration::from_secs(30),
            timeout: Some(Duration::from_secs(24 * 60 * 60)),
        }
    }
}

impl Session {
    /// Submits a transform job and returns its generated name without
    /// waiting for it.
    ///
    /// Input is read as an S3 prefix and split by line; output is
    /// line-assembled under `output_uri`.
    pub async fn start_transform(
        &self,
        model_name: &str,
        input_uri: &str,
        output_uri: &str,
        options: &TransformOptions,
    ) -> Result<String> {
        let job_name = transform_job_name(&options.base_job_name, Utc::now());

        let data_source = TransformDataSource::builder()
            .s3_data_source(
                TransformS3DataSource::builder()
                    .s3_data_type(S3DataType::S3Prefix)
                    .s3_uri(input_uri)
                    .build()?,
            )
            .build()?;
        let input = TransformInput::builder()
            .data_source(data_source)
            .content_type(&options.content_type)
            .split_type(SplitType::Line)
            .build()?;
        let output = TransformOutput::builder()
            .s3_output_path(output_uri)
            .assemble_with(AssemblyType::Line)
            .build()?;
        let resources = TransformResources::builder()
            .instance_type(options.instance_type.clone())
            .instance_count(options.instance_count)
            .build()?;

        let created = self
            .sagemaker
            .create_transform_job()
            .transform_job_name(&job_name)
            .model_name(model_name)
            .transform_input(input)
            .transform_output(output)
            .transform_resources(resources)
            .send()
            .await
            .map_err(|e| api_error(format!("failed to start transform job '{job_name}'"), e))?;

        tracing::info!(
            job = %job_name,
            arn = created.transform_job_arn(),
            model = %model_name,
            "started transform job"
        );
        Ok(job_name)
    }

    /// Waits until `job_name` reaches a terminal state.
    ///
    /// Polls every `options.poll_interval`. A `Completed` job returns
    /// `Ok(())`; `Failed` and `Stopped` surface the remote failure reason.
    /// When `options.timeout` elapses first the job is left running and
    /// [`Error::TransformTimeout`] is returned.
    pub async fn wait_for_transform(
        &self,
        job_name: &str,
        options: &TransformOptions,
    ) -> Result<()> {
        let started = tokio::time::Instant::now();
        loop {
            let described = self
                .sagemaker
                .describe_transform_job()
                .transform_job_name(job_name)
                .send()
                .await
                .map_err(|e| {
                    api_error(format!("failed to describe transform job '{job_name}'"), e)
                })?;

            let status = described.transform_job_status().clone();
            match status {
                TransformJobStatus::Completed => {
                    tracing::info!(job = %job_name, "transform job completed");
                    return Ok(());
                }
                TransformJobStatus::Failed | TransformJobStatus::Stopped => {
                    return Err(Error::TransformFailed {
                        job_name: job_name.to_string(),
                        status: status.as_str().to_string(),
                        reason: described
                            .failure_reason()
                            .unwrap_or("no failure reason reported")
                            .to_string(),
                    });
                }
                other => {
                    tracing::debug!(job = %job_name, status = other.as_str(), "transform job still running");
                }
            }

            if let Some(timeout) = options.timeout {
                if started.elapsed() >= timeout {
                    return Err(Error::TransformTimeout {
                        job_name: job_name.to_string(),
                        timeout,
                    });
                }
            }
            tokio::time::sleep(options.poll_interval).await;
        }
    }

    /// Submits a transform job, waits for it to finish, and returns the
    /// output location unchanged.
    pub async fn transform(
        &self,
        model_name: &str,
        input_uri: &str,
        output_uri: &str,
        options: &TransformOptions,
    ) -> Result<String> {
        let job_name = self
            .start_transform(model_name, input_uri, output_uri, options)
            .await?;
        self.wait_for_transform(&job_name, options).await?;
        Ok(output_uri.to_string())
    }

    /// Requests a stop of a running transform job.
    ///
    /// The stop is asynchronous on the service side; pair with
    /// [`Session::wait_for_transform`] to observe the `Stopped` state.
    pub async fn stop_transform(&self, job_name: &str) -> Result<()> {
        self.sagemaker
            .stop_transform_job()
            .transform_job_name(job_name)
            .send()
            .await
            .map_err(|e| api_error(format!("failed to stop transform job '{job_name}'"), e))?;
        tracing::info!(job = %job_name, "requested transform job stop");
        Ok(())
    }
}

/// Derives a unique job name from the base name and a UTC timestamp.
///
/// Transform job names must be unique per account and region, so the
/// base gets a millisecond-resolution stamp appended.
fn transform_job_name(base: &str, now: DateTime<Utc>) -> String {
    format!("{base}-{}", now.format("%Y-%m-%d-%H-%M-%S-%3f"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn job_name_appends_millisecond_stamp() {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 45).unwrap();
        assert_eq!(
            transform_job_name("Batch-Transform", at),
            "Batch-Transform-2024-06-01-12-30-45-000"
        );
    }

    #[test]
    fn job_names_stay_within_the_api_limit() {
        let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        // Transform job names are capped at 63 characters.
        assert!(transform_job_name("Batch-Transform", at).len() <= 63);
    }

    #[test]
    fn defaults_match_the_original_job_shape() {
        let options = TransformOptions::default();
        assert_eq!(options.instance_type, TransformInstanceType::MlC4Xlarge);
        assert_eq!(options.instance_count, 1);
        assert_eq!(options.content_type, "text/csv");
        assert!(options.timeout.is_some());
    }
}
