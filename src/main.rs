//! sagekit: command-line front end for the SageMaker batch helpers.

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sagekit::{revision, AwsSettings, Session, TransformOptions};
use serde_json::json;

/// SageMaker batch-inference helpers
#[derive(Parser)]
#[command(name = "sagekit")]
#[command(about = "Resolve execution roles, register models, run batch transforms", long_about = None)]
#[command(version)]
struct Cli {
    /// AWS region override
    #[arg(long, global = true)]
    region: Option<String>,

    /// Named AWS profile to resolve credentials from
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Alternative API endpoint (LocalStack-style setups)
    #[arg(long, global = true, env = "SAGEKIT_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the execution role ARN for the current credentials
    Role,

    /// Register a model from a completed training job
    ///
    /// The model is named `<training-job-name>-model`; registering the
    /// same job twice reuses the existing model.
    CreateModel {
        /// Name of the completed training job
        training_job_name: String,
    },

    /// Run a batch transform job
    Transform {
        /// Registered model name to run inference with
        #[arg(long)]
        model: String,

        /// S3 URI of the input records
        #[arg(long)]
        input: String,

        /// S3 URI the predictions are written under
        #[arg(long)]
        output: String,

        /// Instance type for the job
        #[arg(long, default_value = "ml.c4.xlarge")]
        instance_type: String,

        /// Number of instances
        #[arg(long, default_value_t = 1)]
        instance_count: i32,

        /// MIME type of the input records
        #[arg(long, default_value = "text/csv")]
        content_type: String,

        /// Seconds between status polls while waiting
        #[arg(long, default_value_t = 30)]
        poll_seconds: u64,

        /// Give up waiting after this many seconds (0 waits forever)
        #[arg(long)]
        timeout_seconds: Option<u64>,

        /// Submit the job and print its name without waiting
        #[arg(long)]
        no_wait: bool,
    },

    /// Stop a running transform job
    Stop {
        /// Name of the transform job to stop
        job_name: String,
    },

    /// Print the source revision (`git describe --always`)
    Revision,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = AwsSettings {
        region: cli.region.clone(),
        profile: cli.profile.clone(),
        endpoint_url: cli.endpoint_url.clone(),
    };

    match cli.command {
        Commands::Role => {
            let session = Session::from_settings(&settings).await;
            let arn = session.resolve_execution_role().await?;
            emit(cli.json, json!({ "role_arn": arn }), &arn);
        }
        Commands::CreateModel { training_job_name } => {
            let session = Session::from_settings(&settings).await;
            let model = session.register_model(&training_job_name).await?;
            emit(cli.json, json!({ "model_name": model }), &model);
        }
        Commands::Transform {
            model,
            input,
            output,
            instance_type,
            instance_count,
            content_type,
            poll_seconds,
            timeout_seconds,
            no_wait,
        } => {
            let mut options = TransformOptions {
                instance_type: instance_type.as_str().into(),
                instance_count,
                content_type,
                poll_interval: Duration::from_secs(poll_seconds),
                ..TransformOptions::default()
            };
            options.timeout = match timeout_seconds {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => options.timeout,
            };

            let session = Session::from_settings(&settings).await;
            if no_wait {
                let job = session
                    .start_transform(&model, &input, &output, &options)
                    .await?;
                emit(cli.json, json!({ "transform_job": job }), &job);
            } else {
                let location = session.transform(&model, &input, &output, &options).await?;
                emit(cli.json, json!({ "output_location": location }), &location);
            }
        }
        Commands::Stop { job_name } => {
            let session = Session::from_settings(&settings).await;
            session.stop_transform(&job_name).await?;
            emit(cli.json, json!({ "stopped": job_name }), "stop requested");
        }
        Commands::Revision => {
            let hash = revision::git_revision()?;
            emit(cli.json, json!({ "revision": hash }), &hash);
        }
    }

    Ok(())
}

fn emit(as_json: bool, value: serde_json::Value, plain: &str) {
    if as_json {
        println!("{value:#}");
    } else {
        println!("{plain}");
    }
}
