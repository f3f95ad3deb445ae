//! AWS client bundle and configuration overrides.
//!
//! [`Session`] owns one client per service the helpers talk to. All three
//! are built from a single [`SdkConfig`] loaded through the standard AWS
//! config chain (environment, profiles, IMDS), optionally adjusted by
//! [`AwsSettings`] for region, profile and endpoint overrides.

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Overrides layered on top of the default AWS config chain.
///
/// All fields are optional; an empty `AwsSettings` resolves exactly like
/// `aws_config::load_defaults`. The endpoint override points every client
/// at an alternative API endpoint, which is how the integration tests and
/// LocalStack-style setups run without touching real AWS.
#[derive(Debug, Clone, Default)]
pub struct AwsSettings {
    /// AWS region, e.g. `eu-west-1`. Falls back to the config chain.
    pub region: Option<String>,
    /// Named profile from the shared AWS config files.
    pub profile: Option<String>,
    /// Custom endpoint URL applied to all service clients.
    pub endpoint_url: Option<String>,
}

impl AwsSettings {
    /// Resolves the config chain with these overrides applied.
    pub async fn load(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        loader.load().await
    }
}

/// Client bundle for the SageMaker helper operations.
///
/// Holds no mutable state; the clients are cheap handles over a shared
/// connection pool, so `Session` is `Clone` and safe to share across tasks.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) sagemaker: aws_sdk_sagemaker::Client,
    pub(crate) iam: aws_sdk_iam::Client,
    pub(crate) sts: aws_sdk_sts::Client,
}

impl Session {
    /// Builds all service clients from one loaded SDK config.
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            sagemaker: aws_sdk_sagemaker::Client::new(config),
            iam: aws_sdk_iam::Client::new(config),
            sts: aws_sdk_sts::Client::new(config),
        }
    }

    /// Builds a session from the standard AWS config chain.
    ///
    /// Loads credentials and region from environment variables, AWS
    /// profiles, or IMDS (for EC2/notebook instances).
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        Self::new(&config)
    }

    /// Builds a session from the config chain with overrides applied.
    pub async fn from_settings(settings: &AwsSettings) -> Self {
        Self::new(&settings.load().await)
    }

    /// Builds a session from pre-built clients.
    pub fn from_clients(
        sagemaker: aws_sdk_sagemaker::Client,
        iam: aws_sdk_iam::Client,
        sts: aws_sdk_sts::Client,
    ) -> Self {
        Self {
            sagemaker,
            iam,
            sts,
        }
    }
}
