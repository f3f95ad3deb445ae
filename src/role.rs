//! Execution-role resolution.
//!
//! Returns the ARN of the role whose credentials are used to call the API.
//! On a notebook instance (or any role-backed identity) this is derived
//! from the caller identity itself. Everywhere else -- a developer laptop
//! with user credentials -- the identity is not a role, and the newest
//! auto-created `AmazonSageMaker` service role is discovered instead.

use aws_sdk_iam::types::Role;

use crate::error::{api_error, Error, Result};
use crate::session::Session;

/// Path prefix IAM assigns to auto-created service roles.
const SERVICE_ROLE_PATH: &str = "/service-role/";

/// Auto-created SageMaker role names start with this prefix.
const SAGEMAKER_ROLE_PREFIX: &str = "AmazonSageMaker";

impl Session {
    /// Resolves the execution role ARN for the current credentials.
    ///
    /// Tries the caller identity first; if the identity is not a role
    /// (`Error::NotARole`), falls back to listing `/service-role/` roles
    /// and picking the newest `AmazonSageMaker` one. Any other failure
    /// propagates unmodified.
    pub async fn resolve_execution_role(&self) -> Result<String> {
        match self.role_from_caller_identity().await {
            Ok(arn) => Ok(arn),
            Err(Error::NotARole { arn }) => {
                tracing::debug!(
                    identity = %arn,
                    "caller identity is not a role, discovering service roles"
                );
                self.newest_service_role().await
            }
            Err(err) => Err(err),
        }
    }

    async fn role_from_caller_identity(&self) -> Result<String> {
        let identity = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| api_error("failed to read caller identity", e))?;
        let arn = identity.arn().unwrap_or_default().to_string();
        role_arn_from_identity(&arn).ok_or(Error::NotARole { arn })
    }

    async fn newest_service_role(&self) -> Result<String> {
        let mut candidates = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let mut request = self.iam.list_roles().path_prefix(SERVICE_ROLE_PATH);
            if let Some(m) = marker.take() {
                request = request.marker(m);
            }
            let page = request
                .send()
                .await
                .map_err(|e| api_error("failed to list service roles", e))?;
            candidates.extend(page.roles().iter().cloned());
            match page.marker() {
                Some(next) if page.is_truncated().unwrap_or(false) => {
                    marker = Some(next.to_string());
                }
                _ => break,
            }
        }

        let role = newest_sagemaker_role(candidates).ok_or(Error::NoExecutionRole)?;
        tracing::debug!(role = %role.role_name(), "selected newest auto-created execution role");
        Ok(role.arn().to_string())
    }
}

/// Rewrites a caller-identity ARN into an IAM role ARN, when possible.
///
/// An assumed-role ARN (`arn:aws:sts::<acct>:assumed-role/<name>/<session>`)
/// maps onto `arn:aws:iam::<acct>:role/<name>`; a plain role ARN passes
/// through. Anything else (users, federated identities) yields `None`.
fn role_arn_from_identity(arn: &str) -> Option<String> {
    let mut parts = arn.splitn(6, ':');
    let (Some("arn"), Some(partition), Some(service), Some(_region), Some(account), Some(resource)) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return None;
    };

    match service {
        "sts" => {
            let role_name = resource.strip_prefix("assumed-role/")?.split('/').next()?;
            Some(format!("arn:{partition}:iam::{account}:role/{role_name}"))
        }
        "iam" if resource.starts_with("role/") => Some(arn.to_string()),
        _ => None,
    }
}

/// Picks the newest auto-created SageMaker role from a candidate list.
///
/// Generated role names carry a datetime stamp suffix, so sorting the
/// names in reverse order puts the newest role first.
fn newest_sagemaker_role(mut roles: Vec<Role>) -> Option<Role> {
    roles.retain(|r| r.role_name().starts_with(SAGEMAKER_ROLE_PREFIX));
    roles.sort_by(|a, b| b.role_name().cmp(a.role_name()));
    roles.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_iam::primitives::DateTime;

    fn service_role(name: &str) -> Role {
        Role::builder()
            .path(SERVICE_ROLE_PATH)
            .role_name(name)
            .role_id(format!("AROAEXAMPLE{}", name.len()))
            .arn(format!(
                "arn:aws:iam::123456789012:role/service-role/{name}"
            ))
            .create_date(DateTime::from_secs(0))
            .build()
            .expect("test role")
    }

    #[test]
    fn newest_role_wins_by_descending_name() {
        let roles = vec![
            service_role("AmazonSageMaker-A-20200101"),
            service_role("AmazonSageMaker-B-20210101"),
        ];
        let picked = newest_sagemaker_role(roles).expect("a candidate");
        assert_eq!(picked.role_name(), "AmazonSageMaker-B-20210101");
    }

    #[test]
    fn non_sagemaker_roles_are_filtered_out() {
        let roles = vec![
            service_role("AWSGlueServiceRole-etl"),
            service_role("AmazonSageMaker-ExecutionRole-20190101T010101"),
        ];
        let picked = newest_sagemaker_role(roles).expect("a candidate");
        assert_eq!(
            picked.role_name(),
            "AmazonSageMaker-ExecutionRole-20190101T010101"
        );
    }

    #[test]
    fn no_candidates_yields_none() {
        assert!(newest_sagemaker_role(Vec::new()).is_none());
        let only_foreign = vec![service_role("AWSGlueServiceRole-etl")];
        assert!(newest_sagemaker_role(only_foreign).is_none());
    }

    #[test]
    fn assumed_role_arn_is_rewritten() {
        let arn = "arn:aws:sts::123456789012:assumed-role/AmazonSageMaker-ExecutionRole-20210101T000001/SageMaker";
        assert_eq!(
            role_arn_from_identity(arn).as_deref(),
            Some("arn:aws:iam::123456789012:role/AmazonSageMaker-ExecutionRole-20210101T000001")
        );
    }

    #[test]
    fn role_arn_passes_through() {
        let arn = "arn:aws:iam::123456789012:role/service-role/AmazonSageMaker-A";
        assert_eq!(role_arn_from_identity(arn).as_deref(), Some(arn));
    }

    #[test]
    fn partition_is_preserved() {
        let arn = "arn:aws-cn:sts::123456789012:assumed-role/ops/session";
        assert_eq!(
            role_arn_from_identity(arn).as_deref(),
            Some("arn:aws-cn:iam::123456789012:role/ops")
        );
    }

    #[test]
    fn user_identities_are_rejected() {
        assert!(role_arn_from_identity("arn:aws:iam::123456789012:user/alice").is_none());
        assert!(role_arn_from_identity("").is_none());
        assert!(role_arn_from_identity("not-an-arn").is_none());
    }
}
