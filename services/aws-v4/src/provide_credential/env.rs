use crate::{constants::*, Credential};
use async_trait::async_trait;
use awswire_core::{Context, ProvideCredential, Result};
use log::debug;

/// EnvCredentialProvider loads AWS credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `AWS_ACCESS_KEY_ID` (or the legacy `AWS_ACCESS_KEY`)
/// - `AWS_SECRET_ACCESS_KEY` (or the legacy `AWS_SECRET_KEY`)
/// - `AWS_SESSION_TOKEN` (optional)
#[derive(Debug, Default, Clone)]
pub struct EnvCredentialProvider;

impl EnvCredentialProvider {
    /// Create a new EnvCredentialProvider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProvideCredential for EnvCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let access_key_id = ctx
            .env_var(AWS_ACCESS_KEY_ID)
            .or_else(|| ctx.env_var(AWS_ACCESS_KEY));
        let secret_access_key = ctx
            .env_var(AWS_SECRET_ACCESS_KEY)
            .or_else(|| ctx.env_var(AWS_SECRET_KEY));

        match (access_key_id, secret_access_key) {
            (Some(ak), Some(sk)) if !ak.is_empty() && !sk.is_empty() => {
                let mut cred = Credential::new(ak, sk);
                cred.session_token = ctx.env_var(AWS_SESSION_TOKEN).filter(|v| !v.is_empty());
                Ok(Some(cred))
            }
            _ => {
                debug!("access key pair not found in env");
                Ok(None)
            }
        }
    }
}
