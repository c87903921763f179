use crate::constants::*;
use crate::Credential;
use async_trait::async_trait;
use awswire_core::{Context, Error, ProvideCredential, Result};
use ini::Ini;
use log::debug;

/// ProfileCredentialProvider loads AWS credentials from the shared credentials file.
///
/// The profile is picked in the following order:
/// 1. The profile set via [`ProfileCredentialProvider::with_profile`]
/// 2. `AWS_PROFILE`
/// 3. `default`
///
/// The file is picked from [`ProfileCredentialProvider::with_credentials_file`],
/// then `AWS_SHARED_CREDENTIALS_FILE`, then `~/.aws/credentials`.
#[derive(Debug, Default)]
pub struct ProfileCredentialProvider {
    profile: Option<String>,
    credentials_file: Option<String>,
}

impl ProfileCredentialProvider {
    /// Create a new ProfileCredentialProvider with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the profile name to use.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Set the path to the credentials file.
    pub fn with_credentials_file(mut self, path: impl Into<String>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    fn profile(&self, ctx: &Context) -> String {
        self.profile
            .clone()
            .or_else(|| ctx.env_var(AWS_PROFILE))
            .unwrap_or_else(|| "default".to_string())
    }

    fn credentials_file(&self, ctx: &Context) -> String {
        self.credentials_file
            .clone()
            .or_else(|| ctx.env_var(AWS_SHARED_CREDENTIALS_FILE))
            .unwrap_or_else(|| "~/.aws/credentials".to_string())
    }
}

#[async_trait]
impl ProvideCredential for ProfileCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        let profile = self.profile(ctx);
        let path = self.credentials_file(ctx);

        let Some(expanded_path) = ctx.expand_home_dir(&path) else {
            debug!("failed to expand homedir for path: {path}");
            return Ok(None);
        };

        let content = match ctx.file_read_as_string(&expanded_path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("failed to read credentials file {expanded_path}: {err:?}");
                return Ok(None);
            }
        };

        let conf = Ini::load_from_str(&content).map_err(|e| {
            Error::config_invalid(format!("failed to parse credentials file {expanded_path}"))
                .with_source(e)
        })?;

        let Some(props) = conf.section(Some(profile.as_str())) else {
            debug!("profile {profile} not found in credentials file");
            return Ok(None);
        };

        match (
            props.get("aws_access_key_id"),
            props.get("aws_secret_access_key"),
        ) {
            (Some(ak), Some(sk)) => {
                let mut cred = Credential::new(ak, sk);
                cred.session_token = props.get("aws_session_token").map(|s| s.to_string());
                Ok(Some(cred))
            }
            _ => {
                debug!("profile {profile} has no access key pair");
                Ok(None)
            }
        }
    }
}
