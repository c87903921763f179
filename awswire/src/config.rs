use awswire_core::utils::Redact;
use awswire_core::Context;
use std::fmt::{Debug, Formatter};

const AWS_REGION: &str = "AWS_REGION";
const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
const AWS_ENDPOINT_URL: &str = "AWS_ENDPOINT_URL";
const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
const AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";
const AWS_PROFILE: &str = "AWS_PROFILE";

/// Config for a service client.
///
/// Fields set explicitly always win over values loaded from the environment.
#[derive(Clone, Default)]
pub struct Config {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_REGION`
    /// - env value: `AWS_DEFAULT_REGION`
    pub region: Option<String>,
    /// `endpoint` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_ENDPOINT_URL`
    /// - default to `https://{endpoint_prefix}.{region}.amazonaws.com`
    pub endpoint: Option<String>,
    /// `access_key_id` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_ACCESS_KEY_ID`
    pub access_key_id: Option<String>,
    /// `secret_access_key` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SECRET_ACCESS_KEY`
    pub secret_access_key: Option<String>,
    /// `session_token` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_SESSION_TOKEN`
    pub session_token: Option<String>,
    /// `profile` of the shared credentials file, will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: `AWS_PROFILE`
    pub profile: Option<String>,
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("session_token", &Redact::from(&self.session_token))
            .field("profile", &self.profile)
            .finish()
    }
}

impl Config {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from the environment of `ctx`.
    pub fn from_env(ctx: &Context) -> Self {
        Self::default().load_env(ctx)
    }

    /// Fill the fields that are still unset from the environment of `ctx`.
    pub fn load_env(mut self, ctx: &Context) -> Self {
        fill(&mut self.region, ctx, &[AWS_REGION, AWS_DEFAULT_REGION]);
        fill(&mut self.endpoint, ctx, &[AWS_ENDPOINT_URL]);
        fill(&mut self.access_key_id, ctx, &[AWS_ACCESS_KEY_ID]);
        fill(&mut self.secret_access_key, ctx, &[AWS_SECRET_ACCESS_KEY]);
        fill(&mut self.session_token, ctx, &[AWS_SESSION_TOKEN]);
        fill(&mut self.profile, ctx, &[AWS_PROFILE]);
        self
    }

    /// Set the region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the endpoint, like `http://127.0.0.1:9000`.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a static access key pair.
    pub fn with_access_key(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Set the session token of the static access key pair.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Set the profile used to load shared credentials.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

fn fill(field: &mut Option<String>, ctx: &Context, keys: &[&str]) {
    if field.is_none() {
        *field = keys
            .iter()
            .find_map(|k| ctx.env_var(k))
            .filter(|v| !v.is_empty());
    }
}
