use crate::provide_credential::{
    EnvCredentialProvider, ProfileCredentialProvider, ProvideCredentialChain,
};
use crate::Credential;
use async_trait::async_trait;
use awswire_core::{Context, ProvideCredential, Result};

/// DefaultCredentialProvider loads credentials via the default chain.
///
/// Resolution order:
///
/// 1. Environment variables
/// 2. Shared credentials file (`~/.aws/credentials`)
#[derive(Debug)]
pub struct DefaultCredentialProvider {
    chain: ProvideCredentialChain,
}

impl Default for DefaultCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCredentialProvider {
    /// Create a new `DefaultCredentialProvider` instance.
    pub fn new() -> Self {
        let chain = ProvideCredentialChain::new()
            .push(EnvCredentialProvider::new())
            .push(ProfileCredentialProvider::new());

        Self { chain }
    }

    /// Create with a custom credential chain.
    pub fn with_chain(chain: ProvideCredentialChain) -> Self {
        Self { chain }
    }

    /// Use the given profile name instead of `AWS_PROFILE`.
    pub fn with_profile(profile: impl Into<String>) -> Self {
        let chain = ProvideCredentialChain::new()
            .push(EnvCredentialProvider::new())
            .push(ProfileCredentialProvider::new().with_profile(profile));

        Self { chain }
    }
}

#[async_trait]
impl ProvideCredential for DefaultCredentialProvider {
    type Credential = Credential;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        self.chain.provide_credential(ctx).await
    }
}
