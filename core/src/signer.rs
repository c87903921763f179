use crate::{Context, ProvideCredential, Request, Result, SignRequest, SigningCredential};
use log::debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Signer is the main struct used to sign the request.
///
/// It pairs a credential provider with a request signer and caches the
/// last valid credential between calls.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    loader: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    pub fn new(
        ctx: Context,
        loader: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            loader: Arc::new(loader),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the context used by this signer.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Signing request.
    pub async fn sign(&self, req: &mut Request, expires_in: Option<Duration>) -> Result<()> {
        let credential = self.cached();
        let credential = if credential.is_valid() {
            credential
        } else {
            debug!("no valid cached credential, loading from provider");
            let loaded = self.loader.provide_credential(&self.ctx).await?;
            if let Ok(mut guard) = self.credential.lock() {
                *guard = loaded.clone();
            }
            loaded
        };

        self.builder
            .sign_request(req, credential.as_ref(), expires_in)
    }

    fn cached(&self) -> Option<K> {
        // A poisoned lock only means another signing call panicked; the
        // credential is reloaded in that case.
        self.credential.lock().ok().and_then(|v| v.clone())
    }
}
