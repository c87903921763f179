use crate::Config;
use awswire_aws_v4::{
    Credential, DefaultCredentialProvider, RequestSigner, StaticCredentialProvider,
};
use awswire_core::{Context, Error, Request, Result, Signer};
use awswire_protocol::{DeserializeShape, Operation, SerializeShape, ServiceMetadata};
use bytes::Bytes;
use http::Uri;
use log::debug;
use std::time::Duration;

/// Client drives operations of a single service.
///
/// Every call runs the same pipeline: build the request with the service
/// protocol, sign it with SigV4, send it through the [`Context`] and decode
/// the response.
#[derive(Clone, Debug)]
pub struct Client {
    meta: ServiceMetadata,
    endpoint: Uri,
    region: String,
    signer: Signer<Credential>,
}

impl Client {
    /// Create a client for the service described by `meta`.
    pub fn new(ctx: Context, meta: ServiceMetadata, config: &Config) -> Result<Self> {
        let region = config
            .region
            .clone()
            .ok_or_else(|| Error::config_invalid("region is required but not set"))?;

        let endpoint = match &config.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}.{}.amazonaws.com", meta.endpoint_prefix, region),
        };
        let endpoint: Uri = endpoint.parse().map_err(|e| {
            Error::config_invalid(format!("endpoint {endpoint} is invalid")).with_source(e)
        })?;
        debug!("{} client uses endpoint {endpoint}", meta.service_name);

        let builder = RequestSigner::new(&meta.signing_name, &region);
        let signer = match (&config.access_key_id, &config.secret_access_key) {
            (Some(ak), Some(sk)) => {
                let mut loader = StaticCredentialProvider::new(ak, sk);
                if let Some(token) = &config.session_token {
                    loader = loader.with_session_token(token);
                }
                Signer::new(ctx, loader, builder)
            }
            _ => {
                let loader = match &config.profile {
                    Some(profile) => DefaultCredentialProvider::with_profile(profile),
                    None => DefaultCredentialProvider::new(),
                };
                Signer::new(ctx, loader, builder)
            }
        };

        Ok(Self {
            meta,
            endpoint,
            region,
            signer,
        })
    }

    /// Metadata of the service.
    pub fn metadata(&self) -> &ServiceMetadata {
        &self.meta
    }

    /// Resolved endpoint.
    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    /// Region requests are signed for.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Run `op` with `input` and decode its output.
    ///
    /// Service errors are returned as [`awswire_core::ErrorKind::Api`].
    pub async fn invoke<I, O>(&self, op: &Operation, input: &I) -> Result<O>
    where
        I: SerializeShape,
        O: DeserializeShape,
    {
        let mut req = self.build(op, input)?;
        self.signer.sign(&mut req, None).await?;

        let resp = self.signer.context().http_send(req.into_http()?).await?;
        debug!(
            "{}.{} responded with {}",
            self.meta.service_name,
            op.name,
            resp.status()
        );
        self.meta.protocol.unmarshal(&self.meta, op, resp)
    }

    /// Build a presigned request of `op` without sending it.
    pub async fn presign<I: SerializeShape>(
        &self,
        op: &Operation,
        input: &I,
        expires_in: Duration,
    ) -> Result<http::Request<Bytes>> {
        let mut req = self.build(op, input)?;
        self.signer.sign(&mut req, Some(expires_in)).await?;
        req.into_http()
    }

    fn build<I: SerializeShape>(&self, op: &Operation, input: &I) -> Result<Request> {
        let mut req = Request::new(op.http_method.clone(), &self.endpoint)?;
        self.meta.protocol.build(&self.meta, op, input, &mut req)?;
        Ok(req)
    }
}
