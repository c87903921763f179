use async_trait::async_trait;
use awswire_core::{
    Context, Error, OsEnv, ProvideCredential, Request, Result, SignRequest, Signer,
    SigningCredential,
};
use http::{Method, Uri};
use std::time::Duration;

// A credential made of a single api token.
#[derive(Clone, Debug)]
struct ApiToken(String);

impl SigningCredential for ApiToken {
    fn is_valid(&self) -> bool {
        !self.0.is_empty()
    }
}

// Loads the token from `MY_API_TOKEN`.
#[derive(Debug)]
struct EnvTokenProvider;

#[async_trait]
impl ProvideCredential for EnvTokenProvider {
    type Credential = ApiToken;

    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>> {
        Ok(ctx.env_var("MY_API_TOKEN").map(ApiToken))
    }
}

// Signs requests with a bearer header, or a `token` query for presigning.
#[derive(Debug)]
struct BearerSigner;

impl SignRequest for BearerSigner {
    type Credential = ApiToken;

    fn sign_request(
        &self,
        req: &mut Request,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let token = credential.ok_or_else(|| Error::credential_invalid("no api token found"))?;

        match expires_in {
            Some(expires) => {
                req.query_set("token", token.0.clone());
                req.query_set("expires", expires.as_secs().to_string());
            }
            None => {
                let mut value: http::HeaderValue = format!("Bearer {}", token.0).parse()?;
                value.set_sensitive(true);
                req.headers.insert(http::header::AUTHORIZATION, value);
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_env(OsEnv);
    let signer = Signer::new(ctx, EnvTokenProvider, BearerSigner);

    let mut req = Request::new(Method::GET, &Uri::from_static("https://api.example.com/items"))?;
    match signer.sign(&mut req, Some(Duration::from_secs(600))).await {
        Ok(()) => println!("presigned: {}", req.uri()?),
        Err(err) => println!("signing failed: {err}"),
    }
    Ok(())
}
