//! AWS SigV4 signer
//!
//! ## Example
//!
//! ```no_run
//! use awswire_aws_v4::{DefaultCredentialProvider, RequestSigner};
//! use awswire_core::{Context, OsEnv, Request, Result, Signer};
//! use http::{Method, Uri};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new().with_env(OsEnv);
//!     let signer = Signer::new(
//!         ctx,
//!         DefaultCredentialProvider::new(),
//!         RequestSigner::new("s3", "us-east-1"),
//!     );
//!
//!     let uri = Uri::from_static("https://s3.amazonaws.com/examplebucket/test.txt");
//!     let mut req = Request::new(Method::GET, &uri)?;
//!     signer.sign(&mut req, None).await?;
//!     Ok(())
//! }
//! ```

mod constants;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::RequestSigner;

mod provide_credential;
pub use provide_credential::{
    DefaultCredentialProvider, EnvCredentialProvider, ProfileCredentialProvider,
    ProvideCredentialChain, StaticCredentialProvider,
};
