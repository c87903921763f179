use super::{example_time, ACCESS_KEY_ID, SECRET_ACCESS_KEY};
use anyhow::Result;
use awswire_aws_v4::{Credential, RequestSigner};
use awswire_core::utils::escape_path;
use awswire_core::{Request, SignRequest};
use http::{Method, Uri};
use pretty_assertions::assert_eq;

fn signature_of(req: &Request) -> Result<String> {
    let auth = req.headers["authorization"].to_str()?;
    Ok(auth
        .rsplit("Signature=")
        .next()
        .unwrap_or_default()
        .to_string())
}

#[test]
fn test_escaped_path_signs_as_is() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let cred = Credential::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY);

    // The path is stored escaped, so an escaper over the raw path must
    // produce the same signature.
    let raw = "/examplebucket/!@#$%^&*()_+-=;:'><,/?.txt";
    let escaped = escape_path(raw, false);
    assert_eq!(
        escaped,
        "/examplebucket/%21%40%23%24%25%5E%26%2A%28%29_%2B-%3D%3B%3A%27%3E%3C%2C/%3F.txt"
    );

    let uri: Uri = format!("https://s3.amazonaws.com{escaped}").parse()?;
    let mut plain = Request::new(Method::HEAD, &uri)?;
    RequestSigner::new("s3", "us-east-1")
        .with_time(example_time())
        .sign_request(&mut plain, Some(&cred), None)?;

    let mut custom = Request::new(Method::HEAD, &uri)?;
    custom.path = raw.to_string();
    RequestSigner::new("s3", "us-east-1")
        .with_time(example_time())
        .with_path_escaper(|p| escape_path(p, false))
        .sign_request(&mut custom, Some(&cred), None)?;

    assert_eq!(signature_of(&plain)?, signature_of(&custom)?);
    Ok(())
}

#[test]
fn test_query_values_are_escaped() -> Result<()> {
    let cred = Credential::new(ACCESS_KEY_ID, SECRET_ACCESS_KEY);

    let uri = Uri::from_static("https://examplebucket.s3.amazonaws.com/");
    let mut req = Request::new(Method::GET, &uri)?;
    req.query_push("prefix", "a b/c+d");
    req.query_push("delimiter", "/");
    RequestSigner::new("s3", "us-east-1")
        .with_time(example_time())
        .sign_request(&mut req, Some(&cred), None)?;

    assert_eq!(req.query_encoded(), "delimiter=%2F&prefix=a%20b%2Fc%2Bd");
    Ok(())
}
