use super::create_test_context;
use anyhow::Result;
use awswire_aws_v4::{DefaultCredentialProvider, ProfileCredentialProvider};
use awswire_core::ProvideCredential;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

const CREDENTIALS: &str = "\
[default]
aws_access_key_id = home_access_key
aws_secret_access_key = home_secret_key

[dev]
aws_access_key_id = dev_access_key
aws_secret_access_key = dev_secret_key
aws_session_token = dev_session_token
";

#[tokio::test]
async fn test_profile_from_home_dir() -> Result<()> {
    let home = tempdir()?;
    fs::create_dir_all(home.path().join(".aws"))?;
    fs::write(home.path().join(".aws/credentials"), CREDENTIALS)?;

    let ctx = create_test_context(Some(home.path().to_path_buf()), &[]);
    let cred = ProfileCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("default profile must be loaded");
    assert_eq!(cred.access_key_id, "home_access_key");

    let ctx = create_test_context(Some(home.path().to_path_buf()), &[("AWS_PROFILE", "dev")]);
    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("dev profile must be loaded");
    assert_eq!(cred.access_key_id, "dev_access_key");
    assert_eq!(cred.session_token.as_deref(), Some("dev_session_token"));

    let cred = DefaultCredentialProvider::with_profile("default")
        .provide_credential(&ctx)
        .await?
        .expect("explicit profile wins over AWS_PROFILE");
    assert_eq!(cred.access_key_id, "home_access_key");
    Ok(())
}

#[tokio::test]
async fn test_profile_not_found() -> Result<()> {
    let home = tempdir()?;
    fs::create_dir_all(home.path().join(".aws"))?;
    fs::write(home.path().join(".aws/credentials"), CREDENTIALS)?;

    let ctx = create_test_context(Some(home.path().to_path_buf()), &[]);
    let cred = ProfileCredentialProvider::new()
        .with_profile("missing")
        .provide_credential(&ctx)
        .await?;
    assert!(cred.is_none());
    Ok(())
}
