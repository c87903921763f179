use super::create_test_context;
use anyhow::Result;
use awswire_aws_v4::{DefaultCredentialProvider, EnvCredentialProvider};
use awswire_core::ProvideCredential;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_env_provider() -> Result<()> {
    let ctx = create_test_context(
        None,
        &[
            ("AWS_ACCESS_KEY_ID", "env_access_key"),
            ("AWS_SECRET_ACCESS_KEY", "env_secret_key"),
            ("AWS_SESSION_TOKEN", "env_session_token"),
        ],
    );

    let cred = EnvCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("credential must be loaded from env");
    assert_eq!(cred.access_key_id, "env_access_key");
    assert_eq!(cred.secret_access_key, "env_secret_key");
    assert_eq!(cred.session_token.as_deref(), Some("env_session_token"));

    let cred = DefaultCredentialProvider::new()
        .provide_credential(&ctx)
        .await?
        .expect("default chain must pick up env");
    assert_eq!(cred.access_key_id, "env_access_key");
    Ok(())
}

#[tokio::test]
async fn test_env_provider_empty_values() -> Result<()> {
    let ctx = create_test_context(
        None,
        &[("AWS_ACCESS_KEY_ID", ""), ("AWS_SECRET_ACCESS_KEY", "")],
    );

    let cred = EnvCredentialProvider::new().provide_credential(&ctx).await?;
    assert!(cred.is_none());
    Ok(())
}
