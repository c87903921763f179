mod env;
mod profile;

use awswire_core::{Context, StaticEnv};
use awswire_file_read_tokio::TokioFileRead;
use std::collections::HashMap;
use std::path::PathBuf;

pub fn create_test_context(home_dir: Option<PathBuf>, envs: &[(&str, &str)]) -> Context {
    let _ = env_logger::builder().is_test(true).try_init();

    Context::new()
        .with_file_read(TokioFileRead)
        .with_env(StaticEnv {
            home_dir,
            envs: envs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        })
}
