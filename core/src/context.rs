use crate::{Error, Result};
use bytes::Bytes;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

/// Reads whole files, used to load shared credential files.
#[async_trait::async_trait]
pub trait FileRead: Debug + Send + Sync + 'static {
    /// Read the content of the file at `path`.
    async fn file_read(&self, path: &str) -> Result<Vec<u8>>;
}

/// Sends a fully built request and buffers the response.
///
/// Retries, timeouts and connection pooling belong to the implementation.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send `req` and return the response.
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>>;
}

/// Lookups against the process environment.
pub trait Env: Debug + Send + Sync + 'static {
    /// Value of the variable `key`, `None` if unset or not valid utf-8.
    fn var(&self, key: &str) -> Option<String>;

    /// Home directory of the current user.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Context carries the runtime a client works against.
///
/// Nothing is wired in by default: reading files or sending requests through
/// a bare `Context::new()` fails, and the environment is empty.
#[derive(Clone)]
pub struct Context {
    fs: Arc<dyn FileRead>,
    http: Arc<dyn HttpSend>,
    env: Arc<dyn Env>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("fs", &self.fs)
            .field("http", &self.http)
            .field("env", &self.env)
            .finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self {
            fs: Arc::new(NoopFileRead),
            http: Arc::new(NoopHttpSend),
            env: Arc::new(NoopEnv),
        }
    }
}

impl Context {
    /// Create an empty context.
    ///
    /// ```
    /// use awswire_core::{Context, OsEnv};
    ///
    /// let ctx = Context::new().with_env(OsEnv);
    /// assert!(ctx.env_var("AWSWIRE_SURELY_NOT_SET").is_none());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `fs` to read files.
    pub fn with_file_read(mut self, fs: impl FileRead) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    /// Use `http` to send requests.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Use `env` for variable and home dir lookups.
    pub fn with_env(mut self, env: impl Env) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Read the file at `path`.
    #[inline]
    pub async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        self.fs.file_read(path).await
    }

    /// Read the file at `path` as utf-8 text.
    pub async fn file_read_as_string(&self, path: &str) -> Result<String> {
        let content = self.file_read(path).await?;
        String::from_utf8(content).map_err(|e| {
            Error::config_invalid(format!("file {path} is not valid utf-8")).with_source(e)
        })
    }

    /// Send `req` through the configured transport.
    #[inline]
    pub async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        self.http.http_send(req).await
    }

    /// Home directory of the current user.
    #[inline]
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.env.home_dir()
    }

    /// Replace a leading `~` with the home dir.
    ///
    /// Paths without a leading `~/` (or `~\`) come back unchanged. `None`
    /// means the path needs a home dir and there is none.
    pub fn expand_home_dir(&self, path: &str) -> Option<String> {
        let Some(rest) = path.strip_prefix('~').filter(|r| r.starts_with(['/', '\\'])) else {
            return Some(path.to_string());
        };
        let home = self.home_dir()?;
        Some(format!("{}{rest}", home.to_string_lossy()))
    }

    /// Value of the environment variable `key`.
    #[inline]
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }
}

/// The environment of the running process.
#[derive(Debug, Copy, Clone)]
pub struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        // `USERPROFILE` covers windows.
        ["HOME", "USERPROFILE"]
            .iter()
            .filter_map(|k| std::env::var_os(k))
            .find(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

/// A fixed environment, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticEnv {
    /// Home directory, `None` for a user without one.
    pub home_dir: Option<PathBuf>,
    /// Variables visible through [`Context::env_var`].
    pub envs: HashMap<String, String>,
}

impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir.clone()
    }
}

/// FileRead that fails every read.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFileRead;

#[async_trait::async_trait]
impl FileRead for NoopFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        Err(Error::unexpected(format!(
            "can't read {path}: context has no FileRead"
        )))
    }
}

/// HttpSend that fails every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        Err(Error::unexpected(format!(
            "can't send {} {}: context has no HttpSend",
            req.method(),
            req.uri()
        )))
    }
}

/// Env without variables or home dir.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEnv;

impl Env for NoopEnv {
    fn var(&self, _: &str) -> Option<String> {
        None
    }

    fn home_dir(&self) -> Option<PathBuf> {
        None
    }
}
