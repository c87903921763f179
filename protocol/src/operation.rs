use awswire_core::utils::escape_path;
use awswire_core::{Error, Result};
use http::Method;

/// Immutable descriptor of an API operation.
///
/// Built once and kept by the service client.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Operation name, like `ListTables`.
    pub name: &'static str,
    /// Http method.
    pub http_method: Method,
    /// Request uri template.
    pub http_path: PathTemplate,
}

impl Operation {
    /// Create a new operation, parsing the path template.
    pub fn new(name: &'static str, http_method: Method, http_path: &str) -> Result<Self> {
        Ok(Self {
            name,
            http_method,
            http_path: PathTemplate::parse(http_path)?,
        })
    }
}

/// A segment of a uri path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied as is.
    Literal(String),
    /// `{name}` or the greedy `{name+}`.
    Label {
        /// Label name.
        name: String,
        /// Greedy labels keep `/` in their values.
        greedy: bool,
    },
}

/// Parsed uri template like `/{Bucket}/{Key+}?acl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    segments: Vec<Segment>,
    query: Vec<(String, String)>,
}

impl PathTemplate {
    /// Parse a template.
    ///
    /// An empty template stands for `/`.
    pub fn parse(template: &str) -> Result<Self> {
        let (path, query) = match template.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (template, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        let mut segments = Vec::new();
        let mut rest = path;
        while let Some(start) = rest.find('{') {
            if start > 0 {
                segments.push(Segment::Literal(rest[..start].to_string()));
            }
            let end = rest[start..].find('}').map(|v| v + start).ok_or_else(|| {
                Error::config_invalid(format!("unterminated label in uri template {template}"))
            })?;

            let label = &rest[start + 1..end];
            let (name, greedy) = match label.strip_suffix('+') {
                Some(name) => (name, true),
                None => (label, false),
            };
            if name.is_empty() {
                return Err(Error::config_invalid(format!(
                    "empty label in uri template {template}"
                )));
            }
            segments.push(Segment::Label {
                name: name.to_string(),
                greedy,
            });
            rest = &rest[end + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        let query = query
            .map(|q| {
                q.split('&')
                    .filter(|kv| !kv.is_empty())
                    .map(|kv| match kv.split_once('=') {
                        Some((k, v)) => (k.to_string(), v.to_string()),
                        None => (kv.to_string(), String::new()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { segments, query })
    }

    /// Path segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Query literals of the template.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Expand the path, resolving every label through `resolve`.
    pub fn expand(&self, mut resolve: impl FnMut(&str) -> Option<String>) -> Result<String> {
        let mut path = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(v) => path.push_str(v),
                Segment::Label { name, greedy } => {
                    let value = resolve(name.as_str()).ok_or_else(|| {
                        Error::request_invalid(format!("missing value for uri label {name}"))
                    })?;
                    path.push_str(&escape_path(&value, !greedy));
                }
            }
        }
        Ok(path)
    }
}
