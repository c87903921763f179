use std::fmt::{self, Debug, Formatter};
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::mem;
use std::str::FromStr;

use bytes::Bytes;
use http::uri::{Authority, PathAndQuery, Scheme};
use http::{HeaderMap, Method, Uri};

use crate::utils::escape_query;
use crate::{Error, Result};

/// A readable and seekable body stream.
///
/// Signing reads the body once to compute its digest and rewinds it, so
/// the stream must support seeking back to the start.
pub trait ReadSeek: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> ReadSeek for T {}

/// Body of an in-flight request.
#[derive(Default)]
pub enum Body {
    /// No body at all.
    #[default]
    Empty,
    /// A seekable stream.
    Stream(Box<dyn ReadSeek>),
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Body::Empty => f.write_str("Body::Empty"),
            Body::Stream(_) => f.write_str("Body::Stream"),
        }
    }
}

impl Body {
    /// Build a body from in-memory bytes.
    pub fn from_bytes(bs: impl Into<Bytes>) -> Self {
        Body::Stream(Box::new(Cursor::new(bs.into())))
    }

    /// Build a body from a seekable stream.
    pub fn from_reader(r: impl ReadSeek + 'static) -> Self {
        Body::Stream(Box::new(r))
    }

    /// Returns true if there is no body.
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// Read the whole body into memory.
    ///
    /// The stream is read from the start and rewound afterwards.
    pub fn read_to_bytes(&mut self) -> Result<Bytes> {
        match self {
            Body::Empty => Ok(Bytes::new()),
            Body::Stream(r) => {
                r.seek(SeekFrom::Start(0))?;
                let mut buf = Vec::new();
                r.read_to_end(&mut buf)?;
                r.seek(SeekFrom::Start(0))?;
                Ok(buf.into())
            }
        }
    }
}

/// Request is the in-flight unit of work shared by protocol builders and
/// signers.
///
/// The path is kept raw (already escaped). It may also be in opaque form
/// like `//example.com/bucket/key`, which signers strip back to the path.
/// Query pairs are kept decoded and in insertion order.
#[derive(Debug)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Option<Authority>,
    /// Raw HTTP path.
    pub path: String,
    /// HTTP query parameters, decoded.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderMap,
    /// HTTP body.
    pub body: Body,
}

impl Request {
    /// Create a request against the given endpoint.
    ///
    /// The endpoint path (if any) is kept as the request path prefix.
    pub fn new(method: Method, endpoint: &Uri) -> Result<Self> {
        let authority = endpoint
            .authority()
            .cloned()
            .ok_or_else(|| Error::request_invalid("endpoint without host is invalid"))?;

        let mut req = Request {
            method,
            scheme: endpoint.scheme().cloned().unwrap_or(Scheme::HTTPS),
            authority: Some(authority),
            path: endpoint.path().trim_end_matches('/').to_string(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Body::Empty,
        };
        if let Some(q) = endpoint.query() {
            req.query = parse_query(q);
        }
        Ok(req)
    }

    /// Build a request from http::request::Parts.
    ///
    /// Headers are taken out of the parts to avoid copy.
    pub fn from_parts(parts: &mut http::request::Parts, body: Body) -> Self {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Request {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTPS),
            authority: uri.authority,
            path: paq.path().to_string(),
            query: paq.query().map(parse_query).unwrap_or_default(),
            headers: mem::take(&mut parts.headers),
            body,
        }
    }

    /// Get the first value of the given query key.
    pub fn query_get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Replace all values of the given key with a single value.
    pub fn query_set(&mut self, key: &str, value: impl Into<String>) {
        self.query_remove(key);
        self.query.push((key.to_string(), value.into()));
    }

    /// Remove all values of the given key.
    pub fn query_remove(&mut self, key: &str) {
        self.query.retain(|(k, _)| k != key);
    }

    /// Sort query pairs by key, keeping the order of repeated keys.
    pub fn query_sort(&mut self) {
        self.query.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Encode the query pairs in their current order.
    pub fn query_encoded(&self) -> String {
        encode_query(&self.query)
    }

    /// Encode the query pairs sorted by key.
    ///
    /// ```shell
    /// [(b, 2), (a, x y)] => "a=x%20y&b=2"
    /// ```
    pub fn canonical_query(&self) -> String {
        let mut query = self.query.clone();
        query.sort_by(|a, b| a.0.cmp(&b.0));
        encode_query(&query)
    }

    /// Build the full request uri.
    pub fn uri(&self) -> Result<Uri> {
        let authority = self
            .authority
            .clone()
            .ok_or_else(|| Error::request_invalid("request without host is invalid"))?;

        let mut paq = if self.path.is_empty() {
            "/".to_string()
        } else {
            self.path.clone()
        };
        if !self.query.is_empty() {
            paq.push('?');
            paq.push_str(&self.query_encoded());
        }

        let mut parts = http::uri::Parts::default();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(authority);
        parts.path_and_query = Some(PathAndQuery::from_str(&paq)?);
        Ok(Uri::from_parts(parts)?)
    }

    /// Convert into an `http::Request` with the body read into memory.
    pub fn into_http(mut self) -> Result<http::Request<Bytes>> {
        let uri = self.uri()?;
        let body = self.body.read_to_bytes()?;

        let mut req = http::Request::new(body);
        *req.method_mut() = self.method;
        *req.uri_mut() = uri;
        *req.headers_mut() = self.headers;
        Ok(req)
    }
}

fn parse_query(q: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(q.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn encode_query(query: &[(String, String)]) -> String {
    let mut s = String::with_capacity(query.iter().map(|(k, v)| k.len() + v.len() + 2).sum());
    for (i, (k, v)) in query.iter().enumerate() {
        if i > 0 {
            s.push('&');
        }
        s.push_str(&escape_query(k));
        s.push('=');
        s.push_str(&escape_query(v));
    }
    s
}
