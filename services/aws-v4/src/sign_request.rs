use crate::constants::*;
use crate::Credential;
use awswire_core::hash::{hex_hmac_sha256, hex_sha256, hex_sha256_reader, hmac_sha256};
use awswire_core::time::{format_date, format_iso8601, now, DateTime};
use awswire_core::{Body, Error, Request, Result, SignRequest};
use http::header::{self, HeaderName};
use http::HeaderValue;
use log::debug;
use std::time::Duration;

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,

    time: Option<DateTime>,
    path_escaper: Option<fn(&str) -> String>,
}

impl RequestSigner {
    /// Create a new signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            time: None,
            path_escaper: None,
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing or replaying fixed vectors.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Override how the canonical uri is escaped.
    ///
    /// By default the request path is signed as is, since builders store it
    /// already escaped. Install an escaper like `|p| escape_path(p, false)`
    /// (see [`awswire_core::utils::escape_path`]) when signing requests whose
    /// path is not escaped yet.
    pub fn with_path_escaper(mut self, f: fn(&str) -> String) -> Self {
        self.path_escaper = Some(f);
        self
    }

    /// Sign the request at the given time and return the signature.
    ///
    /// With `expires_in` the signature goes into the query (presigning),
    /// otherwise into the `Authorization` header.
    pub fn sign(
        &self,
        req: &mut Request,
        credential: Option<&Credential>,
        time: DateTime,
        expires_in: Option<Duration>,
    ) -> Result<String> {
        let Some(credential) = credential else {
            return Err(Error::credential_invalid(
                "NilCredentials: request can't be signed without credentials",
            ));
        };
        let Some(host) = req.authority.as_ref().map(|v| v.as_str().to_string()) else {
            return Err(Error::request_invalid(
                "NilRequest: request without host can't be signed",
            ));
        };

        let mut ctx = SigningContext {
            req,
            credential,
            host,
            time,
            region: &self.region,
            service: &self.service,
            expires_in,
            path_escaper: self.path_escaper,

            formatted_time: String::new(),
            formatted_short_time: String::new(),
            credential_scope: String::new(),
            signed_headers: String::new(),
            canonical_headers: String::new(),
            body_digest: String::new(),
            canonical_string: String::new(),
            string_to_sign: String::new(),
        };
        ctx.build()
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        req: &mut Request,
        credential: Option<&Self::Credential>,
        expires_in: Option<Duration>,
    ) -> Result<()> {
        let time = self.time.unwrap_or_else(now);
        self.sign(req, credential, time, expires_in).map(|_| ())
    }
}

/// State of a single signing pass.
///
/// Created for every `sign` call and dropped right after it.
struct SigningContext<'a> {
    req: &'a mut Request,
    credential: &'a Credential,
    host: String,
    time: DateTime,
    region: &'a str,
    service: &'a str,
    expires_in: Option<Duration>,
    path_escaper: Option<fn(&str) -> String>,

    formatted_time: String,
    formatted_short_time: String,
    credential_scope: String,
    signed_headers: String,
    canonical_headers: String,
    body_digest: String,
    canonical_string: String,
    string_to_sign: String,
}

impl SigningContext<'_> {
    fn is_presign(&self) -> bool {
        self.expires_in.is_some()
    }

    fn build(&mut self) -> Result<String> {
        self.remove_previous_signature();

        self.build_time()?;
        self.build_credential_scope();
        if self.is_presign() {
            self.req.query_set(X_AMZ_ALGORITHM, AWS4_HMAC_SHA256);
        }
        self.build_security_token()?;
        if self.is_presign() {
            self.hoist_headers()?;
        }
        self.build_canonical_headers()?;
        self.build_body_digest()?;
        self.build_canonical_string();
        self.build_string_to_sign();

        let signature = self.build_signature();
        if self.is_presign() {
            self.req.query_push(X_AMZ_SIGNATURE, signature.clone());
        } else {
            let mut authorization = HeaderValue::from_str(&format!(
                "{} Credential={}/{}, SignedHeaders={}, Signature={}",
                AWS4_HMAC_SHA256,
                self.credential.access_key_id,
                self.credential_scope,
                self.signed_headers,
                signature
            ))?;
            authorization.set_sensitive(true);
            self.req
                .headers
                .insert(header::AUTHORIZATION, authorization);
        }

        Ok(signature)
    }

    /// Drop what an earlier signing pass left behind, in either auth mode.
    fn remove_previous_signature(&mut self) {
        self.req.headers.remove(header::AUTHORIZATION);
        self.req.headers.remove(HeaderName::from_static("x-amz-date"));
        self.req
            .headers
            .remove(HeaderName::from_static("x-amz-security-token"));
        for key in [
            X_AMZ_ALGORITHM,
            X_AMZ_CREDENTIAL,
            X_AMZ_DATE,
            X_AMZ_EXPIRES,
            X_AMZ_SECURITY_TOKEN,
            X_AMZ_SIGNATURE,
            X_AMZ_SIGNED_HEADERS,
        ] {
            self.req.query_remove(key);
        }
    }

    fn build_time(&mut self) -> Result<()> {
        self.formatted_time = format_iso8601(self.time);
        self.formatted_short_time = format_date(self.time);

        if let Some(expires_in) = self.expires_in {
            self.req.query_set(X_AMZ_DATE, self.formatted_time.clone());
            self.req
                .query_set(X_AMZ_EXPIRES, expires_in.as_secs().to_string());
        } else {
            self.req.headers.insert(
                HeaderName::from_static("x-amz-date"),
                HeaderValue::from_str(&self.formatted_time)?,
            );
        }
        Ok(())
    }

    fn build_credential_scope(&mut self) {
        // Scope: "20220313/<region>/<service>/aws4_request"
        self.credential_scope = format!(
            "{}/{}/{}/aws4_request",
            self.formatted_short_time, self.region, self.service
        );
        debug!("calculated scope: {}", self.credential_scope);

        if self.is_presign() {
            self.req.query_set(
                X_AMZ_CREDENTIAL,
                format!(
                    "{}/{}",
                    self.credential.access_key_id, self.credential_scope
                ),
            );
        }
    }

    fn build_security_token(&mut self) -> Result<()> {
        let token = self.credential.session_token.as_deref();
        let name = HeaderName::from_static("x-amz-security-token");

        match (self.is_presign(), token) {
            (true, Some(token)) => self.req.query_set(X_AMZ_SECURITY_TOKEN, token),
            (true, None) => self.req.query_remove(X_AMZ_SECURITY_TOKEN),
            (false, Some(token)) => {
                let mut value = HeaderValue::from_str(token)?;
                // Set token value sensitive to avoid leaking.
                value.set_sensitive(true);
                self.req.headers.insert(name, value);
            }
            (false, None) => {
                self.req.headers.remove(name);
            }
        }
        Ok(())
    }

    /// Move headers that are neither `x-amz-*` nor ignored into the query.
    fn hoist_headers(&mut self) -> Result<()> {
        let names: Vec<HeaderName> = self
            .req
            .headers
            .keys()
            .filter(|k| {
                let k = k.as_str();
                k != "host" && !k.starts_with("x-amz-") && !IGNORED_HEADERS.contains(&k)
            })
            .cloned()
            .collect();

        for name in names {
            let values = self
                .req
                .headers
                .get_all(&name)
                .iter()
                .map(|v| v.to_str().map(|v| v.to_string()))
                .collect::<std::result::Result<Vec<_>, _>>()?;

            self.req.query_remove(name.as_str());
            for value in values {
                self.req.query_push(name.as_str(), value);
            }
            self.req.headers.remove(&name);
        }
        Ok(())
    }

    fn build_canonical_headers(&mut self) -> Result<()> {
        let mut names = vec!["host"];
        names.extend(
            self.req
                .headers
                .keys()
                .map(|k| k.as_str())
                .filter(|k| *k != "host" && !IGNORED_HEADERS.contains(k)),
        );
        names.sort_unstable();

        let mut lines = Vec::with_capacity(names.len());
        for name in &names {
            if *name == "host" {
                lines.push(format!("host:{}", self.host));
                continue;
            }

            let values = self
                .req
                .headers
                .get_all(*name)
                .iter()
                .map(|v| v.to_str().map(strip_excess_spaces))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            lines.push(format!("{}:{}", name, values.join(",")));
        }

        self.canonical_headers = lines.join("\n");
        self.signed_headers = names.join(";");

        if self.is_presign() {
            let signed_headers = self.signed_headers.clone();
            self.req.query_set(X_AMZ_SIGNED_HEADERS, signed_headers);
        }
        Ok(())
    }

    fn build_body_digest(&mut self) -> Result<()> {
        let digest = if let Some(v) = self.req.headers.get(X_AMZ_CONTENT_SHA_256) {
            v.to_str()?.to_string()
        } else {
            match &mut self.req.body {
                Body::Empty if self.service == "s3" => UNSIGNED_PAYLOAD.to_string(),
                Body::Empty => EMPTY_STRING_SHA256.to_string(),
                Body::Stream(r) => hex_sha256_reader(r.as_mut())?,
            }
        };

        self.req.headers.insert(
            HeaderName::from_static(X_AMZ_CONTENT_SHA_256),
            HeaderValue::from_str(&digest)?,
        );
        self.body_digest = digest;
        Ok(())
    }

    fn build_canonical_string(&mut self) {
        // The wire query follows the canonical order, the signature is
        // appended after it.
        self.req.query_sort();

        let uri = canonical_uri(&self.req.path);
        let uri = match self.path_escaper {
            Some(escape) => escape(&uri),
            None => uri,
        };

        self.canonical_string = format!(
            "{}\n{}\n{}\n{}\n\n{}\n{}",
            self.req.method,
            uri,
            self.req.canonical_query(),
            self.canonical_headers,
            self.signed_headers,
            self.body_digest
        );
        debug!("calculated canonical request: {}", self.canonical_string);
    }

    fn build_string_to_sign(&mut self) {
        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 20220313T072004Z
        // 20220313/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        self.string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            AWS4_HMAC_SHA256,
            self.formatted_time,
            self.credential_scope,
            hex_sha256(self.canonical_string.as_bytes())
        );
        debug!("calculated string to sign: {}", self.string_to_sign);
    }

    fn build_signature(&self) -> String {
        let signing_key = generate_signing_key(
            &self.credential.secret_access_key,
            &self.formatted_short_time,
            self.region,
            self.service,
        );
        hex_hmac_sha256(&signing_key, self.string_to_sign.as_bytes())
    }
}

/// Path used in the canonical request.
///
/// Opaque paths like `//example.org/bucket/key` drop their leading host
/// part, leaving `/bucket/key`.
fn canonical_uri(path: &str) -> String {
    let uri = if path.starts_with("//") {
        format!("/{}", path.split('/').skip(3).collect::<Vec<_>>().join("/"))
    } else {
        path.to_string()
    };

    if uri.is_empty() {
        "/".to_string()
    } else {
        uri
    }
}

fn generate_signing_key(secret: &str, short_date: &str, region: &str, service: &str) -> Vec<u8> {
    // Sign secret
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), short_date.as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}

/// Trim a header value and collapse inner runs of spaces into one.
fn strip_excess_spaces(v: &str) -> String {
    v.split(' ')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
