use crate::Protocol;
use http::StatusCode;

/// Static facts about a service, shared by all its operations.
#[derive(Debug, Clone)]
pub struct ServiceMetadata {
    /// Service name, like `dynamodb`.
    pub service_name: String,
    /// Name used in the SigV4 credential scope.
    pub signing_name: String,
    /// Host prefix of the default endpoint.
    pub endpoint_prefix: String,
    /// Api version, sent as `Version` by query protocols.
    pub api_version: String,
    /// Prefix of `X-Amz-Target` for json-rpc.
    pub target_prefix: Option<String>,
    /// Json version of the json-rpc content type, `1.1` by default.
    pub json_version: Option<String>,
    /// Wire protocol.
    pub protocol: Protocol,
}

impl ServiceMetadata {
    /// Create metadata where signing name and endpoint prefix equal the service name.
    pub fn new(service_name: &str, api_version: &str, protocol: Protocol) -> Self {
        Self {
            service_name: service_name.to_string(),
            signing_name: service_name.to_string(),
            endpoint_prefix: service_name.to_string(),
            api_version: api_version.to_string(),
            target_prefix: None,
            json_version: None,
            protocol,
        }
    }

    /// Set the signing name.
    pub fn with_signing_name(mut self, name: &str) -> Self {
        self.signing_name = name.to_string();
        self
    }

    /// Set the endpoint prefix.
    pub fn with_endpoint_prefix(mut self, prefix: &str) -> Self {
        self.endpoint_prefix = prefix.to_string();
        self
    }

    /// Set the json-rpc target prefix.
    pub fn with_target_prefix(mut self, prefix: &str) -> Self {
        self.target_prefix = Some(prefix.to_string());
        self
    }

    /// Set the json-rpc version.
    pub fn with_json_version(mut self, version: &str) -> Self {
        self.json_version = Some(version.to_string());
        self
    }
}

/// Metadata of a service response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// Request id assigned by the service.
    pub request_id: Option<String>,
    /// Http status code.
    pub status_code: StatusCode,
}

/// Request id carried by the response headers.
pub(crate) fn header_request_id<B>(resp: &http::Response<B>) -> Option<String> {
    ["x-amzn-requestid", "x-amz-request-id"]
        .iter()
        .find_map(|name| resp.headers().get(*name))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}
