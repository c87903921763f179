//! Wire protocols of AWS APIs.
//!
//! Inputs and outputs are described by static [`StructureShape`]s and travel
//! through the codecs as a [`Structure`] value tree. A [`Protocol`] turns an
//! input into a [`Request`] and a response back into an output:
//!
//! ```
//! use awswire_core::Request;
//! use awswire_protocol::{
//!     Member, Operation, Protocol, SerializeShape, ServiceMetadata, Shape, Structure,
//!     StructureShape,
//! };
//! use http::{Method, Uri};
//!
//! static MEMBERS: [Member; 1] = [Member::new("Name", Shape::String)];
//! static INPUT: StructureShape = StructureShape::new("Input", &MEMBERS);
//!
//! struct Input {
//!     name: String,
//! }
//!
//! impl SerializeShape for Input {
//!     fn shape() -> &'static StructureShape {
//!         &INPUT
//!     }
//!
//!     fn to_structure(&self) -> Structure {
//!         Structure::new().with("Name", &self.name)
//!     }
//! }
//!
//! # fn main() -> awswire_core::Result<()> {
//! let meta = ServiceMetadata::new("foo", "2014-01-01", Protocol::JsonRpc)
//!     .with_target_prefix("com.amazonaws.foo");
//! let op = Operation::new("OperationName", Method::POST, "/")?;
//!
//! let mut req = Request::new(Method::GET, &Uri::from_static("https://foo.us-east-1.amazonaws.com"))?;
//! meta.protocol.build(&meta, &op, &Input { name: "myname".to_string() }, &mut req)?;
//! assert_eq!(req.headers["x-amz-target"], "com.amazonaws.foo.OperationName");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
pub use error::ApiError;

mod metadata;
pub use metadata::{ResponseMetadata, ServiceMetadata};

mod operation;
pub use operation::{Operation, PathTemplate, Segment};

mod shape;
pub use shape::{ListShape, Location, MapShape, Member, Shape, StructureShape, XmlNamespace};

mod value;
pub use value::{DeserializeShape, FromValue, SerializeShape, Structure, ToValue, Value};

mod json;
mod jsonrpc;
mod query;
mod rest;
mod restjson;
mod restxml;
mod scalar;
mod xml;

use awswire_core::{Error, Request, Result};
use bytes::Bytes;
use log::debug;
use query::Flavor;

/// Wire protocol of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Form encoded requests with xml responses.
    Query,
    /// The ec2 dialect of [`Protocol::Query`].
    Ec2Query,
    /// Json bodies routed by `X-Amz-Target`.
    JsonRpc,
    /// Http bindings with json bodies.
    RestJson,
    /// Http bindings with xml bodies.
    RestXml,
}

impl Protocol {
    /// Serialize `input` into `req`.
    ///
    /// The request method always comes from the operation, the operation path
    /// is appended to the endpoint path already carried by `req`.
    pub fn build<I: SerializeShape>(
        &self,
        meta: &ServiceMetadata,
        op: &Operation,
        input: &I,
        req: &mut Request,
    ) -> Result<()> {
        req.method = op.http_method.clone();

        let shape = I::shape();
        let input = input.to_structure();
        match self {
            Protocol::Query => query::build(Flavor::Query, meta, op, shape, &input, req),
            Protocol::Ec2Query => query::build(Flavor::Ec2, meta, op, shape, &input, req),
            Protocol::JsonRpc => jsonrpc::build(meta, op, shape, &input, req),
            Protocol::RestJson => restjson::build(op, shape, &input, req),
            Protocol::RestXml => restxml::build(op, shape, &input, req),
        }
    }

    /// Decode a response into the output of the operation.
    ///
    /// Responses with a non-success status are decoded by
    /// [`Protocol::unmarshal_error`] instead.
    pub fn unmarshal<O: DeserializeShape>(
        &self,
        meta: &ServiceMetadata,
        op: &Operation,
        resp: http::Response<Bytes>,
    ) -> Result<O> {
        if !resp.status().is_success() {
            return Err(self.unmarshal_error(&resp));
        }

        let shape = O::shape();
        let out = match self {
            Protocol::Query => query::unmarshal(Flavor::Query, op, shape, resp.body())?,
            Protocol::Ec2Query => query::unmarshal(Flavor::Ec2, op, shape, resp.body())?,
            Protocol::JsonRpc => jsonrpc::unmarshal(shape, resp.body())?,
            Protocol::RestJson => restjson::unmarshal(shape, &resp)?,
            Protocol::RestXml => restxml::unmarshal(shape, &resp)?,
        };
        debug!(
            "decoded {} response of {}.{}",
            resp.status(),
            meta.service_name,
            op.name
        );
        O::from_structure(out)
    }

    /// Decode the error carried by a failed response.
    ///
    /// The returned error has kind [`awswire_core::ErrorKind::Api`], use
    /// [`ApiError::from_error`] to inspect it.
    pub fn unmarshal_error(&self, resp: &http::Response<Bytes>) -> Error {
        let err = match self {
            Protocol::Query | Protocol::Ec2Query | Protocol::RestXml => xml::decode_error(resp),
            Protocol::JsonRpc => jsonrpc::decode_error(resp, None),
            Protocol::RestJson => restjson::decode_error(resp),
        };
        debug!(
            "service returned error {err}, request id: {:?}",
            err.request_id
        );
        Error::api(err)
    }

    /// Extract the metadata of a response.
    pub fn response_metadata(&self, resp: &http::Response<Bytes>) -> ResponseMetadata {
        let mut request_id = metadata::header_request_id(resp);
        if request_id.is_none() && self.is_xml() {
            request_id = xml::XmlNode::parse(resp.body())
                .ok()
                .flatten()
                .and_then(|root| xml::body_request_id(&root));
        }

        ResponseMetadata {
            request_id,
            status_code: resp.status(),
        }
    }

    fn is_xml(&self) -> bool {
        matches!(
            self,
            Protocol::Query | Protocol::Ec2Query | Protocol::RestXml
        )
    }
}
