use awswire_core::Request;
use bytes::Bytes;
use http::{Method, Uri};

mod ec2query;
mod jsonrpc;
mod query;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn new_request(endpoint: &'static str) -> anyhow::Result<Request> {
    Ok(Request::new(Method::GET, &Uri::from_static(endpoint))?)
}

fn body_string(req: &mut Request) -> anyhow::Result<String> {
    Ok(String::from_utf8(req.body.read_to_bytes()?.to_vec())?)
}

fn response(status: u16, headers: &[(&str, &str)], body: &'static str) -> http::Response<Bytes> {
    let mut builder = http::Response::builder().status(status);
    for (k, v) in headers {
        builder = builder.header(*k, *v);
    }
    builder
        .body(Bytes::from_static(body.as_bytes()))
        .expect("response must be valid")
}
