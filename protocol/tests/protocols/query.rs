use super::*;
use awswire_core::ErrorKind;
use awswire_protocol::{
    ApiError, DeserializeShape, ListShape, MapShape, Member, Operation, Protocol,
    SerializeShape, ServiceMetadata, Shape, Structure, StructureShape, Value,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use test_case::test_case;

static STRUCT_ARG_MEMBERS: [Member; 1] = [Member::new("ScalarArg", Shape::String)];
static STRUCT_ARG: StructureShape = StructureShape::new("StructType", &STRUCT_ARG_MEMBERS);
static STRINGS: ListShape = ListShape::new(Shape::String);
static STRING_MAP: MapShape = MapShape::new(Shape::String);
static NAMED_MAP: MapShape = MapShape::new(Shape::String)
    .key_name("TheKey")
    .value_name("TheValue");

static INPUT_MEMBERS: [Member; 7] = [
    Member::new("StructArg", Shape::Structure(&STRUCT_ARG)),
    Member::new("ListArg", Shape::List(&STRINGS)),
    Member::new("FlatList", Shape::List(&STRINGS)).flattened(),
    Member::new("MapArg", Shape::Map(&STRING_MAP)),
    Member::new("NamedMap", Shape::Map(&NAMED_MAP)).flattened(),
    Member::new("BlobArg", Shape::Blob),
    Member::new("TimeArg", Shape::Timestamp),
];
static INPUT: StructureShape = StructureShape::new("InputShape", &INPUT_MEMBERS);

struct Input(Structure);

impl SerializeShape for Input {
    fn shape() -> &'static StructureShape {
        &INPUT
    }

    fn to_structure(&self) -> Structure {
        self.0.clone()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|v| v.to_string()).collect()
}

fn string_map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test_case(
    Structure::new().with("StructArg", &Structure::new().with("ScalarArg", "foo")),
    "Action=OperationName&StructArg.ScalarArg=foo&Version=2014-01-01";
    "nested structure"
)]
#[test_case(
    Structure::new().with("ListArg", &strings(&["foo", "bar", "baz"])),
    "Action=OperationName&ListArg.member.1=foo&ListArg.member.2=bar&ListArg.member.3=baz&Version=2014-01-01";
    "list"
)]
#[test_case(
    Structure::new().with("ListArg", &Vec::<String>::new()),
    "Action=OperationName&ListArg=&Version=2014-01-01";
    "empty list"
)]
#[test_case(
    Structure::new().with("FlatList", &strings(&["a", "b"])),
    "Action=OperationName&FlatList.1=a&FlatList.2=b&Version=2014-01-01";
    "flattened list"
)]
#[test_case(
    Structure::new().with("MapArg", &string_map(&[("key2", "val2"), ("key1", "val1")])),
    "Action=OperationName&MapArg.entry.1.key=key1&MapArg.entry.1.value=val1&MapArg.entry.2.key=key2&MapArg.entry.2.value=val2&Version=2014-01-01";
    "map"
)]
#[test_case(
    Structure::new().with("NamedMap", &string_map(&[("key1", "val1")])),
    "Action=OperationName&NamedMap.1.TheKey=key1&NamedMap.1.TheValue=val1&Version=2014-01-01";
    "flattened named map"
)]
#[test_case(
    Structure::new().with("MapArg", &BTreeMap::<String, String>::new()),
    "Action=OperationName&Version=2014-01-01";
    "empty map"
)]
#[test_case(
    Structure::new().with("BlobArg", &b"foo".to_vec()),
    "Action=OperationName&BlobArg=Zm9v&Version=2014-01-01";
    "blob"
)]
#[test_case(
    Structure::new().with("TimeArg", &Utc.timestamp_opt(1422172800, 0).unwrap()),
    "Action=OperationName&TimeArg=2015-01-25T08%3A00%3A00Z&Version=2014-01-01";
    "timestamp"
)]
fn test_build(input: Structure, expected: &str) -> anyhow::Result<()> {
    init();

    let meta = ServiceMetadata::new("sqs", "2014-01-01", Protocol::Query);
    let op = Operation::new("OperationName", Method::POST, "/")?;

    let mut req = new_request("https://test")?;
    meta.protocol.build(&meta, &op, &Input(input), &mut req)?;
    assert_eq!(
        req.headers["content-type"],
        "application/x-www-form-urlencoded; charset=utf-8"
    );
    assert_eq!(body_string(&mut req)?, expected);
    Ok(())
}

static OUTPUT_MEMBERS: [Member; 5] = [
    Member::new("Str", Shape::String),
    Member::new("Num", Shape::Long),
    Member::new("Timestamp", Shape::Timestamp),
    Member::new("Blob", Shape::Blob),
    Member::new("Map", Shape::Map(&STRING_MAP)),
];
static OUTPUT: StructureShape = StructureShape::new("OutputShape", &OUTPUT_MEMBERS);

#[derive(Debug, Default, PartialEq)]
struct Output {
    str: Option<String>,
    num: Option<i64>,
    timestamp: Option<chrono::DateTime<Utc>>,
    blob: Option<Vec<u8>>,
    map: BTreeMap<String, String>,
}

impl DeserializeShape for Output {
    fn shape() -> &'static StructureShape {
        &OUTPUT
    }

    fn from_structure(mut s: Structure) -> awswire_core::Result<Self> {
        Ok(Self {
            str: s.take("Str")?,
            num: s.take("Num")?,
            timestamp: s.take("Timestamp")?,
            blob: s.take("Blob")?,
            map: s.take("Map")?,
        })
    }
}

#[test]
fn test_unmarshal() -> anyhow::Result<()> {
    let meta = ServiceMetadata::new("sqs", "2014-01-01", Protocol::Query);
    let op = Operation::new("OperationName", Method::POST, "/")?;
    let resp = response(
        200,
        &[],
        "<OperationNameResponse><OperationNameResult><Str>myname</Str><Num>123</Num><Timestamp>2015-01-25T08:00:00Z</Timestamp><Blob>dmFsdWU=</Blob><Map><entry><key>qux</key><value>bar</value></entry></Map></OperationNameResult><ResponseMetadata><RequestId>request-id</RequestId></ResponseMetadata></OperationNameResponse>",
    );

    assert_eq!(
        meta.protocol.response_metadata(&resp).request_id.as_deref(),
        Some("request-id")
    );
    let out: Output = meta.protocol.unmarshal(&meta, &op, resp)?;
    assert_eq!(
        out,
        Output {
            str: Some("myname".to_string()),
            num: Some(123),
            timestamp: Some(Utc.timestamp_opt(1422172800, 0).unwrap()),
            blob: Some(b"value".to_vec()),
            map: string_map(&[("qux", "bar")]),
        }
    );
    Ok(())
}

#[test]
fn test_unmarshal_empty_body() -> anyhow::Result<()> {
    let meta = ServiceMetadata::new("sqs", "2014-01-01", Protocol::Query);
    let op = Operation::new("OperationName", Method::POST, "/")?;

    let out: Output = meta.protocol.unmarshal(&meta, &op, response(200, &[], ""))?;
    assert_eq!(out, Output::default());
    Ok(())
}

#[test]
fn test_round_trip() -> anyhow::Result<()> {
    let meta = ServiceMetadata::new("sqs", "2014-01-01", Protocol::Query);
    let op = Operation::new("OperationName", Method::POST, "/")?;

    let s = Structure::new()
        .with("StructArg", &Structure::new().with("ScalarArg", "a & b"))
        .with("ListArg", &strings(&["x", "y"]))
        .with("MapArg", &string_map(&[("k", "v")]))
        .with("TimeArg", &Utc.timestamp_opt(1422172800, 0).unwrap());

    // Responses carry the same member layout as the request, wrapped in xml.
    let mut req = new_request("https://test")?;
    meta.protocol.build(&meta, &op, &Input(s.clone()), &mut req)?;
    let form = body_string(&mut req)?;
    assert!(form.contains("StructArg.ScalarArg=a+%26+b"));

    let xml = "<OperationNameResponse><OperationNameResult><StructArg><ScalarArg>a &amp; b</ScalarArg></StructArg><ListArg><member>x</member><member>y</member></ListArg><MapArg><entry><key>k</key><value>v</value></entry></MapArg><TimeArg>2015-01-25T08:00:00Z</TimeArg></OperationNameResult></OperationNameResponse>";
    let decoded: Decoded = meta.protocol.unmarshal(&meta, &op, response(200, &[], xml))?;
    assert_eq!(decoded.0, s);
    Ok(())
}

struct Decoded(Structure);

impl DeserializeShape for Decoded {
    fn shape() -> &'static StructureShape {
        &INPUT
    }

    fn from_structure(s: Structure) -> awswire_core::Result<Self> {
        Ok(Self(s))
    }
}

#[test]
fn test_error() -> anyhow::Result<()> {
    let meta = ServiceMetadata::new("sqs", "2014-01-01", Protocol::Query);
    let op = Operation::new("OperationName", Method::POST, "/")?;
    let resp = response(
        400,
        &[],
        "<ErrorResponse><Error><Type>Sender</Type><Code>InvalidParameterValue</Code><Message>bad value</Message></Error><RequestId>req-9</RequestId></ErrorResponse>",
    );

    let err = meta.protocol.unmarshal::<Output>(&meta, &op, resp).unwrap_err();
    let api = ApiError::from_error(&err).expect("must carry api error");
    assert_eq!(
        api,
        &ApiError {
            status_code: 400,
            code: "InvalidParameterValue".to_string(),
            message: "bad value".to_string(),
            request_id: Some("req-9".to_string()),
        }
    );
    assert_eq!(
        err.to_string(),
        "InvalidParameterValue: bad value (status code: 400)"
    );
    Ok(())
}

#[test]
fn test_error_empty_body() {
    let err = Protocol::Query.unmarshal_error(&response(503, &[], ""));
    assert_eq!(err.kind(), ErrorKind::Api);
    let api = ApiError::from_error(&err).expect("must carry api error");
    assert_eq!(api.code, "");
    assert_eq!(api.message, "503 Service Unavailable");
}

#[test]
fn test_value_mismatch() -> anyhow::Result<()> {
    let meta = ServiceMetadata::new("sqs", "2014-01-01", Protocol::Query);
    let op = Operation::new("OperationName", Method::POST, "/")?;

    let mut req = new_request("https://test")?;
    let input = Input(Structure::new().with("StructArg", &Value::Integer(1)));
    let err = meta.protocol.build(&meta, &op, &input, &mut req).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    Ok(())
}
