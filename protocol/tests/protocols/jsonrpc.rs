use super::*;
use awswire_core::ErrorKind;
use awswire_protocol::{
    ApiError, DeserializeShape, ListShape, MapShape, Member, Operation, Protocol,
    SerializeShape, ServiceMetadata, Shape, Structure, StructureShape,
};
use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

fn metadata() -> ServiceMetadata {
    ServiceMetadata::new("foo", "2014-01-01", Protocol::JsonRpc)
        .with_target_prefix("com.amazonaws.foo")
        .with_json_version("1.1")
}

static NAME_MEMBERS: [Member; 1] = [Member::new("Name", Shape::String)];
static NAME_INPUT: StructureShape = StructureShape::new("InputShape", &NAME_MEMBERS);

struct NameInput {
    name: Option<String>,
}

impl SerializeShape for NameInput {
    fn shape() -> &'static StructureShape {
        &NAME_INPUT
    }

    fn to_structure(&self) -> Structure {
        Structure::new().with("Name", &self.name)
    }
}

#[test]
fn test_build() -> anyhow::Result<()> {
    init();

    let meta = metadata();
    let op = Operation::new("OperationName", Method::POST, "/")?;
    let input = NameInput {
        name: Some("myname".to_string()),
    };

    let mut req = new_request("https://test")?;
    meta.protocol.build(&meta, &op, &input, &mut req)?;

    assert_eq!(req.method, Method::POST);
    assert_eq!(req.uri()?.to_string(), "https://test/");
    assert_eq!(body_string(&mut req)?, r#"{"Name":"myname"}"#);
    assert_eq!(req.headers["x-amz-target"], "com.amazonaws.foo.OperationName");
    assert_eq!(req.headers["content-type"], "application/x-amz-json-1.1");
    Ok(())
}

#[test]
fn test_build_empty_input() -> anyhow::Result<()> {
    let meta = ServiceMetadata::new("foo", "2014-01-01", Protocol::JsonRpc);
    let op = Operation::new("OperationName", Method::POST, "/")?;

    let mut req = new_request("https://test")?;
    meta.protocol.build(&meta, &op, &NameInput { name: None }, &mut req)?;
    assert_eq!(body_string(&mut req)?, "{}");
    assert!(req.headers.get("x-amz-target").is_none());
    assert_eq!(req.headers["content-type"], "application/x-amz-json-1.1");

    let mut req = new_request("https://test")?;
    meta.protocol.build(&meta, &op, &(), &mut req)?;
    assert_eq!(body_string(&mut req)?, "{}");
    Ok(())
}

static TAGS: MapShape = MapShape::new(Shape::String);
static NUMBERS: ListShape = ListShape::new(Shape::Long);
static SUB_MEMBERS: [Member; 1] = [Member::new("Foo", Shape::String)];
static SUB: StructureShape = StructureShape::new("Sub", &SUB_MEMBERS);
static TABLE_MEMBERS: [Member; 7] = [
    Member::new("TableName", Shape::String),
    Member::new("Count", Shape::Integer),
    Member::new("Ratio", Shape::Double),
    Member::new("Data", Shape::Blob),
    Member::new("Created", Shape::Timestamp),
    Member::new("Tags", Shape::Map(&TAGS)),
    Member::new("Numbers", Shape::List(&NUMBERS)),
];
static TABLE: StructureShape = StructureShape::new("Table", &TABLE_MEMBERS);
static NESTED_MEMBERS: [Member; 2] = [
    Member::new("Table", Shape::Structure(&TABLE)),
    Member::new("Sub", Shape::Structure(&SUB)).location_name("sub"),
];
static NESTED: StructureShape = StructureShape::new("Nested", &NESTED_MEMBERS);

#[derive(Debug, Clone, Default, PartialEq)]
struct Table {
    table_name: Option<String>,
    count: Option<i32>,
    ratio: Option<f64>,
    data: Option<Bytes>,
    created: Option<DateTime<Utc>>,
    tags: BTreeMap<String, String>,
    numbers: Vec<i64>,
}

impl SerializeShape for Table {
    fn shape() -> &'static StructureShape {
        &TABLE
    }

    fn to_structure(&self) -> Structure {
        Structure::new()
            .with("TableName", &self.table_name)
            .with("Count", &self.count)
            .with("Ratio", &self.ratio)
            .with("Data", &self.data)
            .with("Created", &self.created)
            .with("Tags", &self.tags)
            .with("Numbers", &self.numbers)
    }
}

impl DeserializeShape for Table {
    fn shape() -> &'static StructureShape {
        &TABLE
    }

    fn from_structure(mut s: Structure) -> awswire_core::Result<Self> {
        Ok(Self {
            table_name: s.take("TableName")?,
            count: s.take("Count")?,
            ratio: s.take("Ratio")?,
            data: s.take("Data")?,
            created: s.take("Created")?,
            tags: s.take("Tags")?,
            numbers: s.take("Numbers")?,
        })
    }
}

#[test]
fn test_round_trip() -> anyhow::Result<()> {
    let meta = metadata();
    let op = Operation::new("CreateTable", Method::POST, "/")?;
    let table = Table {
        table_name: Some("music".to_string()),
        count: Some(3),
        ratio: Some(0.5),
        data: Some(Bytes::from_static(b"foo")),
        created: Some(Utc.timestamp_opt(1422172800, 0).unwrap()),
        tags: BTreeMap::from([("env".to_string(), "prod".to_string())]),
        numbers: vec![1, 2, 3],
    };

    let mut req = new_request("https://test")?;
    meta.protocol.build(&meta, &op, &table, &mut req)?;
    let body = body_string(&mut req)?;
    assert_eq!(
        body,
        r#"{"Count":3,"Created":1422172800,"Data":"Zm9v","Numbers":[1,2,3],"Ratio":0.5,"TableName":"music","Tags":{"env":"prod"}}"#
    );

    let resp = http::Response::builder()
        .status(200)
        .body(Bytes::from(body))?;
    let decoded: Table = meta.protocol.unmarshal(&meta, &op, resp)?;
    assert_eq!(decoded, table);
    Ok(())
}

struct NestedOutput(Structure);

impl DeserializeShape for NestedOutput {
    fn shape() -> &'static StructureShape {
        &NESTED
    }

    fn from_structure(s: Structure) -> awswire_core::Result<Self> {
        Ok(Self(s))
    }
}

#[test]
fn test_unmarshal_nested() -> anyhow::Result<()> {
    let meta = metadata();
    let op = Operation::new("DescribeTable", Method::POST, "/")?;
    let resp = response(
        200,
        &[("x-amzn-requestid", "req-1")],
        r#"{"Table":{"TableName":"music","Created":1422172800.5,"Unknown":true},"sub":{"Foo":"bar"},"Extra":null}"#,
    );

    assert_eq!(
        meta.protocol.response_metadata(&resp).request_id.as_deref(),
        Some("req-1")
    );
    let NestedOutput(mut out) = meta.protocol.unmarshal::<NestedOutput>(&meta, &op, resp)?;
    let table = Table::from_structure(out.take("Table")?)?;
    assert_eq!(table.table_name.as_deref(), Some("music"));
    assert_eq!(
        table.created,
        Some(Utc.timestamp_opt(1422172800, 500_000_000).unwrap())
    );
    let mut sub: Structure = out.take("Sub")?;
    assert_eq!(sub.take::<String>("Foo")?, "bar");
    Ok(())
}

#[test]
fn test_unmarshal_empty_and_malformed() -> anyhow::Result<()> {
    let meta = metadata();
    let op = Operation::new("DescribeTable", Method::POST, "/")?;

    let out: Table = meta.protocol.unmarshal(&meta, &op, response(200, &[], ""))?;
    assert_eq!(out, Table::default());

    let err = meta
        .protocol
        .unmarshal::<Table>(&meta, &op, response(200, &[], "{\"TableName\":"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert!(err.source_ref().is_some());
    Ok(())
}

#[test]
fn test_error() -> anyhow::Result<()> {
    let meta = metadata();
    let op = Operation::new("DescribeTable", Method::POST, "/")?;
    let resp = response(
        400,
        &[("x-amzn-requestid", "req-2")],
        r#"{"__type":"com.amazonaws.dynamodb.v20120810#ResourceNotFoundException","message":"Requested resource not found"}"#,
    );

    let err = meta.protocol.unmarshal::<Table>(&meta, &op, resp).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(
        ApiError::from_error(&err),
        Some(&ApiError {
            status_code: 400,
            code: "ResourceNotFoundException".to_string(),
            message: "Requested resource not found".to_string(),
            request_id: Some("req-2".to_string()),
        })
    );

    let err = meta
        .protocol
        .unmarshal::<Table>(&meta, &op, response(500, &[], ""))
        .unwrap_err();
    let api = ApiError::from_error(&err).expect("must carry api error");
    assert_eq!(api.message, "500 Internal Server Error");
    Ok(())
}
