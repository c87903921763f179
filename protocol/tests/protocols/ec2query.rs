use super::*;
use awswire_core::ErrorKind;
use awswire_protocol::{
    ApiError, DeserializeShape, ListShape, Member, Operation, Protocol, SerializeShape,
    ServiceMetadata, Shape, Structure, StructureShape,
};
use pretty_assertions::assert_eq;

fn metadata() -> ServiceMetadata {
    ServiceMetadata::new("ec2", "2014-01-01", Protocol::Ec2Query)
}

static LIST_ARG: ListShape = ListShape::new(Shape::String);
static LIST_INPUT_MEMBERS: [Member; 1] = [Member::new("ListArg", Shape::List(&LIST_ARG))];
static LIST_INPUT: StructureShape = StructureShape::new("InputShape", &LIST_INPUT_MEMBERS);

struct ListInput {
    list_arg: Vec<String>,
}

impl SerializeShape for ListInput {
    fn shape() -> &'static StructureShape {
        &LIST_INPUT
    }

    fn to_structure(&self) -> Structure {
        Structure::new().with("ListArg", &self.list_arg)
    }
}

#[test]
fn test_list_arg() -> anyhow::Result<()> {
    init();

    let meta = metadata();
    let op = Operation::new("OperationName", Method::POST, "/")?;
    let input = ListInput {
        list_arg: vec!["foo".to_string(), "bar".to_string(), "baz".to_string()],
    };

    let mut req = new_request("https://test")?;
    meta.protocol.build(&meta, &op, &input, &mut req)?;

    assert_eq!(req.method, Method::POST);
    assert_eq!(req.uri()?.to_string(), "https://test/");
    assert_eq!(
        body_string(&mut req)?,
        "Action=OperationName&ListArg.1=foo&ListArg.2=bar&ListArg.3=baz&Version=2014-01-01"
    );
    Ok(())
}

static NAMED_INPUT_MEMBERS: [Member; 3] = [
    Member::new("Foo", Shape::String).location_name("foo"),
    Member::new("Bar", Shape::String).location_name("barLocationName"),
    Member::new("Yuck", Shape::String)
        .location_name("yuckLocationName")
        .query_name("yuckQueryName"),
];
static NAMED_INPUT: StructureShape = StructureShape::new("InputShape", &NAMED_INPUT_MEMBERS);

struct NamedInput;

impl SerializeShape for NamedInput {
    fn shape() -> &'static StructureShape {
        &NAMED_INPUT
    }

    fn to_structure(&self) -> Structure {
        Structure::new()
            .with("Foo", "val1")
            .with("Bar", "val2")
            .with("Yuck", "val3")
    }
}

#[test]
fn test_query_and_location_names() -> anyhow::Result<()> {
    let meta = metadata();
    let op = Operation::new("OperationName", Method::POST, "/")?;

    let mut req = new_request("https://test")?;
    meta.protocol.build(&meta, &op, &NamedInput, &mut req)?;
    assert_eq!(
        body_string(&mut req)?,
        "Action=OperationName&BarLocationName=val2&Foo=val1&Version=2014-01-01&yuckQueryName=val3"
    );
    Ok(())
}

static ITEM_SET: ListShape = ListShape::new(Shape::String).member_name("item");
static SCALAR_OUTPUT_MEMBERS: [Member; 5] = [
    Member::new("Str", Shape::String),
    Member::new("Num", Shape::Integer).location_name("FooNum"),
    Member::new("TrueBool", Shape::Boolean),
    Member::new("Float", Shape::Float),
    Member::new("Items", Shape::List(&ITEM_SET)).location_name("itemSet"),
];
static SCALAR_OUTPUT: StructureShape = StructureShape::new("OutputShape", &SCALAR_OUTPUT_MEMBERS);

#[derive(Debug, PartialEq)]
struct ScalarOutput {
    str: Option<String>,
    num: Option<i64>,
    true_bool: Option<bool>,
    float: Option<f64>,
    items: Vec<String>,
}

impl DeserializeShape for ScalarOutput {
    fn shape() -> &'static StructureShape {
        &SCALAR_OUTPUT
    }

    fn from_structure(mut s: Structure) -> awswire_core::Result<Self> {
        Ok(Self {
            str: s.take("Str")?,
            num: s.take("Num")?,
            true_bool: s.take("TrueBool")?,
            float: s.take("Float")?,
            items: s.take("Items")?,
        })
    }
}

#[test]
fn test_unmarshal_scalars() -> anyhow::Result<()> {
    let meta = metadata();
    let op = Operation::new("OperationName", Method::POST, "/")?;
    let resp = response(
        200,
        &[],
        "<OperationNameResponse><Str>myname</Str><FooNum>123</FooNum><TrueBool>true</TrueBool><Float>1.2</Float><itemSet><item>a</item><item>b</item></itemSet><requestId>request-id</requestId></OperationNameResponse>",
    );

    let out: ScalarOutput = meta.protocol.unmarshal(&meta, &op, resp)?;
    assert_eq!(
        out,
        ScalarOutput {
            str: Some("myname".to_string()),
            num: Some(123),
            true_bool: Some(true),
            float: Some(1.2),
            items: vec!["a".to_string(), "b".to_string()],
        }
    );
    Ok(())
}

#[test]
fn test_error() -> anyhow::Result<()> {
    let meta = metadata();
    let op = Operation::new("OperationName", Method::POST, "/")?;
    let resp = response(
        400,
        &[],
        "<Response><Errors><Error><Code>InvalidInstanceID.NotFound</Code><Message>The instance ID 'i-1a2b3c4d' does not exist</Message></Error></Errors><RequestID>ea966190-f9aa-478e-9ede-example</RequestID></Response>",
    );

    assert_eq!(
        meta.protocol.response_metadata(&resp).request_id.as_deref(),
        Some("ea966190-f9aa-478e-9ede-example")
    );

    let err = meta
        .protocol
        .unmarshal::<ScalarOutput>(&meta, &op, resp)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    let api = ApiError::from_error(&err).expect("must carry api error");
    assert_eq!(api.status_code, 400);
    assert_eq!(api.code, "InvalidInstanceID.NotFound");
    assert_eq!(api.message, "The instance ID 'i-1a2b3c4d' does not exist");
    assert_eq!(
        api.request_id.as_deref(),
        Some("ea966190-f9aa-478e-9ede-example")
    );
    Ok(())
}
