//! List SQS queues with credentials from the environment.
//!
//! ```shell
//! AWS_REGION=us-east-1 AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=... \
//!     cargo run --example sqs_list_queues
//! ```

use awswire::protocol::{
    DeserializeShape, ListShape, Member, Operation, Protocol, SerializeShape, ServiceMetadata,
    Shape, Structure, StructureShape,
};
use awswire::{default_context, Client, Config, Result};
use http::Method;

static QUEUE_URLS: ListShape = ListShape::new(Shape::String);
static INPUT_MEMBERS: [Member; 1] = [Member::new("QueueNamePrefix", Shape::String)];
static INPUT: StructureShape = StructureShape::new("ListQueuesRequest", &INPUT_MEMBERS);
static OUTPUT_MEMBERS: [Member; 1] = [Member::new("QueueUrls", Shape::List(&QUEUE_URLS))
    .location_name("QueueUrl")
    .flattened()];
static OUTPUT: StructureShape = StructureShape::new("ListQueuesResult", &OUTPUT_MEMBERS);

struct ListQueuesInput {
    queue_name_prefix: Option<String>,
}

impl SerializeShape for ListQueuesInput {
    fn shape() -> &'static StructureShape {
        &INPUT
    }

    fn to_structure(&self) -> Structure {
        Structure::new().with("QueueNamePrefix", &self.queue_name_prefix)
    }
}

struct ListQueuesOutput {
    queue_urls: Vec<String>,
}

impl DeserializeShape for ListQueuesOutput {
    fn shape() -> &'static StructureShape {
        &OUTPUT
    }

    fn from_structure(mut s: Structure) -> Result<Self> {
        Ok(Self {
            queue_urls: s.take("QueueUrls")?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = default_context();
    let config = Config::from_env(&ctx);
    let meta = ServiceMetadata::new("sqs", "2012-11-05", Protocol::Query);
    let client = Client::new(ctx, meta, &config)?;

    let op = Operation::new("ListQueues", Method::POST, "/")?;
    let input = ListQueuesInput {
        queue_name_prefix: std::env::args().nth(1),
    };

    match client.invoke::<_, ListQueuesOutput>(&op, &input).await {
        Ok(out) => {
            for url in out.queue_urls {
                println!("{url}");
            }
        }
        Err(err) => println!("list queues failed: {err}"),
    }
    Ok(())
}
