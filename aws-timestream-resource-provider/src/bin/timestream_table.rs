//! Lambda entry point for `AWS::Timestream::Table`.

use aws_timestream_resource_provider::config::HandlerConfig;
use aws_timestream_resource_provider::handlers::{table, TableHandler};
use aws_timestream_resource_provider::lambda;
use aws_timestream_resource_provider::model::TABLE_TYPE_NAME;
use aws_timestream_resource_provider::sdk::SdkWriteClientFactory;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let config = HandlerConfig::with_page_size(table::LIST_PAGE_SIZE).from_env();
    lambda::run(
        TableHandler::new(config),
        SdkWriteClientFactory::for_resource(TABLE_TYPE_NAME),
    )
    .await
}
