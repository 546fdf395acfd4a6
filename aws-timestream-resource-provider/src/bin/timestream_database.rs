//! Lambda entry point for `AWS::Timestream::Database`.

use aws_timestream_resource_provider::config::HandlerConfig;
use aws_timestream_resource_provider::handlers::{database, DatabaseHandler};
use aws_timestream_resource_provider::lambda;
use aws_timestream_resource_provider::model::DATABASE_TYPE_NAME;
use aws_timestream_resource_provider::sdk::SdkWriteClientFactory;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let config = HandlerConfig::with_page_size(database::LIST_PAGE_SIZE).from_env();
    lambda::run(
        DatabaseHandler::new(config),
        SdkWriteClientFactory::for_resource(DATABASE_TYPE_NAME),
    )
    .await
}
