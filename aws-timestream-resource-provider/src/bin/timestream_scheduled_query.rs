//! Lambda entry point for `AWS::Timestream::ScheduledQuery`.

use aws_timestream_resource_provider::config::HandlerConfig;
use aws_timestream_resource_provider::handlers::{scheduled_query, ScheduledQueryHandler};
use aws_timestream_resource_provider::lambda;
use aws_timestream_resource_provider::model::SCHEDULED_QUERY_TYPE_NAME;
use aws_timestream_resource_provider::sdk::SdkQueryClientFactory;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    lambda_runtime::tracing::init_default_subscriber();

    let config = HandlerConfig::with_page_size(scheduled_query::LIST_PAGE_SIZE).from_env();
    lambda::run(
        ScheduledQueryHandler::new(config),
        SdkQueryClientFactory::for_resource(SCHEDULED_QUERY_TYPE_NAME),
    )
    .await
}
