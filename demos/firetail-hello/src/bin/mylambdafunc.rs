use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    simple_logger::init_with_level(log::Level::Info)?;
    lambda_runtime::run(firetail_lambda::wrap_async(firetail_hello::handler)).await
}
