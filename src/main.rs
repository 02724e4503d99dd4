#[tokio::main]
async fn main() -> anyhow::Result<()> {
    currency_api::cli::run_with_sys_args().await
}
