use anyhow::Context;
use dropcatch_kernel::config::load_config;
use dropcatch_kernel::domain::config::AppConfig;
use dropcatch_logger::Logger;
use dropcatch_server::Server;

#[dropcatch_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).init()?;

    let cfg: AppConfig =
        load_config(Some("server")).context("Critical: Configuration is malformed")?;

    Server::builder().config(cfg).build().await?.run().await
}
