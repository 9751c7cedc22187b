use anyhow::Context;
use geopost::domain::config::ApiConfig;
use geopost::kernel::config::load_config;
use geopost_logger::Logger;
use geopost_server::Server;

#[geopost_runtime::main]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(Some("server")).context("Critical: Configuration is malformed")?;

    let mut logger =
        Logger::builder(env!("CARGO_PKG_NAME")).filter(&cfg.log.filter).json(cfg.log.json);
    if let Some(dir) = &cfg.log.directory {
        logger = logger.directory(dir.clone());
    }
    let _log = logger.init()?;

    Server::start(cfg).await?.serve().await
}
