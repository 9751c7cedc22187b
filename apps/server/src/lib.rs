//! # GeoPost Server
//!
//! HTTP API for postal addresses with coordinates, built on `Axum` and `SurrealDB`.
//!
//! ```no_run
//! use geopost::domain::config::ApiConfig;
//! use geopost_server::Server;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     Server::start(ApiConfig::default()).await?.serve().await
//! }
//! ```

mod router;
mod shutdown;
mod tls;

use anyhow::{Context, Result, anyhow};
use axum::Router;
use geopost::domain::config::{ApiConfig, DatabaseConfig};
use geopost::kernel::server::ApiState;
use geopost_database::Database;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A started server: database connected, migrations applied and every feature
/// slice registered. Nothing listens until [`Server::serve`].
#[must_use = "call .serve().await to accept connections"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    /// # Errors
    /// Fails when a configured TLS file is missing, the database is unreachable
    /// or rejects the credentials, a migration fails, or a slice cannot start.
    pub async fn start(cfg: ApiConfig) -> Result<Self> {
        if let Some(ssl) = &cfg.server.ssl {
            tls::check_files(ssl)?;
        }

        let database = connect(&cfg.database).await?;
        let slices = geopost::init(&database)
            .map_err(|e| anyhow!("Feature slices failed to initialize: {e}"))?;
        let state = ApiState::new(cfg, database, slices).context("Assembling router state")?;

        Ok(Self { state })
    }

    /// The full HTTP application: system and address routes, API reference,
    /// request tracing and CORS.
    ///
    /// # Errors
    /// Returns an error if a configured CORS origin is not a valid header value.
    pub fn router(&self) -> Result<Router> {
        router::init(self.state.clone())
    }

    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }

    /// Accepts connections until SIGINT or SIGTERM, then drains in-flight
    /// requests for up to 30 seconds.
    ///
    /// # Errors
    /// Returns an error if the listener cannot bind or the certificates fail to load.
    pub async fn serve(self) -> Result<()> {
        let server = &self.state.config().server;
        let address = SocketAddr::new(server.address, server.port);
        let app = self.router()?.into_make_service();
        let handle = shutdown::on_signal(SHUTDOWN_GRACE);

        if let Some(ssl) = &server.ssl {
            info!("Listening on https://{address}");
            axum_server::bind_rustls(address, tls::load(ssl).await?)
                .handle(handle)
                .serve(app)
                .await
                .context("HTTPS listener failed")?;
        } else {
            info!("Listening on http://{address}");
            axum_server::bind(address)
                .handle(handle)
                .serve(app)
                .await
                .context("HTTP listener failed")?;
        }

        info!("Server stopped");
        Ok(())
    }
}

async fn connect(cfg: &DatabaseConfig) -> Result<Database> {
    let mut builder = Database::builder()
        .url(&cfg.url)
        .session(&cfg.namespace, &cfg.database)
        .migrations(geopost::migrations());
    if let Some(creds) = &cfg.credentials {
        builder = builder.auth(&creds.username, &creds.password);
    }

    builder.init().await.with_context(|| format!("Failed to connect to {}", cfg.url))
}
