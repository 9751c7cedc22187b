use anyhow::{Context, Result, bail};
use axum_server::tls_rustls::RustlsConfig;
use geopost::domain::config::SslConfig;

/// Fails fast when either PEM file is missing, before the database is touched.
pub(crate) fn check_files(ssl: &SslConfig) -> Result<()> {
    for (kind, path) in [("certificate", &ssl.cert), ("key", &ssl.key)] {
        if !path.is_file() {
            bail!("SSL {kind} not found at: {}", path.display());
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = ssl.key.metadata().context("Reading SSL key metadata")?.permissions().mode();
        if mode & 0o077 != 0 {
            tracing::warn!(
                key = %ssl.key.display(),
                mode = format_args!("{:o}", mode & 0o777),
                "SSL private key is readable by group or others; expected 600"
            );
        }
    }

    Ok(())
}

pub(crate) async fn load(ssl: &SslConfig) -> Result<RustlsConfig> {
    RustlsConfig::from_pem_file(&ssl.cert, &ssl.key)
        .await
        .context("Failed to load SSL/TLS certificates")
}
