// # terraform-provider-uptimekuma
//
// Provider process for Uptime Kuma.
//
// This binary is a thin integration layer: it sets up logging and the
// runtime, registers every resource and data source, and serves requests.
// All resource logic lives in `kuma-resources`, the socket client in
// `kuma-client` and the dispatcher in `kuma-core`.
//
// ## Protocol
//
// One JSON request per stdin line, one JSON response per stdout line.
// Logs go to stderr so they never interleave with responses.
//
// ## Configuration
//
// - `UPTIMEKUMA_LOG_LEVEL`: trace, debug, info, warn or error (default warn)
// - `UPTIMEKUMA_ENDPOINT`, `UPTIMEKUMA_USERNAME`, `UPTIMEKUMA_PASSWORD`:
//   fallbacks for the provider block, read when it is configured
//
// ## Example
//
// ```bash
// export UPTIMEKUMA_ENDPOINT=http://localhost:3001
// echo '{"method":"get_schema"}' | terraform-provider-uptimekuma
// ```

use anyhow::{Context, Result};
use kuma_client::KumaClientFactory;
use kuma_core::{Error, Provider, Request, ResourceRegistry, Response};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

const ENV_LOG_LEVEL: &str = "UPTIMEKUMA_LOG_LEVEL";

/// Process exit codes
#[derive(Debug, Clone, Copy)]
enum ProviderExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<ProviderExitCode> for ExitCode {
    fn from(code: ProviderExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Process configuration
struct Config {
    log_level: String,
}

impl Config {
    fn from_env() -> Self {
        Self {
            log_level: env::var(ENV_LOG_LEVEL)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "warn".to_string()),
        }
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.trim().to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "{} '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                ENV_LOG_LEVEL,
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();
    let level = match config.level() {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration validation error: {}", e);
            return ProviderExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ProviderExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ProviderExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run().await {
            Ok(()) => ProviderExitCode::CleanShutdown,
            Err(e) => {
                error!("Provider error: {:#}", e);
                ProviderExitCode::RuntimeError
            }
        }
    })
    .into()
}

fn build_provider() -> Provider {
    let mut registry = ResourceRegistry::new();
    kuma_resources::register(&mut registry);
    info!(
        "Registered {} resources and {} data sources",
        registry.list_resources().len(),
        registry.list_data_sources().len()
    );
    Provider::new(registry, Arc::new(KumaClientFactory))
}

/// Serve requests until EOF, a stop request or a shutdown signal
async fn run() -> Result<()> {
    let provider = build_provider();
    let mut lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let mut stdout = tokio::io::stdout();

    let shutdown = wait_for_shutdown();
    tokio::pin!(shutdown);

    info!("Provider ready");
    loop {
        let line = tokio::select! {
            signal = &mut shutdown => {
                info!("Received shutdown signal: {}", signal?);
                break;
            }
            line = lines.next() => line,
        };

        let Some(line) = line else {
            debug!("stdin closed");
            break;
        };
        let line = line.context("failed to read request")?;
        if line.trim().is_empty() {
            continue;
        }

        let (response, stop) = match serde_json::from_str::<Request>(&line) {
            Ok(request) => {
                let stop = matches!(request, Request::Stop);
                (provider.handle(request).await, stop)
            }
            Err(e) => (
                Response::failed(&Error::protocol(format!("malformed request: {e}"))),
                false,
            ),
        };

        let mut frame = serde_json::to_vec(&response).context("failed to encode response")?;
        frame.push(b'\n');
        stdout
            .write_all(&frame)
            .await
            .context("failed to write response")?;
        stdout.flush().await.context("failed to flush stdout")?;

        if stop {
            info!("Stop requested");
            break;
        }
    }

    Ok(())
}

/// Resolve with the name of the first shutdown signal received
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Fallback for non-Unix platforms
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels_parse() {
        for (raw, level) in [("trace", Level::TRACE), ("WARN", Level::WARN), (" error ", Level::ERROR)] {
            let config = Config {
                log_level: raw.to_string(),
            };
            assert_eq!(config.level().unwrap(), level);
        }
    }

    #[test]
    fn unknown_log_level_rejected() {
        let config = Config {
            log_level: "verbose".to_string(),
        };
        assert!(config.level().is_err());
    }

    #[test]
    fn provider_registers_everything() {
        let provider = build_provider();
        assert!(provider.registry().has_resource("uptimekuma_monitor_http"));
        assert!(provider.registry().has_data_source("uptimekuma_monitor"));
    }
}
