//! tf-cloudflare command-line host
//!
//! Runs one provider callback per invocation: reads a JSON request from a
//! file or stdin and writes the JSON response to stdout. Logs go to stderr.

mod cli;
mod request;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tf_cloudflare_core::{Diagnostic, Provider, ProviderConfig, Response};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use request::Request;

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the response, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            let response = Response {
                state: None,
                diagnostics: vec![Diagnostic::error(format!("{e:#}"))],
            };
            if let Err(e) = emit(&response, cli.pretty) {
                tracing::error!("Failed to write response: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<ExitCode> {
    let request = if cli.command.reads_request() {
        Request::load(cli.input.as_deref())?
    } else {
        Request::default()
    };

    let provider = if cli.command.needs_client() {
        configure(&request.provider)?
    } else {
        Provider::unconfigured()
    };

    let response = match &cli.command {
        Command::Schema => {
            emit(&provider.schema(), cli.pretty)?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Verify => {
            let valid = provider.verify_credentials().await?;
            if !valid {
                tracing::warn!("Cloudflare rejected the configured credentials");
            }
            emit(&serde_json::json!({ "valid": valid }), cli.pretty)?;
            return Ok(if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }
        Command::Validate {
            type_name,
            data_source,
        } => {
            let diagnostics = if *data_source {
                provider.validate_data_source_config(type_name, &request.config)
            } else {
                provider.validate_resource_config(type_name, &request.config)
            };
            Response {
                state: None,
                diagnostics,
            }
        }
        Command::Create { type_name } => provider.create(type_name, &request.config).await,
        Command::Read { type_name } => provider.read(type_name, &request.state).await,
        Command::Update { type_name } => {
            provider
                .update(type_name, &request.config, &request.state)
                .await
        }
        Command::Delete { type_name } => provider.delete(type_name, &request.state).await,
        Command::Import { type_name, id } => provider.import(type_name, id).await,
        Command::ReadData { type_name } => {
            provider
                .read_data_source(type_name, &request.config)
                .await
        }
    };

    emit(&response, cli.pretty)?;
    Ok(if response.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Build a provider from the request's `provider` block and the environment.
fn configure(block: &serde_json::Value) -> Result<Provider> {
    let config = ProviderConfig::from_value(block)
        .and_then(ProviderConfig::with_env_fallback)
        .context("invalid provider configuration")?;
    tracing::debug!("Provider configuration: {config:?}");

    let client = config
        .build_client()
        .context("failed to configure the Cloudflare client")?;
    tracing::info!("Cloudflare client ready for {}", client.base_url());
    Ok(Provider::new(Arc::new(client)))
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
