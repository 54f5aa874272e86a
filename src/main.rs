//! twitter-media-dl - CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use twitter_media_dl::{
    api::{TwitterApi, UserRef},
    cli::Args,
    config::{validate_config, Config, SourceKind},
    download::{Downloader, GlobalState, Pipeline, PipelineOptions, RunSummary},
    error::{exit_codes, Error, Result},
    output::{
        print_banner, print_config_summary, print_error, print_global_stats, print_info,
        print_source_stats, print_success, print_warning,
    },
    source::{LikesSource, PostSource, TimelineSource},
};

#[tokio::main]
async fn main() -> ExitCode {
    let outcome = tokio::select! {
        outcome = run() => outcome,
        _ = tokio::signal::ctrl_c() => {
            print_warning("Interrupted");
            return ExitCode::from(exit_codes::ABORT as u8);
        }
    };

    match outcome {
        Ok(global) if global.sources_failed > 0 => {
            ExitCode::from(exit_codes::SOME_SOURCES_FAILED as u8)
        }
        Ok(_) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            let code = match &e {
                _ if e.is_config() => exit_codes::CONFIG_ERROR,
                Error::Authentication(_) | Error::Api(_) | Error::RateLimited(_) => {
                    exit_codes::API_ERROR
                }
                Error::Download(_) | Error::RetriesExhausted { .. } => exit_codes::DOWNLOAD_ERROR,
                _ => exit_codes::UNEXPECTED_ERROR,
            };
            ExitCode::from(code as u8)
        }
    }
}

async fn run() -> Result<GlobalState> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    print_banner();

    // Load configuration
    let mut config = match Config::locate(&args.config) {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            Config::load(&path)?
        }
        None => {
            print_warning(&format!(
                "Configuration file not found: {}",
                args.config.display()
            ));
            print_info("Using default configuration with CLI arguments");
            Config::default()
        }
    };

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    validate_config(&config)?;

    let base_dir = config.output_directory();
    print_config_summary(
        &config.account.user,
        &config.options.mode.to_string(),
        &config.options.copy_mode.to_string(),
        &base_dir.display().to_string(),
    );

    print_info("Connecting to the API...");
    let api = TwitterApi::connect(&config.credentials, config.request_timeout()).await?;
    let user = UserRef::parse(&config.account.user);

    let downloader = Downloader::new(api.http_client())
        .with_copy_mode(config.options.copy_mode)
        .with_chunk_size(config.options.chunk_size)
        .with_retry_delay(config.retry_delay());
    let options = PipelineOptions::from_config(&config);

    let mut global_state = GlobalState::default();
    let mut last_error = None;

    for &kind in config.options.mode.sources() {
        print_info(&format!("Processing {}", kind));

        let result = match kind {
            SourceKind::Likes => {
                let source = LikesSource::new(api.clone(), user.clone());
                run_source(source, &downloader, &base_dir, &options).await
            }
            SourceKind::Timeline => {
                let source = TimelineSource::new(api.clone(), user.clone());
                run_source(source, &downloader, &base_dir, &options).await
            }
        };

        match result {
            Ok(summary) => {
                print_source_stats(&summary);
                global_state.add_source_stats(&summary);
            }
            Err(e) => {
                print_error(&format!("Failed to process {}: {}", kind, e));
                global_state.mark_source_failed();
                last_error = Some(e);
            }
        }
    }

    print_global_stats(&global_state);

    if global_state.sources_processed == 0 {
        if let Some(e) = last_error {
            return Err(e);
        }
    }

    print_success("Done");
    Ok(global_state)
}

async fn run_source<S: PostSource>(
    source: S,
    downloader: &Downloader,
    base_dir: &Path,
    options: &PipelineOptions,
) -> Result<RunSummary> {
    Pipeline::new(source, downloader.clone(), base_dir, options.clone())
        .run()
        .await
}
