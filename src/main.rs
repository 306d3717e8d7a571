//! Hanime Downloader - CLI entry point.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use hanime_downloader::{
    api::{extract_slug, page_url, HanimeApi},
    cli::Args,
    config::{validate_config, Config},
    download::{download_episode, RunStats},
    error::{exit_codes, Error, Result},
    output::{
        clear_terminal, print_banner, print_error, print_info, print_run_stats, print_warning,
        Reporter,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    tokio::select! {
        code = run() => code,
        _ = tokio::signal::ctrl_c() => {
            print_error("Interrupted");
            ExitCode::from(exit_codes::FAILURE as u8)
        }
    }
}

async fn run() -> ExitCode {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    match run_downloads(args).await {
        Ok(stats) if stats.has_failures() => ExitCode::from(exit_codes::FAILURE as u8),
        Ok(_) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            ExitCode::from(exit_codes::FAILURE as u8)
        }
    }
}

async fn run_downloads(args: Args) -> Result<RunStats> {
    // Load configuration and merge CLI overrides
    let mut config = if args.config.exists() {
        Config::load(&args.config)?
    } else {
        Config::default()
    };
    args.merge_into_config(&mut config);
    validate_config(&config)?;

    // Collect episode URLs from arguments and an optional URL file
    let mut urls = args.urls.clone();
    if let Some(file) = &args.file {
        urls.extend(read_url_file(file)?);
    }
    if urls.is_empty() {
        return Err(Error::Config(
            "No episode URLs given (pass URLs or --file)".into(),
        ));
    }

    if !config.options.disable_ui {
        clear_terminal();
        print_banner();
    }
    print_info(&format!("{} episode URL(s) queued", urls.len()));

    let api = HanimeApi::new()?;
    let reporter = Reporter::new(config.options.disable_ui);
    let mut stats = RunStats::default();

    for url in &urls {
        let episode_urls = if config.options.all_episodes {
            match expand_franchise(&api, url).await {
                Ok(expanded) => expanded,
                Err(e) => {
                    print_warning(&format!("Could not expand {}: {}", url, e));
                    vec![url.clone()]
                }
            }
        } else {
            vec![url.clone()]
        };

        // Fatal errors are contained per episode; the queue continues.
        for episode_url in episode_urls {
            if let Err(e) = download_episode(&api, &config, &reporter, &mut stats, &episode_url).await
            {
                tracing::debug!("Episode {} failed: {}", episode_url, e);
            }
        }
    }

    print_run_stats(&stats);
    Ok(stats)
}

/// Expand one page URL to every episode of its franchise.
async fn expand_franchise(api: &HanimeApi, url: &str) -> Result<Vec<String>> {
    let slug = extract_slug(url)?;
    let info = api.get_video(&slug).await?;

    let slugs = info.franchise_slugs();
    if slugs.is_empty() {
        return Ok(vec![url.to_string()]);
    }

    Ok(slugs.iter().map(|slug| page_url(slug)).collect())
}

/// Read a newline-delimited URL list, skipping blank lines.
fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
