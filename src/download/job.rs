//! Episode download orchestration.

use std::fmt;
use std::path::PathBuf;

use crate::api::{extract_slug, HanimeApi};
use crate::config::Config;
use crate::download::stats::RunStats;
use crate::download::{manifest, segments, selector, writer};
use crate::error::Result;
use crate::fs::paths::{create_download_directory, episode_filename};
use crate::output::Reporter;

/// Lifecycle of one episode download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Initializing,
    ManifestResolved,
    SegmentsFetching,
    Writing,
    Done,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Initializing => write!(f, "initializing"),
            JobState::ManifestResolved => write!(f, "manifest resolved"),
            JobState::SegmentsFetching => write!(f, "fetching segments"),
            JobState::Writing => write!(f, "writing"),
            JobState::Done => write!(f, "done"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}

/// One "download episode" invocation.
///
/// Created once per episode and discarded when `download_episode` returns.
/// Holds no connection state; sockets live inside the segment pipeline run.
#[derive(Debug, Clone)]
pub struct EpisodeJob {
    pub slug: String,
    pub title: String,
    pub output_path: PathBuf,
    pub resolution: String,
    pub max_workers: usize,
}

/// Download one episode from its page URL.
///
/// Fatal errors (bad URL, metadata/manifest fetch, missing key, no
/// accessible stream, directory provisioning) abort this episode and
/// propagate to the caller; segment-level failures degrade the output but
/// still end in `Done`.
pub async fn download_episode(
    api: &HanimeApi,
    config: &Config,
    reporter: &Reporter,
    stats: &mut RunStats,
    url: &str,
) -> Result<()> {
    let mut state = JobState::Initializing;
    tracing::debug!("Job state: {}", state);

    let outcome = run_job(api, config, reporter, stats, url, &mut state).await;
    match &outcome {
        Ok(()) => stats.episodes_completed += 1,
        Err(e) => {
            transition(&mut state, JobState::Failed);
            stats.episodes_failed += 1;
            reporter.log("Download failed", &e.to_string());
        }
    }

    outcome
}

async fn run_job(
    api: &HanimeApi,
    config: &Config,
    reporter: &Reporter,
    stats: &mut RunStats,
    url: &str,
    state: &mut JobState,
) -> Result<()> {
    let slug = extract_slug(url)?;
    let info = api.get_video(&slug).await?;
    let variant = selector::select_stream(&config.options.resolution, info.streams()?)?;

    let directory =
        create_download_directory(info.title(), config.options.download_directory.as_deref())?;
    let job = EpisodeJob {
        output_path: directory.join(episode_filename(&slug, variant.height)),
        slug,
        title: info.title().to_string(),
        resolution: config.options.resolution.clone(),
        max_workers: config.download.max_workers,
    };

    let manifest = manifest::resolve(api, variant).await?;
    transition(state, JobState::ManifestResolved);
    let cipher = manifest::load_cipher(api, &manifest).await?;

    let filename = job
        .output_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| job.slug.clone());
    let task = reporter.add_task(&filename);

    transition(state, JobState::SegmentsFetching);
    let results = segments::run(
        api,
        &manifest,
        &cipher,
        job.max_workers,
        reporter,
        &task,
        stats,
    )
    .await;

    transition(state, JobState::Writing);
    let written = writer::write_segments(&job.output_path, &results, reporter).await?;
    stats.bytes_written += written;
    reporter.finish_task(&task);

    transition(state, JobState::Done);
    tracing::info!(
        "Completed {} ({} segments, {} bytes)",
        job.output_path.display(),
        results.len(),
        written
    );
    Ok(())
}

fn transition(state: &mut JobState, next: JobState) {
    tracing::debug!("Job state: {} -> {}", state, next);
    *state = next;
}
