//! Episode download engine.
//!
//! This module provides:
//! - Stream variant selection with quality fallback
//! - Manifest and decryption key resolution
//! - The concurrent segment fetch/decrypt pipeline
//! - In-order reassembly to the destination file
//! - Per-episode orchestration and run statistics

pub mod job;
pub mod manifest;
pub mod segments;
pub mod selector;
pub mod stats;
pub mod writer;

pub use job::{download_episode, EpisodeJob, JobState};
pub use manifest::{Manifest, ManifestKey};
pub use segments::{SegmentResult, SegmentSource};
pub use selector::select_stream;
pub use stats::RunStats;
pub use writer::write_segments;
