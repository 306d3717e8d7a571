//! Concurrent segment fetch and decrypt pipeline.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use rand::Rng;

use crate::crypto::CipherContext;
use crate::download::manifest::Manifest;
use crate::download::stats::RunStats;
use crate::error::Result;
use crate::output::Reporter;

/// Fetch attempts per segment before it is recorded as missing.
pub const SEGMENT_RETRIES: u32 = 10;

/// Upper bound for a single retry delay.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Network source for raw (still encrypted) segment bodies.
#[async_trait]
pub trait SegmentSource: Sync {
    async fn fetch_segment(&self, uri: &str) -> Result<Vec<u8>>;
}

/// Terminal outcome for one manifest index.
///
/// `payload: None` means the retry budget was exhausted and the position is
/// skipped at write time; it is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentResult {
    pub index: usize,
    pub payload: Option<Vec<u8>>,
}

struct Fetched {
    result: SegmentResult,
    recovered: bool,
}

/// Fetch and decrypt every segment of the manifest under bounded concurrency.
///
/// Returns exactly one result per manifest index, sorted by index. Segment
/// failures are absorbed into the result set; this never fails the job.
pub async fn run<S: SegmentSource>(
    source: &S,
    manifest: &Manifest,
    cipher: &CipherContext,
    max_workers: usize,
    reporter: &Reporter,
    task: &ProgressBar,
    stats: &mut RunStats,
) -> Vec<SegmentResult> {
    let total = manifest.segment_uris.len();
    if total == 0 {
        return Vec::new();
    }

    let mut pending = stream::iter(manifest.segment_uris.iter().enumerate())
        .map(|(index, uri)| process_segment(source, cipher, index, uri, reporter))
        .buffer_unordered(max_workers.max(1));

    let mut results = Vec::with_capacity(total);
    let mut completed = 0usize;

    while let Some(fetched) = pending.next().await {
        completed += 1;
        if fetched.recovered {
            stats.segments_recovered += 1;
        }
        if fetched.result.payload.is_none() {
            stats.segments_missing += 1;
        }
        reporter.update_percent(task, completed as f64 / total as f64 * 100.0);
        results.push(fetched.result);
    }

    drop(pending);
    results.sort_unstable_by_key(|result| result.index);
    results
}

/// Download and decrypt a single segment, retrying transient failures.
async fn process_segment<S: SegmentSource>(
    source: &S,
    cipher: &CipherContext,
    index: usize,
    uri: &str,
    reporter: &Reporter,
) -> Fetched {
    let Some(data) = fetch_with_retry(source, uri, reporter).await else {
        return Fetched {
            result: SegmentResult {
                index,
                payload: None,
            },
            recovered: false,
        };
    };

    let decrypted = cipher.decrypt(&data);
    if decrypted.padding_recovered {
        reporter.log(
            "Decryption error",
            &format!(
                "Padding error for segment {}. Proceeding with partial data.",
                uri
            ),
        );
    }

    Fetched {
        result: SegmentResult {
            index,
            payload: Some(decrypted.bytes),
        },
        recovered: decrypted.padding_recovered,
    }
}

async fn fetch_with_retry<S: SegmentSource>(
    source: &S,
    uri: &str,
    reporter: &Reporter,
) -> Option<Vec<u8>> {
    for attempt in 0..SEGMENT_RETRIES {
        match source.fetch_segment(uri).await {
            Ok(data) => return Some(data),
            Err(e) => {
                tracing::debug!("Segment fetch failed ({}): {}", uri, e);
                if attempt + 1 < SEGMENT_RETRIES {
                    tokio::time::sleep(backoff_delay(attempt, MAX_RETRY_DELAY)).await;
                    reporter.log(
                        "Request error",
                        &format!(
                            "Retrying to download segment {}... ({}/{})",
                            uri,
                            attempt + 1,
                            SEGMENT_RETRIES
                        ),
                    );
                }
            }
        }
    }

    reporter.log(
        "Failed segment download",
        &format!("Failed to download {}", uri),
    );
    None
}

/// Exponential backoff with jitter: `min(max_delay, 2^(attempt+1) + U[1,3))`.
fn backoff_delay(attempt: u32, max_delay: Duration) -> Duration {
    let exponential = 2f64.powi(attempt as i32 + 1);
    let jitter = rand::thread_rng().gen_range(1.0..3.0);
    Duration::from_secs_f64(exponential + jitter).min(max_delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::manifest::ManifestKey;
    use crate::download::writer::write_segments;
    use crate::error::Error;
    use aes::cipher::block_padding::NoPadding;
    use aes::cipher::{BlockEncryptMut, KeyIvInit};
    use std::collections::HashMap;
    use std::sync::Mutex;

    type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;

    const KEY: [u8; 16] = [0x42; 16];

    fn encrypt(plaintext: &[u8]) -> Vec<u8> {
        let mut buf = plaintext.to_vec();
        let len = buf.len();
        Aes128CbcEnc::new(&KEY.into(), &[0u8; 16].into())
            .encrypt_padded_mut::<NoPadding>(&mut buf, len)
            .unwrap();
        buf
    }

    fn cipher() -> CipherContext {
        CipherContext::new(&KEY, None).unwrap()
    }

    fn manifest(uris: &[&str]) -> Manifest {
        Manifest {
            segment_uris: uris.iter().map(|s| s.to_string()).collect(),
            key: Some(ManifestKey {
                uri: "https://cdn.example/key.bin".into(),
                iv: None,
            }),
        }
    }

    /// Scripted segment source: per-URI payloads, leading failures, delays.
    #[derive(Default)]
    struct FakeSource {
        payloads: HashMap<String, Vec<u8>>,
        failures: Mutex<HashMap<String, u32>>,
        delays: HashMap<String, Duration>,
    }

    impl FakeSource {
        fn with_payloads<P: AsRef<[u8]>>(plaintexts: &[(&str, P)]) -> Self {
            Self {
                payloads: plaintexts
                    .iter()
                    .map(|(uri, data)| (uri.to_string(), encrypt(data.as_ref())))
                    .collect(),
                ..Default::default()
            }
        }

        fn failing_first(mut self, uri: &str, count: u32) -> Self {
            self.failures.get_mut().unwrap().insert(uri.into(), count);
            self
        }

        fn delayed(mut self, uri: &str, delay: Duration) -> Self {
            self.delays.insert(uri.into(), delay);
            self
        }
    }

    #[async_trait]
    impl SegmentSource for FakeSource {
        async fn fetch_segment(&self, uri: &str) -> Result<Vec<u8>> {
            if let Some(delay) = self.delays.get(uri) {
                tokio::time::sleep(*delay).await;
            }

            {
                let mut failures = self.failures.lock().unwrap();
                if let Some(remaining) = failures.get_mut(uri) {
                    if *remaining > 0 {
                        *remaining -= 1;
                        return Err(Error::Api("transient failure".into()));
                    }
                }
            }

            self.payloads
                .get(uri)
                .cloned()
                .ok_or_else(|| Error::Api("no such segment".into()))
        }
    }

    fn plaintext(fill: u8) -> Vec<u8> {
        vec![fill; 32]
    }

    #[tokio::test(start_paused = true)]
    async fn results_are_ordered_by_index_regardless_of_completion_order() {
        let p0 = plaintext(0xA0);
        let p1 = plaintext(0xA1);
        let p2 = plaintext(0xA2);
        let source = FakeSource::with_payloads(&[("s0", &p0), ("s1", &p1), ("s2", &p2)])
            .delayed("s0", Duration::from_secs(30))
            .delayed("s1", Duration::from_secs(15));

        let mut stats = RunStats::default();
        let results = run(
            &source,
            &manifest(&["s0", "s1", "s2"]),
            &cipher(),
            3,
            &Reporter::new(true),
            &ProgressBar::hidden(),
            &mut stats,
        )
        .await;

        assert_eq!(results.len(), 3);
        for (index, result) in results.iter().enumerate() {
            assert_eq!(result.index, index);
        }
        assert_eq!(results[0].payload.as_deref(), Some(p0.as_slice()));
        assert_eq!(results[1].payload.as_deref(), Some(p1.as_slice()));
        assert_eq!(results[2].payload.as_deref(), Some(p2.as_slice()));
        assert_eq!(stats.segments_missing, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_mark_segment_absent() {
        let p0 = plaintext(0xB0);
        let p2 = plaintext(0xB2);
        let source = FakeSource::with_payloads(&[("s0", &p0), ("s2", &p2)])
            .failing_first("s1", SEGMENT_RETRIES);

        let mut stats = RunStats::default();
        let results = run(
            &source,
            &manifest(&["s0", "s1", "s2"]),
            &cipher(),
            2,
            &Reporter::new(true),
            &ProgressBar::hidden(),
            &mut stats,
        )
        .await;

        assert_eq!(results[0].payload.as_deref(), Some(p0.as_slice()));
        assert_eq!(results[1].payload, None);
        assert_eq!(results[2].payload.as_deref(), Some(p2.as_slice()));
        assert_eq!(stats.segments_missing, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_failures_recover_within_budget() {
        let p0 = plaintext(0xC0);
        let source =
            FakeSource::with_payloads(&[("s0", &p0)]).failing_first("s0", SEGMENT_RETRIES - 1);

        let mut stats = RunStats::default();
        let results = run(
            &source,
            &manifest(&["s0"]),
            &cipher(),
            1,
            &Reporter::new(true),
            &ProgressBar::hidden(),
            &mut stats,
        )
        .await;

        assert_eq!(results[0].payload.as_deref(), Some(p0.as_slice()));
        assert_eq!(stats.segments_missing, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rerun_produces_identical_results() {
        let p0 = plaintext(0xD0);
        let p1 = plaintext(0xD1);
        let source = FakeSource::with_payloads(&[("s0", &p0), ("s1", &p1)]);
        let manifest = manifest(&["s0", "s1"]);

        let mut stats = RunStats::default();
        let first = run(
            &source,
            &manifest,
            &cipher(),
            2,
            &Reporter::new(true),
            &ProgressBar::hidden(),
            &mut stats,
        )
        .await;
        let second = run(
            &source,
            &manifest,
            &cipher(),
            2,
            &Reporter::new(true),
            &ProgressBar::hidden(),
            &mut stats,
        )
        .await;

        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn three_segment_end_to_end_reassembly() {
        let p0 = plaintext(0xE0);
        let p1 = plaintext(0xE1);
        let p2 = plaintext(0xE2);
        let source = FakeSource::with_payloads(&[("s0", &p0), ("s1", &p1), ("s2", &p2)])
            .failing_first("s2", 2);

        let mut stats = RunStats::default();
        let reporter = Reporter::new(true);
        let results = run(
            &source,
            &manifest(&["s0", "s1", "s2"]),
            &cipher(),
            3,
            &reporter,
            &ProgressBar::hidden(),
            &mut stats,
        )
        .await;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episode.mp4");
        write_segments(&path, &results, &reporter).await.unwrap();

        let written = std::fs::read(&path).unwrap();
        let expected: Vec<u8> = [p0, p1, p2].concat();
        assert_eq!(written, expected);
    }

    #[test]
    fn backoff_delays_are_bounded_and_non_decreasing() {
        let max = Duration::from_secs(30);
        let mut previous_floor = Duration::ZERO;

        for attempt in 0..SEGMENT_RETRIES {
            let delay = backoff_delay(attempt, max);
            let floor = Duration::from_secs_f64(
                (2f64.powi(attempt as i32 + 1) + 1.0).min(max.as_secs_f64()),
            );

            assert!(delay <= max, "attempt {} exceeded the cap", attempt);
            assert!(delay >= floor, "attempt {} below its floor", attempt);
            assert!(delay >= previous_floor, "attempt {} decreased", attempt);
            previous_floor = floor;
        }
    }
}
