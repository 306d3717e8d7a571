//! In-order segment reassembly.

use std::path::Path;

use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::download::segments::SegmentResult;
use crate::error::Result;
use crate::output::Reporter;

/// Append segment payloads to the destination file in manifest order.
///
/// The destination is opened once in append mode. Absent segments are logged
/// and skipped, so a failed segment never truncates the positions after it.
/// Returns the number of bytes written.
pub async fn write_segments(
    path: &Path,
    results: &[SegmentResult],
    reporter: &Reporter,
) -> Result<u64> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .await?;

    let mut written = 0u64;
    for result in results {
        match &result.payload {
            Some(payload) => {
                file.write_all(payload).await?;
                written += payload.len() as u64;
            }
            None => {
                reporter.log(
                    "Missing video segment",
                    &format!("Segment {} is missing, skipping.", result.index),
                );
            }
        }
    }

    file.flush().await?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn present(index: usize, fill: u8) -> SegmentResult {
        SegmentResult {
            index,
            payload: Some(vec![fill; 8]),
        }
    }

    fn absent(index: usize) -> SegmentResult {
        SegmentResult {
            index,
            payload: None,
        }
    }

    #[tokio::test]
    async fn writes_payloads_in_index_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let results = vec![present(0, 0xAA), present(1, 0xBB), present(2, 0xCC)];

        let written = write_segments(&path, &results, &Reporter::new(true))
            .await
            .unwrap();

        assert_eq!(written, 24);
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &[0xAA; 8]);
        assert_eq!(&bytes[8..16], &[0xBB; 8]);
        assert_eq!(&bytes[16..], &[0xCC; 8]);
    }

    #[tokio::test]
    async fn absent_segment_is_skipped_without_truncating_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");
        let results = vec![present(0, 0xAA), absent(1), present(2, 0xCC)];

        let written = write_segments(&path, &results, &Reporter::new(true))
            .await
            .unwrap();

        assert_eq!(written, 16);
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], &[0xAA; 8]);
        assert_eq!(&bytes[8..], &[0xCC; 8]);
    }

    #[tokio::test]
    async fn unopenable_destination_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-subdir").join("out.mp4");

        let result = write_segments(&path, &[present(0, 0xAA)], &Reporter::new(true)).await;
        assert!(result.is_err());
    }
}
