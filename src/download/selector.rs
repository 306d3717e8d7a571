//! Stream variant selection.

use crate::api::StreamVariant;
use crate::error::{Error, Result};

/// Catalog positions for the known quality labels, best first.
const RESOLUTION_MAP: [(&str, usize); 4] = [("1080p", 0), ("720p", 1), ("480p", 2), ("360p", 3)];

/// Numeric height for a preference like "720p".
fn preferred_height(preference: &str) -> Option<u32> {
    preference.trim().trim_end_matches('p').parse().ok()
}

/// Catalog index the preference maps to, when it is a known label.
fn preferred_index(preference: &str) -> Option<usize> {
    RESOLUTION_MAP
        .iter()
        .find(|(label, _)| *label == preference.trim())
        .map(|(_, index)| *index)
}

/// Pick the stream variant for the requested resolution.
///
/// Fallback order: the variant at the preference's fixed catalog position
/// when it is guest-accessible and its height matches; otherwise the first
/// guest-accessible variant with a matching height in catalog order;
/// otherwise the first guest-accessible variant of any height. The declared
/// quality ranking is trusted before any linear scan.
pub fn select_stream<'a>(
    preference: &str,
    variants: &'a [StreamVariant],
) -> Result<&'a StreamVariant> {
    let height = preferred_height(preference);

    if let (Some(index), Some(height)) = (preferred_index(preference), height) {
        if let Some(variant) = variants.get(index) {
            if variant.is_guest_allowed && variant.height == height {
                return Ok(variant);
            }
        }
    }

    if let Some(height) = height {
        if let Some(variant) = variants
            .iter()
            .find(|v| v.is_guest_allowed && v.height == height)
        {
            return Ok(variant);
        }
    }

    variants
        .iter()
        .find(|v| v.is_guest_allowed)
        .ok_or_else(|| Error::NoAccessibleStream(format!("requested {}", preference)))
}
