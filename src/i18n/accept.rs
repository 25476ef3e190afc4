//! `Accept-Language` header parsing.
//!
//! Turns a header such as `de-CH, de;q=0.9, en;q=0.5, *;q=0.1` into the
//! ordered list of tags the client would accept, best first.

use crate::i18n::LanguageTag;

/// One weighted entry from an `Accept-Language` header.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptEntry {
    pub tag: LanguageTag,
    pub quality: f32,
}

/// Parse an `Accept-Language` value into tags ordered by descending quality.
///
/// Entries with equal quality keep their header order. Wildcards and
/// `q=0` entries are dropped. Returns `None` when the header is malformed
/// or names no usable language; callers treat both like a missing header.
pub fn parse_accept_language(header: &str) -> Option<Vec<LanguageTag>> {
    let entries = parse_entries(header)?;
    if entries.is_empty() {
        return None;
    }
    Some(entries.into_iter().map(|entry| entry.tag).collect())
}

/// Parse an `Accept-Language` value keeping the quality weights.
pub fn parse_entries(header: &str) -> Option<Vec<AcceptEntry>> {
    let mut entries = Vec::new();

    for raw in header.split(',') {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }

        let mut parts = raw.split(';');
        let range = parts.next().unwrap_or_default().trim();

        let mut quality = 1.0_f32;
        for param in parts {
            let (name, value) = param.split_once('=')?;
            if name.trim().eq_ignore_ascii_case("q") {
                quality = parse_quality(value.trim())?;
            }
        }

        if range == "*" {
            continue;
        }

        let tag = LanguageTag::parse(range).ok()?;
        if quality > 0.0 {
            entries.push(AcceptEntry { tag, quality });
        }
    }

    // Vec::sort_by is stable, so equal weights keep header order.
    entries.sort_by(|a, b| b.quality.total_cmp(&a.quality));
    Some(entries)
}

fn parse_quality(value: &str) -> Option<f32> {
    let quality: f32 = value.parse().ok()?;
    if (0.0..=1.0).contains(&quality) {
        Some(quality)
    } else {
        None
    }
}
