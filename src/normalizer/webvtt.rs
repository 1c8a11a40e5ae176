use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::normalizer::CaptionNormalizer;

const HEADER_TAG: &str = "WEBVTT";
const NBSP_ENTITY: &str = "&nbsp;";

/// Normalizer for WebVTT caption tracks as written by auto-caption downloads.
///
/// Header, metadata and cue timing lines are dropped. Every maximal run of
/// remaining lines becomes one block, and blocks are joined into a single
/// whitespace-collapsed paragraph. Scrolling captions that repeat a phrase
/// across cues are kept verbatim.
pub struct WebVttNormalizer {
    metadata_regex: Regex,
    timing_regex: Regex,
    whitespace_regex: Regex,
}

enum ScanState {
    Scanning,
    Collecting(Vec<String>),
}

impl WebVttNormalizer {
    pub fn new() -> Result<Self> {
        let metadata_regex = Regex::new(r"(?i)^(kind|language):")?;
        // Only the leading range has to match, cue settings may follow
        let timing_regex =
            Regex::new(r"^\d{2}:\d{2}:\d{2}\.\d{3} --> \d{2}:\d{2}:\d{2}\.\d{3}")?;
        let whitespace_regex = Regex::new(r"\s+")?;

        Ok(Self {
            metadata_regex,
            timing_regex,
            whitespace_regex,
        })
    }

    /// Split a track into merged text blocks, in source order.
    pub fn blocks(&self, raw_track: &str) -> Vec<String> {
        let lines: Vec<&str> = raw_track.split('\n').collect();
        let mut blocks = Vec::new();
        let mut cursor = 0;
        let mut state = ScanState::Scanning;

        loop {
            let line = lines.get(cursor).copied();
            state = match (state, line) {
                (ScanState::Scanning, None) => break,
                (ScanState::Scanning, Some(line)) if self.is_skippable(line) => {
                    cursor += 1;
                    ScanState::Scanning
                }
                (ScanState::Scanning, Some(_)) => ScanState::Collecting(Vec::new()),
                (ScanState::Collecting(mut block), Some(line)) if !self.is_skippable(line) => {
                    block.push(clean_line(line));
                    cursor += 1;
                    ScanState::Collecting(block)
                }
                // The stopping line is left for the scanner to look at again
                (ScanState::Collecting(block), _) => {
                    let merged = self.collapse(&block.join(" "));
                    if !merged.is_empty() {
                        blocks.push(merged);
                    }
                    ScanState::Scanning
                }
            };
        }

        blocks
    }

    fn is_skippable(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty() || self.is_marker(trimmed)
    }

    fn is_marker(&self, trimmed: &str) -> bool {
        trimmed.to_uppercase() == HEADER_TAG
            || self.metadata_regex.is_match(trimmed)
            || self.timing_regex.is_match(trimmed)
    }

    fn collapse(&self, text: &str) -> String {
        self.whitespace_regex
            .replace_all(text, " ")
            .trim()
            .to_string()
    }
}

fn clean_line(line: &str) -> String {
    line.replace(NBSP_ENTITY, " ").trim().to_string()
}

impl CaptionNormalizer for WebVttNormalizer {
    fn normalize(&self, raw_track: &str) -> String {
        debug!("Normalizing WebVTT caption track");

        let blocks = self.blocks(raw_track);
        let result = self.collapse(&blocks.join(" "));

        debug!(
            "Normalized {} chars in {} blocks to {} chars",
            raw_track.len(),
            blocks.len(),
            result.len()
        );

        result
    }

    fn name(&self) -> &'static str {
        "WebVttNormalizer"
    }
}
