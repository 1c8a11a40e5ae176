use crate::normalizer::CaptionNormalizer;

/// Hands the caption track over untouched, for callers that opted out of cleaning
pub struct PassthroughNormalizer;

impl Default for PassthroughNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PassthroughNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl CaptionNormalizer for PassthroughNormalizer {
    fn normalize(&self, raw_track: &str) -> String {
        raw_track.to_string()
    }

    fn name(&self) -> &'static str {
        "PassthroughNormalizer"
    }
}
