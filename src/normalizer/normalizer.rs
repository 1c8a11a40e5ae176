use anyhow::Result;
use tracing::{debug, info};

use crate::normalizer::{CaptionNormalizer, PassthroughNormalizer, WebVttNormalizer};

/// Enum to hold the normalizer selected for a request
pub enum Normalizer {
    WebVtt(WebVttNormalizer),
    Passthrough(PassthroughNormalizer),
}

impl Normalizer {
    /// Create a normalizer based on whether the caller asked for cleaned text
    pub fn create(clean_text: bool) -> Result<Self> {
        if clean_text {
            info!("Creating WebVTT caption normalizer");
            Ok(Normalizer::WebVtt(WebVttNormalizer::new()?))
        } else {
            info!("Caption cleaning disabled, using passthrough normalizer");
            Ok(Normalizer::Passthrough(PassthroughNormalizer::new()))
        }
    }

    /// Whether this normalizer actually cleans the track
    pub fn cleans(&self) -> bool {
        matches!(self, Normalizer::WebVtt(_))
    }

    /// Run normalization using the selected normalizer
    pub fn run(&self, raw_track: &str) -> String {
        match self {
            Normalizer::WebVtt(n) => {
                debug!("Running {}", n.name());
                n.normalize(raw_track)
            }
            Normalizer::Passthrough(n) => {
                debug!("Running {}", n.name());
                n.normalize(raw_track)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK: &str = "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nhello\n";

    #[test]
    fn test_create_cleaning_normalizer() {
        let normalizer = Normalizer::create(true).unwrap();
        assert!(normalizer.cleans());
        assert_eq!(normalizer.run(TRACK), "hello");
    }

    #[test]
    fn test_create_passthrough_normalizer() {
        let normalizer = Normalizer::create(false).unwrap();
        assert!(!normalizer.cleans());
        assert_eq!(normalizer.run(TRACK), TRACK);
    }
}
