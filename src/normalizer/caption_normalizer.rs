/// Trait for turning a raw caption track into the text forwarded downstream
pub trait CaptionNormalizer: Send + Sync {
    /// Normalize the raw caption track. Never fails.
    fn normalize(&self, raw_track: &str) -> String;

    /// Get the name of this normalizer for logging
    fn name(&self) -> &'static str;
}
