mod caption_normalizer;
mod normalizer;
mod passthrough;
mod webvtt;

pub use caption_normalizer::CaptionNormalizer;
pub use normalizer::Normalizer;
pub use passthrough::PassthroughNormalizer;
pub use webvtt::WebVttNormalizer;
