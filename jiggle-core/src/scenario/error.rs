use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScenarioError {
    #[error("scenario '{0}' has no parent keys")]
    NoKeys(String),
    #[error("scenario '{0}' runs for zero frames")]
    NoFrames(String),
    #[error("scenario '{name}' runs for {frames} frames (at most {max})")]
    TooManyFrames { name: String, frames: u32, max: u32 },
    #[error("scenario '{name}' has invalid dt {dt} (must be finite and >= 0)")]
    InvalidDt { name: String, dt: f32 },
    #[error("scenario '{name}': key {index} at frame {frame} does not come after frame {previous}")]
    KeysOutOfOrder { name: String, index: usize, frame: u32, previous: u32 },
    #[error("unknown preset '{0}' (try one of: {1})")]
    UnknownPreset(String, String),
}
