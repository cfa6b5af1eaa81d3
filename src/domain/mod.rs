pub mod recognition;
pub mod shared;
pub mod tts;
