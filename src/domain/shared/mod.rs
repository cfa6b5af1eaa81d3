pub mod sound_path;

pub use sound_path::resolve_sound_path;
