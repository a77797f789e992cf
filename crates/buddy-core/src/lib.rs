mod model;
mod presets;

pub use model::*;
pub use presets::default_tone_profiles;
