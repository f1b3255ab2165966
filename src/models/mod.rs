pub mod listing;
pub mod target;

pub use listing::*;
pub use target::*;

pub const EMOJI_FOUND: &str = "✅";
pub const EMOJI_PATTERN: &str = "🎯";
pub const EMOJI_LINK: &str = "🔗";
pub const NOT_AVAILABLE: &str = "N/A";
