// Re-export handlers from submodules
pub use super::assistant::*;
