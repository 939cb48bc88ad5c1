pub mod discover;
pub mod trending;
pub mod watched;

pub use discover::{DiscoverOrchestrator, MediaFilter, filter_by_media_type, merge_and_rank};
pub use trending::suggested_titles;
pub use watched::{SessionPhase, ToggleOutcome, WatchedManager};
