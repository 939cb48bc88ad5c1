pub mod media;
pub mod metric;
pub mod watched;

pub use media::{Genre, MediaDetails, MediaItem, MediaType};
pub use metric::SearchMetric;
pub use watched::{WatchedEntry, WatchedKey};
