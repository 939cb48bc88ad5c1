pub mod appwrite;
pub mod error;
pub mod tmdb;
pub mod traits;

pub use appwrite::AppwriteClient;
pub use error::SourceError;
pub use tmdb::TmdbClient;
pub use traits::{MetadataProvider, MetricsStore, WatchedStore};
