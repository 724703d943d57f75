pub mod appwrite;
pub mod tmdb;

pub use appwrite::AppwriteStore;
pub use tmdb::{CatalogApi, CatalogError, CatalogQuery, TmdbClient};
