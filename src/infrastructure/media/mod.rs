mod http_media_fetcher;

pub use http_media_fetcher::{DEFAULT_MAX_MEDIA_BYTES, FetchOptions, HttpMediaFetcher};
