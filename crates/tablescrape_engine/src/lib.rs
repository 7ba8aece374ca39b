//! Tablescrape engine: page fetching, decoding and the scrape service.
mod decode;
mod fetch;
mod service;
mod types;

pub use decode::{decode_html, DecodedHtml};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use service::{ExtractionFailure, ScrapeService, ServiceError};
pub use types::{FailureKind, FetchError, FetchMetadata, PageContent};
