//! Tablescrape core: I/O-free table extraction and the request/response contract.
mod extract;
mod failure;
mod record;
mod request;

pub use extract::{extract, ExtractError, ExtractionReport, Extractor, FirstTableExtractor};
pub use failure::{ErrorBody, ErrorKind, FailureClass};
pub use record::{ExtractionResult, Record};
pub use request::{RequestError, ScrapeRequest};
