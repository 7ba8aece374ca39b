use std::sync::Arc;

use tablescrape_core::{
    ErrorBody, ErrorKind, ExtractError, ExtractionReport, ExtractionResult, Extractor,
    FirstTableExtractor, RequestError, ScrapeRequest,
};
use tablescrape_logging::{scrape_debug, scrape_info, scrape_trace};

use crate::{decode_html, FetchError, FetchSettings, Fetcher, PageContent, ReqwestFetcher};

/// Anything that went wrong after the page was fetched.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionFailure {
    #[error(transparent)]
    Document(#[from] ExtractError),
    #[error("extraction task failed: {0}")]
    Internal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidRequest(#[from] RequestError),
    #[error("Request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("An error occurred during scraping: {0}")]
    Extraction(#[from] ExtractionFailure),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            ServiceError::Fetch(_) => ErrorKind::FetchFailure,
            ServiceError::Extraction(_) => ErrorKind::ExtractionFailure,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::new(self.kind(), self.to_string())
    }
}

/// The scrape operation: validate, fetch once, extract the first table.
///
/// Holds no per-request state; one instance can serve any number of
/// concurrent calls.
#[derive(Clone)]
pub struct ScrapeService {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
}

impl ScrapeService {
    pub fn new(fetcher: Arc<dyn Fetcher>, extractor: Arc<dyn Extractor>) -> Self {
        Self { fetcher, extractor }
    }

    /// Service backed by [`ReqwestFetcher`] and [`FirstTableExtractor`].
    pub fn with_settings(settings: FetchSettings) -> Self {
        Self::new(
            Arc::new(ReqwestFetcher::new(settings)),
            Arc::new(FirstTableExtractor),
        )
    }

    pub async fn handle(&self, request: &ScrapeRequest) -> Result<ExtractionResult, ServiceError> {
        let location = request.location()?;
        let page = self.fetcher.fetch(location).await?;
        scrape_debug!(
            "Fetched {} ({} bytes, content type {:?})",
            page.metadata.final_url,
            page.metadata.byte_len,
            page.metadata.content_type
        );

        let extractor = Arc::clone(&self.extractor);
        let report = tokio::task::spawn_blocking(move || extract_page(extractor.as_ref(), &page))
            .await
            .map_err(|err| ExtractionFailure::Internal(err.to_string()))??;

        if report.dropped_rows > 0 {
            scrape_debug!(
                "Dropped {} row(s) with mismatched cell count from {}",
                report.dropped_rows,
                location
            );
        }
        scrape_info!(
            "Scraped {} record(s) from {} ({} table(s) on page)",
            report.records.len(),
            location,
            report.tables_found
        );
        Ok(report.records)
    }
}

fn extract_page(
    extractor: &dyn Extractor,
    page: &PageContent,
) -> Result<ExtractionReport, ExtractionFailure> {
    let decoded = decode_html(&page.bytes, page.metadata.content_type.as_deref());
    if decoded.lossy {
        scrape_debug!(
            "Replaced malformed {} sequences in {}",
            decoded.encoding_label,
            page.metadata.final_url
        );
    } else {
        scrape_trace!(
            "Decoded {} as {}",
            page.metadata.final_url,
            decoded.encoding_label
        );
    }
    Ok(extractor.extract(&decoded.html)?)
}
