//! Interactive client for the scrape endpoint.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tablescrape_core::{ErrorBody, ExtractionResult, ScrapeRequest};
use tablescrape_logging::scrape_debug;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Error calling API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Received invalid JSON response from the API: {0}")]
    InvalidJson(String),
}

/// Posts scrape requests to a running endpoint.
#[derive(Debug, Clone)]
pub struct ScrapeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ScrapeClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn scrape(&self, url: &str) -> Result<ExtractionResult, ClientError> {
        scrape_debug!("POST {} url={}", self.endpoint, url);
        let response = self
            .http
            .post(&self.endpoint)
            .json(&ScrapeRequest::new(url))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|err| err.message)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|err| ClientError::InvalidJson(err.to_string()))
    }
}

/// Pretty JSON for display.
pub fn render_records(records: &ExtractionResult) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|err| format!("<unprintable: {err}>"))
}

/// Prompt for URLs until EOF or Ctrl-C, printing each result.
///
/// Must run on a multi-threaded tokio runtime: line editing blocks the
/// current worker via `block_in_place`.
pub async fn run_interactive(client: &ScrapeClient) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("Table scrape client (endpoint {})", client.endpoint());
    println!("Enter a URL to scrape. Ctrl-D quits.");

    loop {
        let line = tokio::task::block_in_place(|| editor.readline("url> "));
        let line = match line {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };

        let url = line.trim();
        if url.is_empty() {
            println!("Please enter a URL.");
            continue;
        }
        if let Err(err) = editor.add_history_entry(url) {
            scrape_debug!("Could not record history entry: {err}");
        }

        match client.scrape(url).await {
            Ok(records) => {
                println!("Scraped data ({} record(s)):", records.len());
                println!("{}", render_records(&records));
            }
            Err(err) => eprintln!("{err}"),
        }
    }
    Ok(())
}
