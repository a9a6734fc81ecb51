//! Paginated result retrieval.

use async_stream::try_stream;
use futures::Stream;
use std::pin::Pin;
use sx_error::Result;
use sx_types::{ResultKind, ResultPage, Schema, SessionToken};
use tracing::debug;

use crate::client::SearchClient;

/// Rows requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Stream of result pages in offset order.
pub type PageStream = Pin<Box<dyn Stream<Item = Result<ResultPage>> + Send>>;

/// One `(offset, limit)` request window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

/// Split `total` rows into consecutive windows of at most `page_size` rows.
///
/// The windows cover `[0, total)` exactly once, in order. `total == 0`
/// yields no windows.
pub fn page_windows(total: u64, page_size: u64) -> impl Iterator<Item = PageWindow> {
    let page_size = page_size.max(1);
    (0..total.div_ceil(page_size)).map(move |index| {
        let offset = index * page_size;
        PageWindow {
            offset,
            limit: page_size.min(total - offset),
        }
    })
}

/// Fetches a whole result set page by page.
#[derive(Clone)]
pub struct ResultFetcher {
    client: SearchClient,
    page_size: u64,
}

impl ResultFetcher {
    pub fn new(client: SearchClient, page_size: u64) -> Self {
        Self {
            client,
            page_size: page_size.max(1),
        }
    }

    /// Lazily fetch `total` rows of a result set.
    ///
    /// Pages are requested one at a time, only when the stream is polled.
    /// The first page carries the schema reported by the service; field
    /// lists on later pages are ignored. The first error ends the stream.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use futures::StreamExt;
    ///
    /// let mut pages = fetcher.fetch_all("JOB1", ResultKind::Messages, 250, &token);
    /// while let Some(page) = pages.next().await {
    ///     let page = page?;
    ///     println!("{} rows", page.rows().len());
    /// }
    /// ```
    pub fn fetch_all(
        &self,
        job_id: &str,
        kind: ResultKind,
        total: u64,
        token: &SessionToken,
    ) -> PageStream {
        let client = self.client.clone();
        let page_size = self.page_size;
        let job_id = job_id.to_string();
        let token = token.clone();

        Box::pin(try_stream! {
            for window in page_windows(total, page_size) {
                debug!(
                    job_id = %job_id,
                    kind = %kind,
                    offset = window.offset,
                    limit = window.limit,
                    "Fetching result page"
                );

                let envelope = client.get_result_page(&job_id, kind, window, &token).await?;

                if window.offset == 0 {
                    let schema = Schema::new(envelope.field_names());
                    yield ResultPage::First {
                        schema,
                        rows: envelope.into_rows(kind),
                    };
                } else {
                    yield ResultPage::Subsequent {
                        rows: envelope.into_rows(kind),
                    };
                }
            }
        })
    }
}
