//! Page → CSV → object pipeline for one result set.

use futures::StreamExt;
use object_store::ObjectStore;
use std::sync::Arc;
use sx_error::{Result, SxError};
use sx_export::{CompletionMessage, Notifier, S3Sink, encode};
use sx_search::ResultFetcher;
use sx_types::{Locator, ResultPage, Schema};
use tracing::{debug, info};

use crate::request::DumpRequest;

/// Write one result set to its destination and announce it.
///
/// Pages are fetched, encoded and written strictly one after another. The
/// header comes from the first page's schema and is written once. On any
/// failure the upload is abandoned and the error returned; nothing already
/// uploaded is cleaned up. When the session carries a topic, a publish
/// failure fails the dump even though the object was written.
pub(crate) async fn dump_result_set(
    fetcher: &ResultFetcher,
    store: Arc<dyn ObjectStore>,
    notifier: &dyn Notifier,
    request: &DumpRequest,
) -> Result<Locator> {
    let context = &request.context;
    let kind = request.kind;
    let total = request.total();
    let mut sink = S3Sink::new(store, context.destination(kind));

    info!(
        job_id = %context.id,
        kind = %kind,
        total = total,
        locator = %sink.destination().locator(),
        "Dumping search results"
    );

    let mut pages = fetcher.fetch_all(&context.id, kind, total, &context.cookie);
    let mut schema: Option<Schema> = None;
    let mut rows_written: u64 = 0;

    while let Some(page) = pages.next().await {
        let chunk = match page? {
            ResultPage::First { schema: first, rows } => {
                let chunk = encode(&first, &rows, true)?;
                rows_written += rows.len() as u64;
                schema = Some(first);
                chunk
            }
            ResultPage::Subsequent { rows } => {
                let schema = schema.as_ref().ok_or_else(|| {
                    SxError::Encode("Result page arrived before the schema".to_string())
                })?;
                rows_written += rows.len() as u64;
                encode(schema, &rows, false)?
            }
        };

        sink.write(&chunk).await?;
        debug!(
            job_id = %context.id,
            kind = %kind,
            rows = rows_written,
            bytes = sink.bytes_written(),
            "Wrote result page"
        );
    }

    let locator = sink.finish().await?;

    info!(
        job_id = %context.id,
        kind = %kind,
        rows = rows_written,
        locator = %locator,
        "Search results dumped"
    );

    if let Some(topic) = &context.sns_topic_arn {
        let search = context.search.as_ref();
        let message = CompletionMessage {
            query: search.map(|s| s.query.clone()),
            from: search.map(|s| s.from),
            to: search.map(|s| s.to),
            job_id: context.id.clone(),
            kind,
            locator: locator.clone(),
        };
        notifier.notify(topic, &message.subject(), &message).await?;
    }

    Ok(locator)
}
