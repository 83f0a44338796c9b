//! Feed extraction: fetch a feed and map its entries to job records.

use chrono::{DateTime, Utc};
use feed_rs::model::{Entry, Person};
use tracing::{error, info, warn};

use crate::common::{PipelineError, PipelineResult};
use crate::config::FeedSource;
use crate::domains::jobs::models::JobRecord;
use crate::kernel::JobAlertDeps;

/// Fetch and parse a feed into job records, stamped with the current time.
///
/// Fails as a whole if the feed cannot be fetched or parsed.
pub async fn extract_jobs(source: &FeedSource, deps: &JobAlertDeps) -> PipelineResult<Vec<JobRecord>> {
    let bytes = deps.fetcher.fetch(&source.url).await.map_err(|e| {
        error!(url = %source.url, "Failed to fetch feed: {:#}", e);
        PipelineError::Fetch {
            url: source.url.clone(),
            source: e,
        }
    })?;

    let records = parse_feed(&bytes, source, Utc::now())?;
    info!(url = %source.url, count = records.len(), "Extracted jobs from feed");
    Ok(records)
}

pub fn parse_feed(
    bytes: &[u8],
    source: &FeedSource,
    fetched_at: DateTime<Utc>,
) -> PipelineResult<Vec<JobRecord>> {
    let feed = feed_rs::parser::parse(bytes).map_err(|e| {
        error!(url = %source.url, "Failed to parse feed: {}", e);
        PipelineError::Parse {
            url: source.url.clone(),
            source: e,
        }
    })?;

    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| entry_to_record(entry, &source.category, fetched_at))
        .collect())
}

/// Entries without a link have no identity and are skipped.
fn entry_to_record(entry: Entry, category: &str, fetched_at: DateTime<Utc>) -> Option<JobRecord> {
    let link = entry
        .links
        .into_iter()
        .map(|link| link.href.trim().to_string())
        .find(|href| !href.is_empty());

    let Some(link) = link else {
        warn!(entry_id = %entry.id, "Skipping feed entry without a link");
        return None;
    };

    Some(JobRecord {
        title: entry.title.map(|t| t.content.trim().to_string()).filter(|t| !t.is_empty()),
        link,
        published: entry.published.or(entry.updated),
        author: entry.authors.iter().find_map(author_name),
        category: category.to_string(),
        fetched_at,
    })
}

/// RSS `<author>` arrives as a person named "author" with the raw text in
/// `email`, usually `address (Display Name)`. Prefer the display name.
fn author_name(person: &Person) -> Option<String> {
    let name = person.name.trim();
    let raw = if name.is_empty() || name == "author" {
        person.email.as_deref()?.trim()
    } else {
        name
    };

    let display = match (raw.find('('), raw.rfind(')')) {
        (Some(open), Some(close)) if open < close => raw[open + 1..close].trim(),
        _ => raw,
    };

    let author = if display.is_empty() { raw } else { display };
    (!author.is_empty()).then(|| author.to_string())
}
