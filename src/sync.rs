use crate::cli::CommonArgs;
use crate::config::Config;
use crate::error::Result;
use crate::github::{DiffSource, GithubClient, PageSource};
use crate::model::{MergedPullRequest, PullRequestRecord};
use crate::store::Store;
use crate::throttle::Throttle;
use crate::zh::zh_char_count;
use anyhow::Context;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Debug, Default, Clone, Copy)]
pub struct IngestSummary {
    pub pages: u32,
    pub seen: u64,
    pub recorded: u64,
    pub skipped: u64,
}

pub fn exec(common: &CommonArgs) -> anyhow::Result<()> {
    let config = Config::load(&common.config).context("Failed to load configuration")?;
    let store = Store::open(common.db_path()).context("Failed to open database")?;
    let client = GithubClient::new(&config).context("Failed to build GitHub client")?;
    let throttle = Throttle::from_config(&config.throttle);

    let summary = ingest_with_progress(&client, &store, &throttle, false)
        .context("Failed to ingest merged pull requests")?;

    println!("{}", style("Ingestion Summary").bold());
    println!("{}", "─".repeat(50));
    println!("Pages walked: {}", style(summary.pages).cyan());
    println!("Pull requests seen: {}", style(summary.seen).cyan());
    println!("Newly recorded: {}", style(summary.recorded).green());
    println!("Already recorded: {}", style(summary.skipped).yellow());

    Ok(())
}

/// Walks every page of merged, labeled pull requests and records each one at
/// most once. Iterative on purpose: the upstream decides when pagination
/// ends, and the loop carries the cursor instead of the call stack. Each
/// page is fully processed before the next one is requested, so everything
/// ingested so far survives a mid-run failure.
pub fn ingest<S>(source: &S, store: &Store, throttle: &Throttle) -> Result<IngestSummary>
where
    S: PageSource + DiffSource,
{
    ingest_inner(source, store, throttle, None)
}

pub fn ingest_with_progress<S>(
    source: &S,
    store: &Store,
    throttle: &Throttle,
    quiet: bool,
) -> Result<IngestSummary>
where
    S: PageSource + DiffSource,
{
    if quiet {
        return ingest_inner(source, store, throttle, None);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Fetching merged pull requests...");

    let summary = ingest_inner(source, store, throttle, Some(&pb));
    pb.finish_and_clear();
    summary
}

fn ingest_inner<S>(
    source: &S,
    store: &Store,
    throttle: &Throttle,
    pb: Option<&ProgressBar>,
) -> Result<IngestSummary>
where
    S: PageSource + DiffSource,
{
    let mut summary = IngestSummary::default();
    let mut cursor: Option<String> = None;

    loop {
        let page = source.fetch_page(cursor.as_deref())?;
        summary.pages += 1;

        for pr in &page.items {
            summary.seen += 1;
            if let Some(pb) = pb {
                pb.set_message(format!("page {} · pr #{}", summary.pages, pr.number));
            }
            match record_if_absent(source, store, throttle, pr)? {
                Some(count) => {
                    summary.recorded += 1;
                    if let Some(pb) = pb {
                        pb.println(format!("recorded pr #{} ({} zh chars)", pr.number, count));
                    }
                }
                None => summary.skipped += 1,
            }
        }

        if !page.has_next {
            break;
        }
        cursor = page.end_cursor;
        throttle.between_pages();
    }

    Ok(summary)
}

/// Fetches, measures and stores one pull request unless it is already
/// recorded. The existence check comes before the diff fetch, so reruns
/// skip the network cost for anything seen in a prior run. Returns the
/// measured count for a newly written row, `None` for a skip.
pub fn record_if_absent<S>(
    source: &S,
    store: &Store,
    throttle: &Throttle,
    pr: &MergedPullRequest,
) -> Result<Option<u64>>
where
    S: DiffSource,
{
    if store.exists(pr.number)? {
        return Ok(None);
    }

    let diff = source.fetch_diff(pr.number)?;
    let zh_word_count = zh_char_count(&diff);

    let inserted = store.insert(&PullRequestRecord {
        number: pr.number,
        author: pr.author.clone(),
        merged_at: pr.merged_at,
        base_branch: pr.base_branch.clone(),
        zh_word_count,
    })?;

    if inserted {
        throttle.after_record();
        Ok(Some(zh_word_count))
    } else {
        Ok(None)
    }
}
