use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use buylist_catalog::price::{format_cents, price_cents};
use buylist_db::{CHUNK_SIZE, ChunkStore};

use super::{open_buylist, runtime, truncate_str};
use crate::CliError;
use crate::spinner::SpinnerProgress;

/// Replace the stored catalog with a CSV export.
pub(crate) fn run_catalog_upload(db: Option<PathBuf>, csv: &Path, quiet: bool) -> Result<(), CliError> {
    let rt = runtime()?;
    rt.block_on(async {
        let mut buylist = open_buylist(db).await?;
        let previous = buylist.catalog().len();
        let progress = SpinnerProgress::new(quiet);
        let count = buylist.upload_catalog_file(csv, &progress).await?;
        progress.finish();

        log::info!(
            "{} Catalog replaced: {} entries (was {})",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            count.if_supports_color(Stdout, |t| t.bold()),
            previous,
        );
        Ok(())
    })
}

/// Print the first `limit` catalog entries.
pub(crate) fn run_catalog_show(db: Option<PathBuf>, limit: usize) -> Result<(), CliError> {
    let rt = runtime()?;
    let buylist = rt.block_on(open_buylist(db))?;
    let catalog = buylist.catalog();

    if catalog.is_empty() {
        log::warn!("The catalog is empty.");
        log::info!("Run 'buylist catalog upload <csv>' to load one.");
        return Ok(());
    }

    log::info!(
        "{}",
        format!(
            "  {:<6} {:<40} {:<28} {:<10} {:<5} {:>9}",
            "#", "Name", "Set", "Number", "Cond", "Buy"
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    for (i, entry) in catalog.iter().take(limit).enumerate() {
        log::info!(
            "  {:<6} {:<40} {:<28} {:<10} {:<5} {:>9}",
            i,
            truncate_str(&entry.name, 40),
            truncate_str(&entry.set, 28),
            truncate_str(&entry.number, 10),
            entry.condition,
            format!("${}", entry.price).if_supports_color(Stdout, |t| t.green()),
        );
    }
    if catalog.len() > limit {
        log::info!(
            "{}",
            format!("  ... and {} more", catalog.len() - limit)
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Summarize the stored catalog.
pub(crate) fn run_catalog_stats(db: Option<PathBuf>) -> Result<(), CliError> {
    let rt = runtime()?;
    let buylist = rt.block_on(open_buylist(db))?;
    let catalog = buylist.catalog();

    let sets: BTreeSet<&str> = catalog.iter().map(|e| e.set.as_str()).collect();
    let cents: Vec<u128> = catalog.iter().map(|e| price_cents(&e.price)).collect();
    let total = cents.iter().copied().fold(0, u128::saturating_add);
    let chunks = ChunkStore::new(buylist.store()).chunk_count(catalog.len());

    log::info!(
        "{}",
        "Buy List Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();
    log::info!("  Entries:        {:>10}", catalog.len());
    log::info!("  Sets:           {:>10}", sets.len());
    log::info!("  Chunks:         {:>10} (of up to {} entries)", chunks, CHUNK_SIZE);
    if !cents.is_empty() {
        let min = cents.iter().copied().min().unwrap_or(0);
        let max = cents.iter().copied().max().unwrap_or(0);
        log::info!("  Lowest price:   {:>10}", format!("${}", format_cents(min)));
        log::info!("  Highest price:  {:>10}", format!("${}", format_cents(max)));
        log::info!(
            "  Average price:  {:>10}",
            format!("${}", format_cents(total / cents.len() as u128))
        );
    }
    Ok(())
}
