use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use buylist_catalog::{Submission, SubmissionStatus};

use super::{open_buylist, runtime, truncate_str};
use crate::CliError;

fn status_label(status: SubmissionStatus) -> String {
    let label = format!("{:<9}", status.as_str());
    match status {
        SubmissionStatus::Pending => label.if_supports_color(Stdout, |t| t.yellow()).to_string(),
        SubmissionStatus::Contacted => label.if_supports_color(Stdout, |t| t.cyan()).to_string(),
        SubmissionStatus::Finalized => label.if_supports_color(Stdout, |t| t.green()).to_string(),
    }
}

fn find<'a>(subs: &'a [Submission], id: &str) -> Result<&'a Submission, CliError> {
    subs.iter()
        .find(|s| s.id == id)
        .ok_or_else(|| CliError::input(format!("Submission not found: {}", id)))
}

/// List submissions, newest first.
pub(crate) fn run_submissions_list(db: Option<PathBuf>) -> Result<(), CliError> {
    let rt = runtime()?;
    let buylist = rt.block_on(open_buylist(db))?;
    let subs = buylist.submissions();

    if subs.is_empty() {
        log::info!("No submissions yet.");
        return Ok(());
    }

    log::info!(
        "{}",
        format!(
            "  {:<36}  {:<16}  {:<16}  {:<28}  {:>5}  {}",
            "Id", "Received", "Name", "Email", "Cards", "Status"
        )
        .if_supports_color(Stdout, |t| t.bold()),
    );
    for sub in subs {
        log::info!(
            "  {:<36}  {:<16}  {:<16}  {:<28}  {:>5}  {}",
            sub.id,
            sub.submitted_at.format("%Y-%m-%d %H:%M"),
            truncate_str(&sub.customer.first_name, 16),
            truncate_str(&sub.customer.email, 28),
            sub.cards.len(),
            status_label(sub.status),
        );
    }
    Ok(())
}

/// Show one submission and its card list.
pub(crate) fn run_submissions_show(db: Option<PathBuf>, id: &str) -> Result<(), CliError> {
    let rt = runtime()?;
    let buylist = rt.block_on(open_buylist(db))?;
    let sub = find(buylist.submissions(), id)?;

    log::info!(
        "{} {}",
        "Submission".if_supports_color(Stdout, |t| t.bold()),
        sub.id.if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("  Name:     {}", sub.customer.first_name);
    log::info!("  Email:    {}", sub.customer.email);
    if !sub.customer.phone.is_empty() {
        log::info!("  Phone:    {}", sub.customer.phone);
    }
    log::info!("  Received: {}", sub.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"));
    log::info!("  Status:   {}", status_label(sub.status));
    crate::log_blank();

    for (row, card) in sub.cards.iter().enumerate() {
        let number = if card.number.is_empty() {
            String::new()
        } else {
            format!(" #{}", card.number)
        };
        log::info!(
            "  {:>3}. {}x {} ({}){} [{}]",
            row,
            card.quantity,
            card.name,
            card.set,
            number,
            card.condition.code(),
        );
    }
    Ok(())
}

/// Change a submission's status.
pub(crate) fn run_submissions_status(
    db: Option<PathBuf>,
    id: &str,
    status: SubmissionStatus,
) -> Result<(), CliError> {
    let rt = runtime()?;
    rt.block_on(async {
        let mut buylist = open_buylist(db).await?;
        buylist.set_status(id, status).await?;
        log::info!(
            "{} {} is now {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            id,
            status_label(status),
        );
        Ok(())
    })
}
