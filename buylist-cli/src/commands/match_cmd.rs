use std::future::Future;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use buylist_assistant::GeminiClient;
use buylist_match::{MatchKeyStrategy, MatchSource};
use buylist_reconcile::settings::shop_name;
use buylist_reconcile::{
    DirectorySink, FuzzyOptions, ReconcileError, ReconcileSession, collection_vibe,
    draft_offer_email,
};

use super::{assistant, open_buylist, runtime, truncate_str};
use crate::CliError;
use crate::cli_types::MatchArgs;
use crate::spinner::SpinnerProgress;

/// Parse `--select`: "all", or comma-separated row numbers.
fn apply_selection(session: &mut ReconcileSession, selection: &str) -> Result<(), CliError> {
    if selection.trim().eq_ignore_ascii_case("all") {
        session.select_all_matches();
        return Ok(());
    }
    let rows = selection
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| CliError::input(format!("Invalid row number '{}'", s)))
        })
        .collect::<Result<Vec<_>, _>>()?;
    session.select(&rows)?;
    Ok(())
}

fn source_label(source: MatchSource) -> String {
    match source {
        MatchSource::Strict => "STRICT".if_supports_color(Stdout, |t| t.green()).to_string(),
        MatchSource::Fuzzy => "AI".if_supports_color(Stdout, |t| t.magenta()).to_string(),
        MatchSource::None => "-".if_supports_color(Stdout, |t| t.dimmed()).to_string(),
    }
}

fn print_rows(session: &ReconcileSession) {
    for (row, card) in session.cards().iter().enumerate() {
        let m = session.match_for(row);
        let mark = if session.selection().contains(row) {
            "[x]"
        } else {
            "[ ]"
        };
        let offer = match m.entry {
            Some(entry) => format!("{} | {} | ${}", entry.name, entry.set, entry.price),
            None => "no match".to_string(),
        };
        log::info!(
            "  {} {:>3}. {:>2}x {:<30} {:<24} {:<6} {}",
            mark,
            row,
            card.quantity,
            truncate_str(&card.name, 30),
            truncate_str(&card.set, 24),
            source_label(m.source),
            offer,
        );
    }
}

fn print_debug(session: &ReconcileSession) {
    log::info!("{}", "Match keys".if_supports_color(Stdout, |t| t.bold()));
    for d in session.debug_rows() {
        log::info!("  {:>3}. {} ({})", d.row, d.key, d.source.tag());
    }
    crate::log_blank();
}

fn ensure_client(slot: &mut Option<GeminiClient>) -> Result<&GeminiClient, CliError> {
    if slot.is_none() {
        *slot = Some(assistant()?);
    }
    slot.as_ref()
        .ok_or_else(|| CliError::assistant("assistant client unavailable"))
}

/// Run an assistant-backed extra. Any failure, including a client that could
/// not be built, is logged and yields `None`.
async fn optional_extra<'a, A, F, Fut>(
    what: &str,
    client: Result<&'a A, CliError>,
    call: F,
) -> Option<String>
where
    F: FnOnce(&'a A) -> Fut,
    Fut: Future<Output = Result<String, ReconcileError>>,
{
    let result = match client {
        Ok(c) => call(c).await.map_err(CliError::from),
        Err(e) => Err(e),
    };
    match result {
        Ok(text) => Some(text),
        Err(e) => {
            log::error!("Could not {}: {}", what, e);
            None
        }
    }
}

/// Match a submission, optionally consult the assistant, and produce an offer.
pub(crate) fn run_match(db: Option<PathBuf>, args: MatchArgs, quiet: bool) -> Result<(), CliError> {
    let rt = runtime()?;
    rt.block_on(async {
        let buylist = open_buylist(db).await?;
        if buylist.catalog().is_empty() {
            log::warn!("The catalog is empty; nothing can match.");
        }

        let strategy = if args.number_aware {
            MatchKeyStrategy::NameSetNumber
        } else {
            MatchKeyStrategy::NameSet
        };
        let mut session = buylist.open_session(&args.id, strategy)?;
        log::info!(
            "{} strict matches for {} cards",
            session.strict_matches().len(),
            session.cards().len(),
        );

        // Built on first use so runs without assistant features need no key.
        let mut client = None;

        if args.fuzzy {
            let c = ensure_client(&mut client)?;
            let options = FuzzyOptions {
                max_in_flight: args.concurrency.max(1),
                ..Default::default()
            };
            let progress = SpinnerProgress::new(quiet);
            session.run_fuzzy(c, &options, &progress).await?;
        }

        if let Some(ref selection) = args.select {
            apply_selection(&mut session, selection)?;
        }

        crate::log_blank();
        if args.debug {
            print_debug(&session);
        }
        print_rows(&session);
        crate::log_blank();
        log::info!(
            "  Selected: {}   Total offer: {}",
            session.selection().len(),
            format!("${}", session.total_value()).if_supports_color(Stdout, |t| t.bold()),
        );

        if let Some(dir) = args.export {
            let sink = DirectorySink::new(dir);
            let export = session.export_to(&sink)?;
            log::info!(
                "{} Wrote {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                sink.path_for(&export.file_name).display(),
            );
        }

        // Drafting failures are reported but do not fail the command.
        if args.email {
            let shop = shop_name();
            let drafted = optional_extra("draft email", ensure_client(&mut client), |c| {
                draft_offer_email(c, &shop, &session)
            })
            .await;
            if let Some(email) = drafted {
                crate::log_blank();
                log::info!("{}", "Offer email".if_supports_color(Stdout, |t| t.bold()));
                log::info!("{}", email);
            }
        }

        if args.vibe {
            let summary = optional_extra("summarize collection", ensure_client(&mut client), |c| {
                collection_vibe(c, session.cards())
            })
            .await;
            if let Some(vibe) = summary {
                crate::log_blank();
                log::info!("{}", "Collection vibe".if_supports_color(Stdout, |t| t.bold()));
                log::info!("{}", vibe);
            }
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn extra_without_client_is_skipped() {
        let missing: Result<&(), CliError> = Err(CliError::config("No API key configured"));
        let out = optional_extra("draft email", missing, |_| async {
            Ok::<_, ReconcileError>("never sent".to_string())
        })
        .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn extra_failure_is_skipped() {
        let client = ();
        let out = optional_extra("draft email", Ok(&client), |_| async {
            Err::<String, _>(ReconcileError::NothingSelected)
        })
        .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn extra_success_returns_text() {
        let client = ();
        let out = optional_extra("summarize collection", Ok(&client), |_| async {
            Ok::<_, ReconcileError>("Mostly vintage holos.".to_string())
        })
        .await;
        assert_eq!(out.as_deref(), Some("Mostly vintage holos."));
    }
}
