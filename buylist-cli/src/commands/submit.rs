use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use buylist_assistant::{extract_cards, scan_card_image};
use buylist_catalog::{Customer, NewSubmission, SubmissionCard, parse_submission_file};
use buylist_reconcile::ReconcileProgress;

use super::{assistant, open_buylist, runtime};
use crate::CliError;
use crate::cli_types::{CardSource, SubmitArgs};
use crate::spinner::SpinnerProgress;

async fn collect_cards(source: CardSource, quiet: bool) -> Result<Vec<SubmissionCard>, CliError> {
    if let Some(path) = source.csv {
        let cards = parse_submission_file(&path)
            .map_err(|e| CliError::input(format!("Failed to read {}: {}", path.display(), e)))?;
        log::info!("Read {} cards from {}", cards.len(), path.display());
        return Ok(cards);
    }

    let client = assistant()?;
    let spinner = SpinnerProgress::new(quiet);

    if let Some(path) = source.paste {
        let text = std::fs::read_to_string(&path)?;
        spinner.on_phase("AI is reading your list...");
        let cards = extract_cards(&client, &text)
            .await
            .map_err(|e| CliError::assistant(format!("Could not parse list: {}", e)))?;
        spinner.finish();
        return Ok(cards);
    }

    let images = source.image.unwrap_or_default();
    let mut cards = Vec::with_capacity(images.len());
    for (i, path) in images.iter().enumerate() {
        spinner.on_phase(&format!("Scanning [{}/{}] {}", i + 1, images.len(), path.display()));
        let jpeg = std::fs::read(path)?;
        match scan_card_image(&client, jpeg).await {
            Ok(card) => {
                log::info!(
                    "  {} {} ({}) {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    card.name,
                    card.set,
                    card.condition.code(),
                );
                cards.push(card);
            }
            Err(e) => {
                log::warn!(
                    "  {} Could not identify {}: {}",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    path.display(),
                    e,
                );
            }
        }
    }
    spinner.finish();
    Ok(cards)
}

/// Record a customer submission from a CSV, pasted text, or card photos.
pub(crate) fn run_submit(db: Option<PathBuf>, args: SubmitArgs, quiet: bool) -> Result<(), CliError> {
    let rt = runtime()?;
    rt.block_on(async {
        let cards = collect_cards(args.source, quiet).await?;
        let customer = Customer {
            first_name: args.first_name,
            email: args.email,
            phone: args.phone,
        };

        let mut buylist = open_buylist(db).await?;
        let submission = buylist
            .submit(NewSubmission::new(customer).with_cards(cards))
            .await?;

        log::info!(
            "{} Submission {} recorded with {} cards",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            submission.id.if_supports_color(Stdout, |t| t.cyan()),
            submission.cards.len(),
        );
        Ok(())
    })
}
