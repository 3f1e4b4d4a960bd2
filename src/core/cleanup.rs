//! `l10n cleanup`: run the section filter over XLIFF files in place.

use anyhow::{Context, Result, bail};
use tracing::{info, instrument};

use crate::cli::{AppContext, CleanupArgs};
use crate::core::filter;
use crate::infra::config::{FilterRules, parse_comment_overrides};
use crate::infra::console;
use crate::infra::io::{read_to_string, write_atomic};
use crate::xliff::{LoadError, XliffDocument};

#[instrument(skip_all, fields(files = args.files.len()))]
pub fn run(args: CleanupArgs, rules: &FilterRules, ctx: &AppContext) -> Result<()> {
    let mut rules = rules.clone();
    if let Some(path) = &args.comments {
        rules.comment_overrides = parse_comment_overrides(&read_to_string(path)?);
        info!(overrides = rules.comment_overrides.len(), "loaded note overrides");
    }

    for path in &args.files {
        console::status(ctx, "Cleaning", path.display());

        let mut doc = match XliffDocument::load(path) {
            Ok(doc) => doc,
            Err(LoadError::Parse(err)) => {
                console::parse_failure(err);
                bail!("aborting: {} is not a valid XLIFF document", path.display());
            }
            Err(err) => return Err(err.into()),
        };

        let report = filter::apply(&mut doc, &rules);
        info!(
            path = %path.display(),
            sections_dropped = report.sections_dropped,
            units_dropped = report.units_dropped,
            targets_backfilled = report.targets_backfilled,
            notes_overridden = report.notes_overridden,
            "filtered document"
        );

        let xml = doc
            .to_xml()
            .with_context(|| format!("Failed to serialize {}", path.display()))?;

        if ctx.dry_run {
            console::detail(ctx, format!("DRY RUN: would write {}", path.display()));
        } else {
            write_atomic(path, xml.as_bytes())?;
        }

        console::detail(
            ctx,
            format!(
                "{} sections dropped, {} strings dropped, {} targets backfilled",
                report.sections_dropped, report.units_dropped, report.targets_backfilled
            ),
        );
    }

    Ok(())
}
