//! `l10n update`: carry existing translations over into a fresh copy of the
//! reference XLIFF for every locale folder.
//!
//! The reference locale holds the canonical string list. For each locale the
//! reference is cloned, every unit gets the locale's translation for the
//! same (section, id, source) identity or loses its target, and the result
//! replaces the locale's file.

use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, instrument, warn};

use crate::cli::{AppContext, UpdateArgs};
use crate::core::index::TranslationIndex;
use crate::core::patch::{PatchReport, patch_reference};
use crate::infra::config::{LocaleAlias, UpdateRules};
use crate::infra::console;
use crate::infra::io::write_atomic;
use crate::infra::walk::LocaleWalker;
use crate::xliff::{LoadError, XliffDocument};

/// Language code for a locale folder, after alias mapping.
pub fn locale_code<'a>(directory: &'a str, aliases: &'a [LocaleAlias]) -> &'a str {
    aliases
        .iter()
        .find(|alias| alias.directory == directory)
        .map_or(directory, |alias| alias.code.as_str())
}

/// Clone `reference` and patch it with the translations in `locale`.
pub fn merge_locale(
    reference: &XliffDocument,
    locale: &XliffDocument,
    code: &str,
) -> (XliffDocument, PatchReport) {
    let index = TranslationIndex::build(locale);
    let mut merged = reference.clone();
    let report = patch_reference(&mut merged, &index, code);
    (merged, report)
}

/// Turn a load failure into the run's fatal error, printing parse
/// diagnostics first.
fn abort(err: LoadError, path: &Path) -> anyhow::Error {
    match err {
        LoadError::Parse(err) => {
            console::parse_failure(err);
            anyhow!("aborting: {} is not a valid XLIFF document", path.display())
        }
        err => err.into(),
    }
}

#[instrument(skip_all, fields(base = %args.base_folder.display()))]
pub fn run(args: UpdateArgs, rules: &UpdateRules, ctx: &AppContext) -> Result<()> {
    let base = args
        .base_folder
        .canonicalize()
        .with_context(|| format!("base folder {} not found", args.base_folder.display()))?;

    // the reference folder is never rewritten, whatever the exclusion list says
    let walker = LocaleWalker::new(rules.xliff_file.as_str())
        .excluding(&rules.excluded_locales)
        .excluding(std::slice::from_ref(&rules.reference_locale));
    let targets = if args.locales.is_empty() {
        walker.walk(&base)?
    } else {
        walker.named(&base, &args.locales)
    };

    if targets.is_empty() {
        warn!("no locale files to update");
        console::detail(ctx, "nothing to update");
        return Ok(());
    }

    let reference_path = base.join(&rules.reference_locale).join(&rules.xliff_file);
    let reference =
        XliffDocument::load(&reference_path).map_err(|err| abort(err, &reference_path))?;
    if reference.section_count() == 0 {
        bail!("reference {} has no <file> sections", reference_path.display());
    }

    for target in &targets {
        console::status(ctx, "Updating", target.path.display());

        let locale_doc = match XliffDocument::load(&target.path) {
            Ok(doc) => doc,
            Err(LoadError::Parse(err)) if args.ignore_errors => {
                console::parse_failure(err);
                warn!(locale = %target.locale, "skipping unparsable document");
                continue;
            }
            Err(err) => return Err(abort(err, &target.path)),
        };
        if locale_doc.section_count() == 0 {
            console::problem(ctx, "No translated files. Skipping.");
            warn!(locale = %target.locale, "locale document has no sections");
            continue;
        }

        let code = locale_code(&target.locale, &rules.locale_aliases);
        let (merged, report) = merge_locale(&reference, &locale_doc, code);
        info!(
            locale = %target.locale,
            code,
            translated = report.translated,
            untranslated = report.untranslated,
            "merged translations"
        );

        let xml = merged
            .to_xml()
            .with_context(|| format!("Failed to serialize {}", target.path.display()))?;

        if ctx.dry_run {
            console::detail(ctx, format!("DRY RUN: would write {}", target.path.display()));
        } else {
            write_atomic(&target.path, xml.as_bytes())?;
        }

        console::detail(
            ctx,
            format!("{} translated, {} untranslated", report.translated, report.untranslated),
        );
    }

    Ok(())
}
