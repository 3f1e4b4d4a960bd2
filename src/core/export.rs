//! `l10n export`: turn per-locale XLIFF files into Xcode `.strings` files.
//!
//! ```text
//! import_root/fr/firefox-ios.xliff
//!   -> export_root/Client/fr.lproj/Localizable.strings
//!   -> export_root/Extensions/ShareTo/fr.lproj/Localizable.strings   (duplicate)
//!   -> export_root/Client/fr.lproj/InfoPlist.strings
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{debug, info, instrument, warn};

use crate::cli::{AppContext, ExportArgs};
use crate::core::strings::{WriteOutcome, output_path, render_section, write_strings};
use crate::infra::config::ExportRules;
use crate::infra::console;
use crate::infra::walk::LocaleWalker;
use crate::xliff::{LoadError, SectionExt, XliffDocument};

/// Why a whole document was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("No translated files")]
    NoSections,
    #[error("Missing target-language")]
    MissingLanguage,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    /// Destinations with nothing to export (no file left behind)
    pub empty: Vec<PathBuf>,
    /// Sections not in the export list
    pub ignored_sections: usize,
}

/// Language of the whole document, taken from the first section. Some
/// exports only label the first `file` element.
pub fn document_language(doc: &XliffDocument) -> Result<&str, SkipReason> {
    let first = doc.sections().next().ok_or(SkipReason::NoSections)?;
    first.target_language().ok_or(SkipReason::MissingLanguage)
}

impl ExportRules {
    fn renamed<'a>(&'a self, original: &'a str) -> &'a str {
        self.filename_overrides
            .iter()
            .find(|o| o.from == original)
            .map_or(original, |o| o.to.as_str())
    }

    /// Section paths an exported section is written to, or `None` when the
    /// section is not exported at all.
    pub fn destinations<'a>(&'a self, original: &'a str) -> Option<Vec<&'a str>> {
        let original = self.renamed(original);
        if !self.export_all_sections && !self.files.iter().any(|f| f == original) {
            return None;
        }

        let mut out = vec![original];
        for dup in self.duplicates.iter().filter(|d| d.source == original) {
            out.extend(dup.targets.iter().map(String::as_str));
        }
        Some(out)
    }
}

/// Export every listed section of `doc`, fanning out duplicates.
pub fn export_document(
    doc: &XliffDocument,
    language: &str,
    export_root: &Path,
    rules: &ExportRules,
    dry_run: bool,
) -> Result<ExportSummary> {
    let mut summary = ExportSummary::default();

    for section in doc.sections() {
        let Some(destinations) = rules.destinations(section.original()) else {
            debug!(original = section.original(), "section not exported");
            summary.ignored_sections += 1;
            continue;
        };

        let contents = render_section(section);

        for destination in destinations {
            let path = output_path(export_root, language, destination);
            if dry_run {
                if contents.is_empty() {
                    summary.empty.push(path);
                } else {
                    summary.written.push(path);
                }
                continue;
            }
            match write_strings(&path, &contents)? {
                WriteOutcome::Written => summary.written.push(path),
                WriteOutcome::Empty => summary.empty.push(path),
            }
        }
    }

    Ok(summary)
}

#[instrument(skip_all, fields(import_root = %args.import_root.display()))]
pub fn run(args: ExportArgs, rules: &ExportRules, ctx: &AppContext) -> Result<()> {
    if !args.import_root.is_dir() {
        bail!("import path does not exist or is not a directory");
    }
    if !args.export_root.is_dir() {
        bail!("export path does not exist or is not a directory");
    }

    let files = LocaleWalker::new(args.xliff_file.as_str()).walk(&args.import_root)?;
    if files.is_empty() {
        warn!(file = %args.xliff_file, "no locale documents found");
    }

    for file in files {
        console::status(ctx, "Exporting", file.path.display());

        let doc = match XliffDocument::load(&file.path) {
            Ok(doc) => doc,
            Err(LoadError::Parse(err)) => {
                console::parse_failure(err);
                if args.ignore_errors {
                    warn!(path = %file.path.display(), "skipping unparsable document");
                    continue;
                }
                bail!("aborting: {} is not a valid XLIFF document", file.path.display());
            }
            Err(err) => return Err(err.into()),
        };

        let language = match document_language(&doc) {
            Ok(language) => language,
            Err(reason) => {
                console::problem(ctx, format!("{reason}. Skipping."));
                warn!(path = %file.path.display(), %reason, "skipping document");
                continue;
            }
        };

        let summary = export_document(&doc, language, &args.export_root, rules, ctx.dry_run)?;
        info!(
            locale = %file.locale,
            language,
            written = summary.written.len(),
            empty = summary.empty.len(),
            "exported strings"
        );

        let verb = if ctx.dry_run { "Would write" } else { "Wrote" };
        for path in &summary.written {
            console::detail(ctx, format!("{verb} {}", path.display()));
        }
        for path in &summary.empty {
            console::detail(ctx, format!("Nothing to export for {}", path.display()));
        }
    }

    Ok(())
}
