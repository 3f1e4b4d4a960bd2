//! Inject a locale's translations into the reference document.

use crate::core::index::{EntryKey, TranslationIndex};
use crate::xliff::{SectionExt, TransUnitExt, XliffDocument, units_mut};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PatchReport {
    /// Units that received a target
    pub translated: usize,
    /// Units left without a target
    pub untranslated: usize,
    /// Sections whose `target-language` was rewritten
    pub sections_relabelled: usize,
}

/// Rewrite `reference` in place so that each unit carries exactly the
/// translation `index` holds for it, or no target at all.
///
/// Sections declaring `target-language` get `locale_code`; sections without
/// the attribute are left alone.
pub fn patch_reference(
    reference: &mut XliffDocument,
    index: &TranslationIndex,
    locale_code: &str,
) -> PatchReport {
    let mut report = PatchReport::default();

    for section in reference.sections_mut() {
        let original = section.original().to_string();

        for unit in units_mut(section) {
            let key = EntryKey::new(
                &original,
                unit.unit_id().unwrap_or_default(),
                &unit.source_text(),
            );

            match index.get(&key) {
                Some(text) => {
                    unit.set_target_text(text);
                    report.translated += 1;
                }
                None => {
                    unit.remove_targets();
                    report.untranslated += 1;
                }
            }
        }

        if section.target_language().is_some() {
            section.set_attr("target-language", locale_code);
            report.sections_relabelled += 1;
        }
    }

    report
}
