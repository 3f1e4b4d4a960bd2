//! Section filter: prune metadata sections and strings that must not be
//! translated, and make sure required strings always have a target.
//!
//! Rules run in a fixed order and each sees the result of the previous one:
//!
//! 1. drop metadata sections (path ends in the metadata suffix) not kept
//! 2. drop denied unit ids from metadata sections, minus exact exceptions
//! 3. backfill required ids that have no target with their source text
//! 4. drop metadata sections left without units
//! 5. apply note overrides

use crate::infra::config::FilterRules;
use crate::xliff::tree::Element;
use crate::xliff::{SectionExt, TransUnitExt, XliffDocument, retain_units, units, units_mut};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterReport {
    pub sections_dropped: usize,
    pub units_dropped: usize,
    pub targets_backfilled: usize,
    pub notes_overridden: usize,
}

impl FilterReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

impl FilterRules {
    fn is_metadata(&self, section: &Element) -> bool {
        section.original().ends_with(self.metadata_suffix.as_str())
    }

    fn keeps_section(&self, original: &str) -> bool {
        self.keep_sections.iter().any(|kept| kept == original)
    }

    fn denies(&self, original: &str, id: &str) -> bool {
        self.deny_ids.iter().any(|denied| denied == id)
            && !self
                .deny_exceptions
                .iter()
                .any(|ex| ex.original == original && ex.id == id)
    }

    fn requires(&self, id: &str) -> bool {
        self.required_ids.iter().any(|required| required == id)
    }
}

/// Apply every rule to `doc` in place.
pub fn apply(doc: &mut XliffDocument, rules: &FilterRules) -> FilterReport {
    let mut report = FilterReport::default();

    // 1. unwanted metadata sections
    report.sections_dropped += doc.retain_sections(|section| {
        !rules.is_metadata(section) || rules.keeps_section(section.original())
    });

    // 2. denied strings in the surviving metadata sections
    for section in doc.sections_mut() {
        if !rules.is_metadata(section) {
            continue;
        }
        let original = section.original().to_string();
        report.units_dropped += retain_units(section, &mut |unit: &Element| {
            !rules.denies(&original, unit.unit_id().unwrap_or_default())
        });
    }

    // 3. required strings fall back to the source language
    for section in doc.sections_mut() {
        for unit in units_mut(section) {
            let required = unit.unit_id().is_some_and(|id| rules.requires(id));
            if required && !unit.has_target() {
                let source = unit.source_text();
                unit.set_target_text(&source);
                report.targets_backfilled += 1;
            }
        }
    }

    // 4. metadata sections emptied by rule 2
    report.sections_dropped += doc.retain_sections(|section| {
        !rules.is_metadata(section) || !units(section).is_empty()
    });

    // 5. note overrides
    if !rules.comment_overrides.is_empty() {
        for section in doc.sections_mut() {
            for unit in units_mut(section) {
                let Some(note) = unit
                    .unit_id()
                    .and_then(|id| rules.comment_overrides.get(id))
                    .cloned()
                else {
                    continue;
                };
                if unit.set_note_text(&note) {
                    report.notes_overridden += 1;
                }
            }
        }
    }

    report
}
