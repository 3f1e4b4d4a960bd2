//! Filepath: src/infra/walk.rs
//! Locale folder discovery.
//!
//! A localization root holds one folder per locale, each with the same
//! XLIFF file name inside (`fr/firefox-ios.xliff`, `de/firefox-ios.xliff`).
//! Backed by the `ignore` crate walker with all ignore-file filtering off,
//! since l10n repositories commit files that a `.gitignore` may mask.
//! Results are sorted by path for deterministic processing order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ignore::WalkBuilder;

/// One `<root>/<locale>/<file>` hit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocaleFile
{
    /// Folder name, before any alias mapping
    pub locale: String,
    pub path: PathBuf,
}

pub struct LocaleWalker
{
    /// File name expected inside each locale folder
    file_name: String,

    /// Folder names to skip
    excluded: Vec<String>,
}

impl LocaleWalker
{
    pub fn new(file_name: impl Into<String>) -> Self
    {
        Self { file_name: file_name.into(), excluded: Vec::new() }
    }

    /// Skip these locale folders entirely.
    pub fn excluding(
        mut self,
        locales: &[String],
    ) -> Self
    {
        self.excluded
            .extend(locales.iter().cloned());
        self
    }

    /// Every locale folder directly under `root` holding the file.
    pub fn walk(
        &self,
        root: &Path,
    ) -> Result<Vec<LocaleFile>>
    {
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .max_depth(Some(2))
            .build();

        let mut found = Vec::new();

        for entry in walker
        {
            let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;

            if entry.depth() != 2
                || !entry
                    .file_type()
                    .is_some_and(|t| t.is_file())
                || entry.file_name() != self.file_name.as_str()
            {
                continue;
            }

            let Some(locale) = entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
            else
            {
                continue;
            };

            if self.excluded.contains(&locale)
            {
                continue;
            }

            found.push(LocaleFile { locale, path: entry.into_path() });
        }

        found.sort();
        Ok(found)
    }

    /// Resolve explicitly named locales without scanning. Missing files are
    /// reported later, when the document is opened.
    pub fn named(
        &self,
        root: &Path,
        locales: &[String],
    ) -> Vec<LocaleFile>
    {
        let mut found: Vec<LocaleFile> = locales
            .iter()
            .filter(|locale| !self.excluded.contains(locale))
            .map(|locale| LocaleFile {
                locale: locale.clone(),
                path: root
                    .join(locale)
                    .join(&self.file_name),
            })
            .collect();

        found.sort();
        found.dedup();
        found
    }
}
