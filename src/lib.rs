//! **l10nkit** - Localization maintenance for an iOS app's XLIFF exports
//!
//! Merges translations into fresh reference exports, filters sections that
//! must not be localized, and writes Xcode `.strings` files per locale.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// XLIFF 1.2 document model
pub mod xliff {
    /// Order-preserving element tree on top of quick-xml
    pub mod tree;

    pub mod document;
    pub use document::*;
}

/// Core pipeline - translation carry-over, section filtering, export
pub mod core {
    /// (section, id, source digest) keyed translation lookup
    pub mod index;
    pub use index::{EntryKey, TranslationIndex, source_digest};

    /// Patch a reference document from a translation index
    pub mod patch;
    pub use patch::{PatchReport, patch_reference};

    /// Ordered section filter rules
    pub mod filter;
    pub use filter::FilterReport;

    /// `.strings` rendering and output paths
    pub mod strings;

    pub mod update;
    pub use update::run as update_run;

    pub mod cleanup;
    pub use cleanup::run as cleanup_run;

    pub mod export;
    pub use export::run as export_run;
}

/// Infrastructure - Configuration, I/O, and utilities
pub mod infra {
    /// Layered configuration: defaults, config file, environment
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Atomic writes and small file helpers
    pub mod io;

    /// Locale folder discovery
    pub mod walk;
    pub use walk::{LocaleFile, LocaleWalker};

    /// Per-file status lines on the terminal
    pub mod console;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use crate::core::{cleanup_run, export_run, update_run};
pub use infra::{Config, LocaleWalker, load_config};

pub use xliff::{ParseError, XliffDocument};
