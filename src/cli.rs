use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "l10n")]
#[command(about = "Localization maintenance for the Firefox for iOS XLIFF exports")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Only print warnings and errors
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Show what would be written without touching any file
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Read settings from this file instead of searching for l10nkit.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Carry translations over into a fresh copy of the reference XLIFF
    Update(UpdateArgs),

    /// Strip and backfill XLIFF sections that must not be localized
    Cleanup(CleanupArgs),

    /// Convert locale XLIFF files into Xcode .strings files
    Export(ExportArgs),

    /// Initialize an l10nkit.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Folder holding one sub-folder per locale
    pub base_folder: PathBuf,

    /// Only update these locales (folder names)
    #[arg(value_name = "LOCALE")]
    pub locales: Vec<String>,

    /// Skip locale files that fail to parse instead of aborting
    #[arg(long)]
    pub ignore_errors: bool,
}

#[derive(Args)]
pub struct CleanupArgs {
    /// XLIFF files to clean in place
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// `id=note` lines replacing the notes of matching units
    #[arg(long, value_name = "FILE")]
    pub comments: Option<PathBuf>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Folder holding one sub-folder per locale
    pub import_root: PathBuf,

    /// Root of the Xcode project receiving the .strings files
    pub export_root: PathBuf,

    /// Name of the XLIFF file inside each locale folder
    #[arg(default_value = "firefox-ios.xliff")]
    pub xliff_file: String,

    /// Skip locale files that fail to parse instead of aborting
    #[arg(long)]
    pub ignore_errors: bool,
}

#[derive(Args)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
