use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};

/// File name written by `l10n init`.
pub const CONFIG_FILE: &str = "l10nkit.toml";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Translation merge settings
    pub update: UpdateRules,

    /// Section filter tables
    pub cleanup: FilterRules,

    /// `.strings` export tables
    pub export: ExportRules,
}

/// Locale folder whose name is not the language code Xcode expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleAlias
{
    pub directory: String,
    pub code: String,
}

/// A single `(section path, unit id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRef
{
    pub original: String,
    pub id: String,
}

/// Rename applied to a section path before export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathOverride
{
    pub from: String,
    pub to: String,
}

/// Extra destinations that receive a copy of a section's export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Duplicate
{
    pub source: String,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateRules
{
    /// Locale folder holding the canonical string list
    pub reference_locale: String,

    /// XLIFF file name inside every locale folder
    pub xliff_file: String,

    /// Locale folders never rewritten
    pub excluded_locales: Vec<String>,

    pub locale_aliases: Vec<LocaleAlias>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRules
{
    /// Section path suffix marking platform metadata sections
    pub metadata_suffix: String,

    /// Metadata sections that survive the filter
    pub keep_sections: Vec<String>,

    /// Unit ids dropped from metadata sections
    pub deny_ids: Vec<String>,

    /// Denied units kept anyway for one specific section
    pub deny_exceptions: Vec<UnitRef>,

    /// Unit ids that fall back to source text when untranslated
    pub required_ids: Vec<String>,

    /// Replacement note text keyed by unit id, loaded per run
    #[serde(skip)]
    pub comment_overrides: IndexMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportRules
{
    /// Section paths that are exported
    pub files: Vec<String>,

    /// Export every section regardless of `files`
    pub export_all_sections: bool,

    pub filename_overrides: Vec<PathOverride>,

    pub duplicates: Vec<Duplicate>,
}

fn strings(items: &[&str]) -> Vec<String>
{
    items
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for UpdateRules
{
    fn default() -> Self
    {
        let alias = |directory: &str, code: &str| LocaleAlias {
            directory: directory.to_string(),
            code: code.to_string(),
        };

        Self {
            reference_locale: "en-US".to_string(),
            xliff_file: "firefox-ios.xliff".to_string(),
            excluded_locales: strings(&["pl", "en-US"]),
            locale_aliases: vec![
                alias("bn-IN", "bn"),
                alias("ga-IE", "ga"),
                alias("nb-NO", "nb"),
                alias("nn-NO", "nn"),
                alias("sv-SE", "sv"),
            ],
        }
    }
}

impl Default for FilterRules
{
    fn default() -> Self
    {
        Self {
            metadata_suffix: "Info.plist".to_string(),
            keep_sections: strings(&[
                "Client/Info.plist",
                "Extensions/ShareTo/Info.plist",
                "Extensions/SendTo/Info.plist",
                "Extensions/Today/Info.plist",
                "Extensions/ViewLater/Info.plist",
            ]),
            deny_ids: strings(&["CFBundleDisplayName", "CFBundleName", "CFBundleShortVersionString"]),
            deny_exceptions: vec![
                UnitRef {
                    original: "Extensions/SendTo/Info.plist".to_string(),
                    id: "CFBundleDisplayName".to_string(),
                },
                UnitRef {
                    original: "Extensions/ViewLater/Info.plist".to_string(),
                    id: "CFBundleDisplayName".to_string(),
                },
            ],
            required_ids: strings(&[
                "NSCameraUsageDescription",
                "NSLocationWhenInUseUsageDescription",
                "NSMicrophoneUsageDescription",
                "NSPhotoLibraryAddUsageDescription",
                "ShortcutItemTitleNewPrivateTab",
                "ShortcutItemTitleNewTab",
                "ShortcutItemTitleQRCode",
            ]),
            comment_overrides: IndexMap::new(),
        }
    }
}

impl Default for ExportRules
{
    fn default() -> Self
    {
        let rename = |from: &str, to: &str| PathOverride { from: from.to_string(), to: to.to_string() };
        let copy = |source: &str, targets: &[&str]| Duplicate {
            source: source.to_string(),
            targets: strings(targets),
        };

        Self {
            files: strings(&[
                "Client/3DTouchActions.strings",
                "Client/AuthenticationManager.strings",
                "Client/BookmarkPanel.strings",
                "Client/BookmarkPanelDeleteConfirm.strings",
                "Client/ClearHistoryConfirm.strings",
                "Client/ClearPrivateData.strings",
                "Client/ClearPrivateDataConfirm.strings",
                "Client/ErrorPages.strings",
                "Client/FindInPage.strings",
                "Client/HistoryPanel.strings",
                "Client/Info.plist",
                "Client/Intro.strings",
                "Client/LightweightThemes.strings",
                "Client/Localizable.strings",
                "Client/LoginManager.strings",
                "Client/Menu.strings",
                "Client/PrivateBrowsing.strings",
                "Client/Search.strings",
                "Client/SendTo.strings",
                "Client/SendAnonymousUsageData.strings",
                "Client/Shared.strings",
                "Client/Storage.strings",
                "Extensions/NotificationService/Localizable.strings",
                "Extensions/ShareTo/Localizable.strings",
                "Extensions/Today/Today.strings",
                "Extensions/ShareTo/3DTouchActions.strings",
                "Extensions/ShareTo/SendTo.strings",
                "Shared/Localizable.strings",
            ]),
            export_all_sections: false,
            filename_overrides: vec![
                rename("Shared/Supporting Files/Info.plist", "Shared/Localizable.strings"),
                rename("Shared/Supporting Files/Shared.strings", "Client/Shared.strings"),
                rename("Shared/Supporting Files/Menu.strings", "Client/Menu.strings"),
                rename("Storage.strings", "Client/Storage.strings"),
            ],
            duplicates: vec![
                copy(
                    "Client/Localizable.strings",
                    &[
                        "Extensions/ShareTo/Localizable.strings",
                        "Extensions/NotificationService/Localizable.strings",
                    ],
                ),
                copy("Client/3DTouchActions.strings", &["Extensions/ShareTo/3DTouchActions.strings"]),
                copy("Client/SendTo.strings", &["Extensions/ShareTo/SendTo.strings"]),
            ],
        }
    }
}

/// Load configuration: defaults, then the first config file found (or the
/// explicit one), then `L10NKIT_*` environment variables.
pub fn load_config(explicit: Option<&Path>) -> Result<Config>
{
    let mut builder = config::Config::builder();

    match explicit
    {
        Some(path) =>
        {
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
        }
        None =>
        {
            // Load from config files in priority order
            let config_paths = ["l10nkit.toml", "l10nkit.yaml", "l10nkit.json", ".l10nkit.toml"];

            for path in &config_paths
            {
                if Path::new(path).exists()
                {
                    builder = builder.add_source(config::File::with_name(path));
                    break;
                }
            }
        }
    }

    // Add environment variables with L10NKIT_ prefix
    builder = builder.add_source(
        config::Environment::with_prefix("L10NKIT")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

/// Parse `id=comment` lines into note overrides. Blank lines and lines
/// without `=` are ignored.
pub fn parse_comment_overrides(text: &str) -> IndexMap<String, String>
{
    text.lines()
        .filter_map(|line| line.split_once('='))
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path: PathBuf = args
        .path
        .join(CONFIG_FILE);

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if ctx.dry_run
    {
        if !ctx.quiet
        {
            println!("DRY RUN: would write {}", config_path.display());
        }
        return Ok(());
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
