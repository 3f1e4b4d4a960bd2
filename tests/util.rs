//! Shared test utilities for integration tests
//!
//! Builds small locale trees on disk the way the l10n repository lays
//! them out: one folder per locale, each holding `firefox-ios.xliff`.

#![allow(dead_code)]

use assert_fs::prelude::*;

pub const XLIFF_FILE: &str = "firefox-ios.xliff";

/// One `<trans-unit>`; `target`/`note` are omitted when `None`.
pub fn unit(id: &str, source: &str, target: Option<&str>, note: Option<&str>) -> String
{
    let mut out = format!("      <trans-unit id=\"{id}\">\n        <source>{source}</source>\n");
    if let Some(target) = target
    {
        out.push_str(&format!("        <target>{target}</target>\n"));
    }
    if let Some(note) = note
    {
        out.push_str(&format!("        <note>{note}</note>\n"));
    }
    out.push_str("      </trans-unit>\n");
    out
}

/// One `<file>` section. Pass `None` to leave out `target-language`.
pub fn section(original: &str, language: Option<&str>, units: &[String]) -> String
{
    let language = language
        .map(|l| format!(" target-language=\"{l}\""))
        .unwrap_or_default();

    format!(
        "  <file original=\"{original}\" source-language=\"en\"{language} datatype=\"plaintext\">\n    <body>\n{}    </body>\n  </file>\n",
        units.concat()
    )
}

pub fn document(sections: &[String]) -> String
{
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xliff xmlns=\"urn:oasis:names:tc:xliff:document:1.2\" version=\"1.2\">\n{}</xliff>\n",
        sections.concat()
    )
}

/// Write `<root>/<locale>/firefox-ios.xliff`.
pub fn write_locale(
    root: &assert_fs::TempDir,
    locale: &str,
    xml: &str,
)
{
    let dir = root.child(locale);
    dir.create_dir_all()
        .expect("create locale dir");
    dir.child(XLIFF_FILE)
        .write_str(xml)
        .expect("write locale xliff");
}

/// Read a locale document back through the library parser.
pub fn read_locale(
    root: &assert_fs::TempDir,
    locale: &str,
) -> l10nkit::XliffDocument
{
    let path = root.child(locale).child(XLIFF_FILE);
    l10nkit::XliffDocument::load(path.path()).expect("parse locale xliff")
}

pub fn read_raw(
    root: &assert_fs::TempDir,
    locale: &str,
) -> String
{
    std::fs::read_to_string(root.child(locale).child(XLIFF_FILE).path()).expect("read locale xliff")
}

/// The `l10n` binary, run from an empty directory so no config file
/// is picked up.
pub fn l10n(cwd: &assert_fs::TempDir) -> assert_cmd::Command
{
    let mut cmd = assert_cmd::Command::cargo_bin("l10n").expect("bin");
    cmd.current_dir(cwd.path())
        .env("RUST_LOG", "warn")
        .arg("--no-color");
    cmd
}
