//! `l10n update` against a small locale tree

mod util;

use assert_fs::prelude::*;
use l10nkit::XliffDocument;
use l10nkit::xliff::{SectionExt, TransUnitExt, units};
use predicates::prelude::*;
use util::{document, l10n, read_locale, read_raw, section, unit, write_locale};

fn target_of(doc: &XliffDocument, original: &str, id: &str) -> Option<String> {
    let section = doc.sections().find(|s| s.original() == original)?;
    let unit = units(section)
        .into_iter()
        .find(|u| u.unit_id() == Some(id))?;
    unit.targets().first().map(|t| t.text())
}

fn reference() -> String {
    document(&[section(
        "Client/Localizable.strings",
        Some("en"),
        &[
            unit("Done", "Done", Some("Done"), Some("Button title")),
            unit("Reload", "Reload page", Some("Reload page"), None),
            unit("New", "Brand new", None, None),
        ],
    )])
}

fn make_tree() -> assert_fs::TempDir {
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    write_locale(&tmp, "en-US", &reference());
    write_locale(
        &tmp,
        "fr",
        &document(&[section(
            "Client/Localizable.strings",
            Some("fr"),
            &[
                unit("Done", "Done", Some("Terminé"), None),
                // source changed upstream since this was translated
                unit("Reload", "Reload", Some("Recharger"), None),
                unit("Obsolete", "Old", Some("Vieux"), None),
            ],
        )]),
    );
    write_locale(
        &tmp,
        "sv-SE",
        &document(&[section(
            "Client/Localizable.strings",
            Some("sv-SE"),
            &[unit("Done", "Done", Some("Klar"), None)],
        )]),
    );
    tmp
}

#[test]
fn carries_translations_into_reference() {
    let tmp = make_tree();

    l10n(&tmp)
        .args(["update", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updating"));

    let fr = read_locale(&tmp, "fr");
    assert_eq!(target_of(&fr, "Client/Localizable.strings", "Done").as_deref(), Some("Terminé"));
    assert_eq!(target_of(&fr, "Client/Localizable.strings", "Reload"), None);
    assert_eq!(target_of(&fr, "Client/Localizable.strings", "New"), None);

    let section = fr.sections().next().unwrap();
    assert_eq!(section.target_language(), Some("fr"));
    // reference order and notes survive, obsolete strings do not
    let ids: Vec<_> = units(section).iter().filter_map(|u| u.unit_id()).collect();
    assert_eq!(ids, ["Done", "Reload", "New"]);
    assert_eq!(units(section)[0].notes()[0].text(), "Button title");
}

#[test]
fn applies_locale_aliases_and_exclusions() {
    let tmp = make_tree();
    let reference_before = read_raw(&tmp, "en-US");

    l10n(&tmp).args(["update", "."]).assert().success();

    let sv = read_locale(&tmp, "sv-SE");
    assert_eq!(sv.sections().next().unwrap().target_language(), Some("sv"));

    // the reference folder is excluded and never rewritten
    assert_eq!(read_raw(&tmp, "en-US"), reference_before);
}

#[test]
fn configured_reference_locale_is_never_rewritten() {
    let tmp = make_tree();
    tmp.child("l10nkit.toml")
        .write_str("[update]\nreference_locale = \"fr\"\n")
        .unwrap();
    let fr_before = read_raw(&tmp, "fr");

    l10n(&tmp).args(["update", "."]).assert().success();
    l10n(&tmp).args(["update", ".", "fr"]).assert().success();

    assert_eq!(read_raw(&tmp, "fr"), fr_before);
    let sv = read_locale(&tmp, "sv-SE");
    assert_eq!(target_of(&sv, "Client/Localizable.strings", "Done").as_deref(), Some("Klar"));
}

#[test]
fn explicit_locales_limit_the_run() {
    let tmp = make_tree();
    let sv_before = read_raw(&tmp, "sv-SE");

    l10n(&tmp).args(["update", ".", "fr"]).assert().success();

    assert_eq!(read_raw(&tmp, "sv-SE"), sv_before);
    assert_eq!(read_locale(&tmp, "fr").sections().next().unwrap().target_language(), Some("fr"));
}

#[test]
fn second_run_changes_nothing() {
    let tmp = make_tree();

    l10n(&tmp).args(["update", "."]).assert().success();
    let first = read_raw(&tmp, "fr");

    l10n(&tmp).args(["update", "."]).assert().success();
    assert_eq!(read_raw(&tmp, "fr"), first);
}

#[test]
fn dry_run_leaves_files_alone() {
    let tmp = make_tree();
    let before = read_raw(&tmp, "fr");

    l10n(&tmp)
        .args(["--dry-run", "update", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("DRY RUN"));

    assert_eq!(read_raw(&tmp, "fr"), before);
}

#[test]
fn broken_locale_aborts() {
    let tmp = make_tree();
    write_locale(&tmp, "de", "<xliff><file original=\"a\"><body></file></xliff>");

    l10n(&tmp)
        .args(["update", "."])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a valid XLIFF document"));
}

#[test]
fn broken_locale_can_be_skipped() {
    let tmp = make_tree();
    write_locale(&tmp, "de", "<xliff><file original=\"a\"><body></file></xliff>");

    l10n(&tmp)
        .args(["update", ".", "--ignore-errors"])
        .assert()
        .success();

    let fr = read_locale(&tmp, "fr");
    assert_eq!(target_of(&fr, "Client/Localizable.strings", "Done").as_deref(), Some("Terminé"));
    assert_eq!(fr.sections().next().unwrap().target_language(), Some("fr"));
}

#[test]
fn missing_base_folder_fails() {
    let tmp = assert_fs::TempDir::new().unwrap();

    l10n(&tmp)
        .args(["update", "does-not-exist"])
        .assert()
        .failure()
        .code(1);
}
