//! `l10n cleanup` over a realistic export

mod util;

use assert_fs::prelude::*;
use l10nkit::XliffDocument;
use l10nkit::xliff::{SectionExt, TransUnitExt, units};
use predicates::prelude::*;
use util::{document, l10n, section, unit};

fn export() -> String {
    document(&[
        section(
            "Client/Info.plist",
            Some("fr"),
            &[
                unit("CFBundleName", "Firefox", None, None),
                unit("NSCameraUsageDescription", "Camera access", None, Some("Camera prompt")),
                unit("ShortcutItemTitleNewTab", "New Tab", Some("Nouvel onglet"), None),
            ],
        ),
        section(
            "Extensions/SendTo/Info.plist",
            Some("fr"),
            &[unit("CFBundleDisplayName", "Send Tab", Some("Envoyer"), None)],
        ),
        section(
            "Extensions/Today/Info.plist",
            Some("fr"),
            &[unit("CFBundleDisplayName", "Today", None, None)],
        ),
        section(
            "Extensions/Unknown/Info.plist",
            Some("fr"),
            &[unit("NSCameraUsageDescription", "Camera", None, None)],
        ),
        section(
            "Client/Localizable.strings",
            Some("fr"),
            &[unit("Done", "Done", Some("Terminé"), Some("Old note"))],
        ),
    ])
}

fn originals(doc: &XliffDocument) -> Vec<String> {
    doc.sections().map(|s| s.original().to_string()).collect()
}

#[test]
fn filters_sections_and_backfills() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let file = tmp.child("fr.xliff");
    file.write_str(&export()).unwrap();

    l10n(&tmp)
        .args(["cleanup", "fr.xliff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleaning"));

    let doc = XliffDocument::load(file.path()).unwrap();
    assert_eq!(
        originals(&doc),
        ["Client/Info.plist", "Extensions/SendTo/Info.plist", "Client/Localizable.strings"]
    );

    let client = doc.sections().next().unwrap();
    let ids: Vec<_> = units(client).iter().filter_map(|u| u.unit_id()).collect();
    assert_eq!(ids, ["NSCameraUsageDescription", "ShortcutItemTitleNewTab"]);
    // source copied verbatim, existing translation untouched
    assert_eq!(units(client)[0].targets()[0].text(), "Camera access");
    assert_eq!(units(client)[1].targets()[0].text(), "Nouvel onglet");

    // the SendTo display name is an allowed exception
    let send_to = doc.sections().nth(1).unwrap();
    assert_eq!(units(send_to)[0].unit_id(), Some("CFBundleDisplayName"));
}

#[test]
fn comments_file_overrides_notes() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let file = tmp.child("fr.xliff");
    file.write_str(&export()).unwrap();
    tmp.child("comments.txt")
        .write_str("Done=Toolbar button, keep short\nNSCameraUsageDescription = Asked before scanning a QR code\nnot a mapping\n")
        .unwrap();

    l10n(&tmp)
        .args(["cleanup", "--comments", "comments.txt", "fr.xliff"])
        .assert()
        .success();

    let doc = XliffDocument::load(file.path()).unwrap();
    let notes: Vec<String> = doc
        .sections()
        .flat_map(|s| units(s))
        .flat_map(|u| u.notes().into_iter().map(|n| n.text()).collect::<Vec<_>>())
        .collect();
    assert_eq!(notes, ["Asked before scanning a QR code", "Toolbar button, keep short"]);
}

#[test]
fn cleaning_twice_is_stable() {
    let tmp = assert_fs::TempDir::new().unwrap();
    let file = tmp.child("fr.xliff");
    file.write_str(&export()).unwrap();

    l10n(&tmp).args(["cleanup", "fr.xliff"]).assert().success();
    let first = std::fs::read_to_string(file.path()).unwrap();

    l10n(&tmp).args(["cleanup", "fr.xliff"]).assert().success();
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), first);
}

#[test]
fn unparsable_file_is_fatal() {
    let tmp = assert_fs::TempDir::new().unwrap();
    tmp.child("bad.xliff").write_str("<xliff><file>").unwrap();

    l10n(&tmp)
        .args(["cleanup", "bad.xliff"])
        .assert()
        .failure()
        .code(1);
}
