//! Xcode `.strings` rendering for one XLIFF section.
//!
//! Output is a flat list of `"key" = "value";` blocks separated by blank
//! lines, each optionally preceded by a `/* note */` comment. Only double
//! quotes are escaped. Backslashes and newlines pass through untouched,
//! which matches what the build has always consumed.

use std::path::{Component, Path, PathBuf};

use anyhow::Result;

use crate::infra::io::{remove_if_exists, write_atomic};
use crate::xliff::tree::Element;
use crate::xliff::{TransUnitExt, units};

fn escape(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Render every unit that has an id and exactly one non-empty target.
pub fn render_section(section: &Element) -> String {
    let mut out = String::new();

    for unit in units(section) {
        let Some(id) = unit.unit_id() else { continue };
        let targets = unit.targets();
        let [target] = targets.as_slice() else { continue };
        let value = target.text();
        if value.is_empty() {
            continue;
        }

        if let [note] = unit.notes().as_slice() {
            out.push_str(&format!("/* {} */\n", note.text()));
        }
        out.push_str(&format!("\"{}\" = \"{}\";\n\n", escape(id), escape(&value)));
    }

    out
}

/// Map a section path to `<export_root>/<dir>/<language>.lproj/<file>`.
///
/// `Info.plist` becomes `InfoPlist.strings`; storyboards and xibs become
/// `.strings` files and lose their `Base.lproj` folder. Only plain path
/// segments of `original` are used, so it can't escape `export_root`.
pub fn output_path(export_root: &Path, language: &str, original: &str) -> PathBuf {
    let original = Path::new(original);
    let file_name = original
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let interface_file = file_name.ends_with(".storyboard") || file_name.ends_with(".xib");
    let file_name = if file_name == "Info.plist" {
        "InfoPlist.strings".to_string()
    } else if interface_file {
        Path::new(&file_name)
            .with_extension("strings")
            .to_string_lossy()
            .into_owned()
    } else {
        file_name
    };

    let mut path = export_root.to_path_buf();
    for component in original.parent().into_iter().flat_map(Path::components) {
        if let Component::Normal(segment) = component {
            if interface_file && segment == "Base.lproj" {
                continue;
            }
            path.push(segment);
        }
    }

    path.push(format!("{language}.lproj"));
    path.push(file_name);
    path
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Nothing to export; no file is left at the destination
    Empty,
}

/// Write rendered contents, or make sure no file exists when empty. Xcode
/// rejects zero-length `.strings` files.
pub fn write_strings(path: &Path, contents: &str) -> Result<WriteOutcome> {
    if contents.is_empty() {
        if remove_if_exists(path)? {
            tracing::debug!(path = %path.display(), "removed stale empty strings file");
        }
        return Ok(WriteOutcome::Empty);
    }

    write_atomic(path, contents.as_bytes())?;
    Ok(WriteOutcome::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xliff::XliffDocument;

    fn section(body: &str) -> XliffDocument {
        let text = format!(
            r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2"><file original="Client/Localizable.strings" target-language="fr"><body>{body}</body></file></xliff>"#
        );
        XliffDocument::parse("s.xliff", &text).unwrap()
    }

    fn render(body: &str) -> String {
        let doc = section(body);
        render_section(doc.sections().next().unwrap())
    }

    #[test]
    fn escapes_quotes_in_key_and_value() {
        let out = render(
            r#"<trans-unit id="Say &quot;hi&quot;"><source>x</source><target>He said "hi"</target></trans-unit>"#,
        );

        assert_eq!(out, "\"Say \\\"hi\\\"\" = \"He said \\\"hi\\\"\";\n\n");
    }

    #[test]
    fn writes_note_as_comment() {
        let out = render(
            r#"<trans-unit id="Done"><source>Done</source><target>Terminé</target><note>Button title</note></trans-unit>"#,
        );

        assert_eq!(out, "/* Button title */\n\"Done\" = \"Terminé\";\n\n");
    }

    #[test]
    fn skips_units_without_usable_target() {
        let out = render(
            r#"<trans-unit id="None"><source>a</source></trans-unit>
               <trans-unit id="Empty"><source>b</source><target></target></trans-unit>
               <trans-unit id="Two"><source>c</source><target>1</target><target>2</target></trans-unit>
               <trans-unit><source>d</source><target>no id</target></trans-unit>
               <trans-unit id="Ok"><source>e</source><target>fine</target></trans-unit>"#,
        );

        assert_eq!(out, "\"Ok\" = \"fine\";\n\n");
    }

    #[test]
    fn backslashes_and_newlines_are_not_escaped() {
        let out = render(r#"<trans-unit id="k"><source>s</source><target>a\nb</target></trans-unit>"#);
        assert_eq!(out, "\"k\" = \"a\\nb\";\n\n");
    }

    #[test]
    fn maps_section_paths() {
        let root = Path::new("/out");

        assert_eq!(
            output_path(root, "fr", "Client/Localizable.strings"),
            Path::new("/out/Client/fr.lproj/Localizable.strings")
        );
        assert_eq!(
            output_path(root, "fr", "Extensions/Today/Info.plist"),
            Path::new("/out/Extensions/Today/fr.lproj/InfoPlist.strings")
        );
        assert_eq!(
            output_path(root, "de", "lockbox-ios/Storyboard/Base.lproj/SetupAutofill.storyboard"),
            Path::new("/out/lockbox-ios/Storyboard/de.lproj/SetupAutofill.strings")
        );
        assert_eq!(
            output_path(root, "de", "Views/Base.lproj/Cell.xib"),
            Path::new("/out/Views/de.lproj/Cell.strings")
        );
        assert_eq!(
            output_path(root, "de", "Storage.strings"),
            Path::new("/out/de.lproj/Storage.strings")
        );
        assert_eq!(
            output_path(root, "de", "../../etc/Evil.strings"),
            Path::new("/out/etc/de.lproj/Evil.strings")
        );
    }

    #[test]
    fn empty_output_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Client/fr.lproj/Menu.strings");

        assert_eq!(write_strings(&path, "").unwrap(), WriteOutcome::Empty);
        assert!(!path.exists());

        write_strings(&path, "\"a\" = \"b\";\n\n").unwrap();
        assert!(path.exists());

        // A later empty export removes the stale file
        assert_eq!(write_strings(&path, "").unwrap(), WriteOutcome::Empty);
        assert!(!path.exists());
    }
}
