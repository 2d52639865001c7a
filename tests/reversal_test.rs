use lexicon_config::reversal::{self, ReversalError, xml::read_header};
use lexicon_config::writing_system::WritingSystem;
use std::fs;
use std::path::Path;

const TEMPLATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<DictionaryConfiguration name="All Reversal Indexes" version="14">
  <ConfigurationItem name="Reversal Entry" isEnabled="true"/>
</DictionaryConfiguration>
"#;

fn reversal_file(name: &str, ws: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<DictionaryConfiguration name="{}" writingSystem="{}" version="14">
  <ConfigurationItem name="Reversal Entry" isEnabled="true"/>
</DictionaryConfiguration>
"#,
        name, ws
    )
}

fn write(dir: &Path, file: &str, content: &str) {
    fs::write(dir.join(file), content).unwrap();
}

fn ws(tag: &str, name: &str) -> WritingSystem {
    WritingSystem::new(tag, name).unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_plan_classifies_files() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "AllReversalIndexes.fwdictconfig", TEMPLATE);
    write(dir.path(), "English.fwdictconfig", &reversal_file("English", "en"));
    write(dir.path(), "German.fwdictconfig", &reversal_file("German", "de"));
    write(dir.path(), "Broken.fwdictconfig", "<DictionaryConfiguration");
    write(dir.path(), "notes.txt", "not a configuration");

    let plan = reversal::plan(dir.path(), &[ws("en", "English"), ws("fr", "French")]).unwrap();

    assert_eq!(plan.template, Some(dir.path().join("AllReversalIndexes.fwdictconfig")));
    assert_eq!(plan.keep.len(), 1);
    assert_eq!(plan.keep[0].writing_system, "en");
    assert_eq!(plan.remove.len(), 1);
    assert_eq!(plan.remove[0].writing_system, "de");
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.create.len(), 1);
    assert_eq!(plan.create[0].1, dir.path().join("French.fwdictconfig"));
    assert!(!plan.is_noop());
}

#[test]
fn test_non_utf8_file_is_skipped_and_kept() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "AllReversalIndexes.fwdictconfig", TEMPLATE);
    let utf16 = dir.path().join("Spanish.fwdictconfig");
    fs::write(&utf16, [0xff, 0xfe, 0x3c, 0x00, 0x44, 0x00, 0xff, 0xdf]).unwrap();

    let plan = reversal::plan(dir.path(), &[ws("en", "English")]).unwrap();

    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].0, utf16);
    assert_eq!(plan.template, Some(dir.path().join("AllReversalIndexes.fwdictconfig")));

    reversal::apply(&plan).unwrap();
    assert!(utf16.exists());
}

#[test]
fn test_reconcile_creates_and_removes() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "AllReversalIndexes.fwdictconfig", TEMPLATE);
    write(dir.path(), "English.fwdictconfig", &reversal_file("English", "en"));
    write(dir.path(), "German.fwdictconfig", &reversal_file("German", "de"));

    let report = reversal::reconcile(dir.path(), &[ws("en", "English"), ws("fr", "French")]).unwrap();

    assert_eq!(report.created, vec![dir.path().join("French.fwdictconfig")]);
    assert_eq!(report.removed, vec![dir.path().join("German.fwdictconfig")]);
    assert_eq!(
        file_names(dir.path()),
        vec!["AllReversalIndexes.fwdictconfig", "English.fwdictconfig", "French.fwdictconfig"]
    );

    let created = fs::read_to_string(dir.path().join("French.fwdictconfig")).unwrap();
    let header = read_header(&created).unwrap();
    assert_eq!(header.name.as_deref(), Some("French"));
    assert_eq!(header.writing_system.as_deref(), Some("fr"));

    let again = reversal::plan(dir.path(), &[ws("en", "English"), ws("fr", "French")]).unwrap();
    assert!(again.is_noop());
}

#[test]
fn test_name_collision_appends_tag() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "AllReversalIndexes.fwdictconfig", TEMPLATE);
    write(dir.path(), "English.fwdictconfig", &reversal_file("English", "en"));

    let plan = reversal::plan(dir.path(), &[ws("en", "English"), ws("en-GB", "English")]).unwrap();

    assert_eq!(plan.create.len(), 1);
    assert_eq!(plan.create[0].1, dir.path().join("English (en-GB).fwdictconfig"));
}

#[test]
fn test_create_without_template_fails() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "English.fwdictconfig", &reversal_file("English", "en"));

    let plan = reversal::plan(dir.path(), &[ws("fr", "French")]).unwrap();
    let err = reversal::apply(&plan).unwrap_err();

    assert!(matches!(err, ReversalError::MissingTemplate(_)));
    assert!(dir.path().join("English.fwdictconfig").exists());
}

#[test]
fn test_missing_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");

    assert!(matches!(
        reversal::plan(&missing, &[ws("en", "English")]),
        Err(ReversalError::Io { .. })
    ));
}
