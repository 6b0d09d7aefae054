use std::fs;

use jnotepad_core::clipboard::{copy, paste};
use jnotepad_core::line_ops::{convert_case, sort_lines, unique_lines};
use jnotepad_core::{
    CaseTransform, Clipboard, DocumentError, DocumentStatistics, LineCollator, SortOrder,
    StatusInfo, TabSet,
};
use tempfile::tempdir;

#[test]
fn open_edit_and_save_marks_and_clears_dirty_flag() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("notes.txt");
    fs::write(&path, "pear\napple\nčokolada\napple\n").expect("seed file");

    let mut tabs = TabSet::new();
    let id = tabs.open(&path).expect("open");
    let tab = tabs.get_mut(id).expect("tab");
    assert!(!tab.is_dirty());

    let end = tab.text().len();
    tab.select(0, end);
    let collator = LineCollator::for_language("hr");
    assert!(tab
        .edit(|buffer| sort_lines(buffer, SortOrder::Ascending, &collator))
        .expect("sort"));
    assert_eq!(tab.text(), "apple\napple\nčokolada\npear\n");
    assert!(tab.is_dirty());

    let end = tab.text().len();
    tab.select(0, end);
    assert!(tab.edit(unique_lines).expect("unique"));
    assert_eq!(tab.text(), "apple\nčokolada\npear\n");

    tab.save().expect("save");
    assert!(!tab.is_dirty());
    assert_eq!(fs::read_to_string(&path).expect("read back"), "apple\nčokolada\npear\n");
}

#[test]
fn untitled_tab_requires_save_as() {
    let dir = tempdir().expect("tempdir");
    let mut tabs = TabSet::new();
    let id = tabs.new_untitled();
    let tab = tabs.get_mut(id).expect("tab");
    tab.set_text("draft");

    assert!(matches!(tab.save(), Err(DocumentError::NoPath)));
    assert!(tab.is_dirty());

    let target = dir.path().join("draft.txt");
    tab.save_as(&target).expect("save as");
    assert_eq!(tab.path(), Some(target.as_path()));
    assert_eq!(tabs.window_title("New file"), format!("{} - JNotepad++", target.display()));
}

#[test]
fn clipboard_is_shared_between_tabs() {
    let mut tabs = TabSet::new();
    let mut clipboard = Clipboard::new();

    let source = tabs.new_untitled();
    let tab = tabs.get_mut(source).expect("source");
    tab.set_text("Hello World");
    tab.select(0, 5);
    assert!(copy(tab, &mut clipboard));

    let target = tabs.new_untitled();
    let tab = tabs.get_mut(target).expect("target");
    tab.set_text("> ");
    tab.select(2, 2);
    assert!(paste(tab, &clipboard).expect("paste"));
    assert_eq!(tab.text(), "> Hello");

    tab.select(2, 7);
    assert!(tab
        .edit(|buffer| convert_case(buffer, CaseTransform::Invert))
        .expect("invert"));
    assert_eq!(tab.text(), "> hELLO");
    assert_eq!(StatusInfo::of(tab.buffer()).selection, 5);
}

#[test]
fn statistics_and_status_reflect_the_active_tab() {
    let mut tabs = TabSet::new();
    let id = tabs.new_untitled();
    let tab = tabs.get_mut(id).expect("tab");
    tab.set_text("one two\nthree");
    tab.select(9, 9);

    let stats = DocumentStatistics::of(tab.text());
    assert_eq!(stats.characters, 13);
    assert_eq!(stats.non_blank, 11);
    assert_eq!(stats.lines, 2);

    let status = StatusInfo::of(tab.buffer());
    assert_eq!((status.length, status.line, status.column), (13, 2, 2));
}
