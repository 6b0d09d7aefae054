//! Native dialogs. Every function blocks until the user answers.

use std::path::{Path, PathBuf};

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

/// 未儲存變更時的選擇。 / Answer to the unsaved-changes question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

impl From<MessageDialogResult> for UnsavedChoice {
    fn from(result: MessageDialogResult) -> Self {
        match result {
            MessageDialogResult::Yes | MessageDialogResult::Ok => UnsavedChoice::Save,
            MessageDialogResult::No => UnsavedChoice::Discard,
            _ => UnsavedChoice::Cancel,
        }
    }
}

/// Labels for the text-file filters of the file choosers.
pub struct FileFilters<'a> {
    pub text_files: &'a str,
    pub all_files: &'a str,
}

fn file_dialog(title: &str, filters: &FileFilters<'_>) -> FileDialog {
    FileDialog::new()
        .set_title(title)
        .add_filter(filters.text_files, &["txt"])
        .add_filter(filters.all_files, &["*"])
}

pub fn pick_file_to_open(title: &str, filters: &FileFilters<'_>) -> Option<PathBuf> {
    file_dialog(title, filters).pick_file()
}

/// 另存新檔對話框，預設為目前檔名。 / Save chooser, starting from the tab's current path when it has one.
pub fn pick_save_target(
    title: &str,
    filters: &FileFilters<'_>,
    current: Option<&Path>,
) -> Option<PathBuf> {
    let mut dialog = file_dialog(title, filters);
    if let Some(current) = current {
        if let Some(directory) = current.parent() {
            dialog = dialog.set_directory(directory);
        }
        if let Some(name) = current.file_name().and_then(|name| name.to_str()) {
            dialog = dialog.set_file_name(name);
        }
    }
    dialog.save_file()
}

pub fn ask_unsaved(title: &str, description: &str) -> UnsavedChoice {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNoCancel)
        .show()
        .into()
}

/// Returns true when the user agrees to replace the existing file.
pub fn confirm_overwrite(title: &str, description: &str) -> bool {
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::YesNo)
        .show()
        == MessageDialogResult::Yes
}

pub fn show_info(title: &str, description: &str) {
    show(MessageLevel::Info, title, description);
}

pub fn show_warning(title: &str, description: &str) {
    show(MessageLevel::Warning, title, description);
}

pub fn show_error(title: &str, description: &str) {
    show(MessageLevel::Error, title, description);
}

fn show(level: MessageLevel, title: &str, description: &str) {
    MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_answers_map_to_choices() {
        assert_eq!(UnsavedChoice::from(MessageDialogResult::Yes), UnsavedChoice::Save);
        assert_eq!(UnsavedChoice::from(MessageDialogResult::No), UnsavedChoice::Discard);
        assert_eq!(
            UnsavedChoice::from(MessageDialogResult::Cancel),
            UnsavedChoice::Cancel
        );
    }
}
