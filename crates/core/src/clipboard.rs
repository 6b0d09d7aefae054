use crate::document::DocumentTab;
use crate::editor::EditorError;

/// 應用程式內部剪貼簿。 / The application's single clipboard slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clipboard {
    contents: Option<String>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.contents = Some(text.into());
    }

    pub fn is_empty(&self) -> bool {
        self.contents.as_deref().map_or(true, str::is_empty)
    }
}

/// 複製選取文字。 / Copies the selection into the clipboard; returns `false` when nothing is selected.
pub fn copy(tab: &DocumentTab, clipboard: &mut Clipboard) -> bool {
    match tab.buffer().selected_text() {
        Some(text) => {
            clipboard.set(text);
            true
        }
        None => false,
    }
}

/// 剪下選取文字。 / Moves the selection into the clipboard.
pub fn cut(tab: &mut DocumentTab, clipboard: &mut Clipboard) -> Result<bool, EditorError> {
    if !copy(tab, clipboard) {
        return Ok(false);
    }
    tab.edit(|buffer| buffer.replace_selection(""))
}

/// 貼上剪貼簿內容，取代目前選取。 / Inserts the clipboard at the selection start, replacing the selection.
pub fn paste(tab: &mut DocumentTab, clipboard: &Clipboard) -> Result<bool, EditorError> {
    let Some(text) = clipboard.contents().filter(|text| !text.is_empty()) else {
        return Ok(false);
    };
    tab.edit(|buffer| buffer.replace_selection(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TabId;

    fn tab_with(text: &str, mark: usize, dot: usize) -> DocumentTab {
        let mut tab = DocumentTab::untitled(TabId(1));
        tab.set_text(text);
        tab.select(mark, dot);
        tab
    }

    #[test]
    fn copy_without_selection_keeps_previous_contents() {
        let mut clipboard = Clipboard::new();
        clipboard.set("old");
        let tab = tab_with("abc", 1, 1);
        assert!(!copy(&tab, &mut clipboard));
        assert_eq!(clipboard.contents(), Some("old"));
    }

    #[test]
    fn cut_then_paste_moves_text() {
        let mut clipboard = Clipboard::new();
        let mut tab = tab_with("hello world", 11, 5);
        assert!(cut(&mut tab, &mut clipboard).unwrap());
        assert_eq!(tab.text(), "hello");
        assert_eq!(clipboard.contents(), Some(" world"));
        assert!(tab.is_dirty());

        tab.select(0, 0);
        assert!(paste(&mut tab, &clipboard).unwrap());
        assert_eq!(tab.text(), " worldhello");
    }

    #[test]
    fn paste_replaces_selection() {
        let mut clipboard = Clipboard::new();
        clipboard.set("X");
        let mut tab = tab_with("abc", 0, 2);
        paste(&mut tab, &clipboard).unwrap();
        assert_eq!(tab.text(), "Xc");
    }

    #[test]
    fn empty_clipboard_paste_is_noop() {
        let clipboard = Clipboard::new();
        let mut tab = tab_with("abc", 0, 0);
        assert!(!paste(&mut tab, &clipboard).unwrap());
        assert!(!tab.is_dirty());
    }
}
