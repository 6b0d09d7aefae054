use eframe::egui;
use egui::text::CCursor;
use egui::text_edit::{CCursorRange, TextEditState};
use jnotepad_core::{DocumentTab, EditorBuffer};

/// 分頁編輯器元件的識別碼。 / Widget id of a tab's text area.
pub fn editor_id(tab: &DocumentTab) -> egui::Id {
    egui::Id::new(("jnotepad_editor", tab.id().0))
}

/// 將文件內容與選取同步至文字元件並顯示。 / Shows the tab's text area and copies edits and
/// selection changes back into the document.
///
/// When `push_caret` is set the document's selection is written into the
/// widget first and the widget takes focus.
pub fn show(ui: &mut egui::Ui, tab: &mut DocumentTab, push_caret: bool) {
    let id = editor_id(tab);
    if push_caret {
        store_selection(ui.ctx(), id, tab.buffer());
        ui.ctx().memory_mut(|memory| memory.request_focus(id));
    }

    let mut text = tab.text().to_string();
    let output = egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::TextEdit::multiline(&mut text)
                .id(id)
                .code_editor()
                .desired_width(f32::INFINITY)
                .desired_rows(24)
                .show(ui)
        })
        .inner;

    if output.response.changed() {
        tab.set_text(text);
    }
    if let Some(range) = output.cursor_range {
        let contents = tab.text();
        let mark = byte_offset(contents, range.secondary.ccursor.index);
        let dot = byte_offset(contents, range.primary.ccursor.index);
        tab.select(mark, dot);
    }
}

fn store_selection(ctx: &egui::Context, id: egui::Id, buffer: &EditorBuffer) {
    let contents = buffer.contents();
    let caret = buffer.caret();
    let mut state = TextEditState::load(ctx, id).unwrap_or_default();
    state.set_ccursor_range(Some(CCursorRange {
        primary: CCursor::new(char_index(contents, caret.dot())),
        secondary: CCursor::new(char_index(contents, caret.mark())),
    }));
    state.store(ctx, id);
}

/// 字元索引轉位元組位移。 / Byte offset of the `index`-th character, clamped to the end.
pub fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

/// 位元組位移轉字元索引。 / Number of characters before `offset`.
pub fn char_index(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text.char_indices()
        .take_while(|(position, _)| *position < offset)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_convert_both_ways_for_multibyte_text() {
        let text = "ač€x";
        assert_eq!(byte_offset(text, 0), 0);
        assert_eq!(byte_offset(text, 2), 3);
        assert_eq!(byte_offset(text, 3), 6);
        assert_eq!(byte_offset(text, 10), text.len());
        assert_eq!(char_index(text, 6), 3);
        assert_eq!(char_index(text, text.len()), 4);
    }
}
