use crate::editor::EditorBuffer;

/// 文件統計資訊。 / Counts shown by the Statistics action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentStatistics {
    pub characters: usize,
    pub non_blank: usize,
    pub lines: usize,
}

impl DocumentStatistics {
    pub fn of(text: &str) -> Self {
        let mut characters = 0;
        let mut blank = 0;
        let mut newlines = 0;
        for ch in text.chars() {
            characters += 1;
            if ch.is_whitespace() {
                blank += 1;
            }
            if ch == '\n' {
                newlines += 1;
            }
        }
        let lines = if characters == 0 { 0 } else { newlines + 1 };
        Self {
            characters,
            non_blank: characters - blank,
            lines,
        }
    }
}

/// 狀態列顯示的游標資訊。 / Caret details shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    /// Document length in characters.
    pub length: usize,
    /// 1-based line of the caret.
    pub line: usize,
    /// 1-based column of the caret, in characters.
    pub column: usize,
    /// Selected characters.
    pub selection: usize,
}

impl Default for StatusInfo {
    fn default() -> Self {
        Self {
            length: 0,
            line: 1,
            column: 1,
            selection: 0,
        }
    }
}

impl StatusInfo {
    pub fn of(buffer: &EditorBuffer) -> Self {
        let dot = buffer.caret().dot();
        let line = buffer.line_of_offset(dot).unwrap_or(0);
        let column = buffer.char_column(dot).unwrap_or(0);
        let selection = buffer
            .selected_text()
            .map(|text| text.chars().count())
            .unwrap_or(0);
        Self {
            length: buffer.len_chars(),
            line: line + 1,
            column: column + 1,
            selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_count_blank_characters_and_lines() {
        let stats = DocumentStatistics::of("ab c\n\td\n");
        assert_eq!(stats.characters, 8);
        assert_eq!(stats.non_blank, 4);
        assert_eq!(stats.lines, 3);
    }

    #[test]
    fn empty_document_has_no_lines() {
        assert_eq!(DocumentStatistics::of(""), DocumentStatistics::default());
    }

    #[test]
    fn status_reports_caret_in_characters() {
        let mut buffer = EditorBuffer::new("prvi\nčćž kraj");
        buffer.select("prvi\n".len(), "prvi\nčćž".len());
        let info = StatusInfo::of(&buffer);
        assert_eq!(info.length, 13);
        assert_eq!(info.line, 2);
        assert_eq!(info.column, 4);
        assert_eq!(info.selection, 3);
    }
}
