use std::ops::Range;

use thiserror::Error;

/// 以 dot/mark 表示的游標。 / A caret expressed as a moving dot and an anchored mark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Caret {
    dot: usize,
    mark: usize,
}

impl Caret {
    /// 建立無選取的游標。 / Creates a caret without a selection.
    pub fn new(position: usize) -> Self {
        Self {
            dot: position,
            mark: position,
        }
    }

    /// 建立從 mark 延伸至 dot 的選取。 / Creates a caret selecting from `mark` to `dot`.
    pub fn with_mark(mark: usize, dot: usize) -> Self {
        Self { dot, mark }
    }

    pub fn dot(&self) -> usize {
        self.dot
    }

    pub fn mark(&self) -> usize {
        self.mark
    }

    /// 取得排序後的選取範圍；空選取回傳 `None`。 / Returns the ordered selection, `None` when empty.
    pub fn selection(&self) -> Option<Selection> {
        if self.dot == self.mark {
            None
        } else {
            Some(Selection::new(self.mark, self.dot))
        }
    }
}

/// 已排序（start <= end）的位元組範圍。 / An ordered byte range within the buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    start: usize,
    end: usize,
}

impl Selection {
    /// 建立選取並自動排序端點。 / Creates a selection with automatically ordered bounds.
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// 選取的位元組長度。 / Length of the selection in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// 編輯緩衝區錯誤。 / Error conditions exposed by the editing buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("offset {offset} is out of bounds for buffer of length {len}")]
    OutOfBounds { offset: usize, len: usize },
    #[error("offset {offset} does not fall on a character boundary")]
    NotCharBoundary { offset: usize },
    #[error("line {line} does not exist (buffer has {count} lines)")]
    LineOutOfBounds { line: usize, count: usize },
}

/// 單一游標的文字緩衝區。 / Text buffer with a single caret and optional selection.
///
/// Offsets are byte offsets into the UTF-8 contents and always sit on
/// character boundaries.
#[derive(Debug, Clone, Default)]
pub struct EditorBuffer {
    contents: String,
    caret: Caret,
}

impl EditorBuffer {
    /// 建立緩衝區，游標位於開頭。 / Creates a buffer with the caret at the start.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            contents: text.into(),
            caret: Caret::default(),
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// 文件長度（字元數）。 / Document length in characters.
    pub fn len_chars(&self) -> usize {
        self.contents.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn caret(&self) -> Caret {
        self.caret
    }

    pub fn selection(&self) -> Option<Selection> {
        self.caret.selection()
    }

    pub fn has_selection(&self) -> bool {
        self.caret.selection().is_some()
    }

    /// 移動游標並清除選取。 / Moves the caret, dropping any selection.
    pub fn set_caret(&mut self, position: usize) {
        let position = self.snap(position);
        self.caret = Caret::new(position);
    }

    /// 設定選取範圍；位置會被夾限並對齊字元邊界。 / Selects from `mark` to `dot`, clamped and snapped to char boundaries.
    pub fn select(&mut self, mark: usize, dot: usize) {
        let mark = self.snap(mark);
        let dot = self.snap(dot);
        self.caret = Caret::with_mark(mark, dot);
    }

    pub fn select_all(&mut self) {
        self.caret = Caret::with_mark(0, self.contents.len());
    }

    /// 取得選取的文字。 / Returns the selected text, if any.
    pub fn selected_text(&self) -> Option<&str> {
        self.selection()
            .map(|selection| &self.contents[selection.range()])
    }

    /// 取代整份內容，游標移至開頭。 / Replaces the whole contents and resets the caret.
    pub fn set_contents(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        let changed = self.contents != text;
        self.contents = text;
        self.caret = Caret::default();
        changed
    }

    /// 在指定位置插入文字。 / Inserts `text` at `offset`; the caret lands after the insertion.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<bool, EditorError> {
        self.replace_range(offset..offset, text)
    }

    /// 刪除指定範圍。 / Removes the given range; the caret lands at its start.
    pub fn remove(&mut self, range: Range<usize>) -> Result<bool, EditorError> {
        self.replace_range(range, "")
    }

    /// 以文字取代範圍，回傳內容是否改變。 / Replaces `range` with `text`, reporting whether the contents changed.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) -> Result<bool, EditorError> {
        let selection = Selection::new(range.start, range.end);
        self.check_offset(selection.start())?;
        self.check_offset(selection.end())?;
        if &self.contents[selection.range()] == text {
            return Ok(false);
        }
        self.contents.replace_range(selection.range(), text);
        self.caret = Caret::new(selection.start() + text.len());
        Ok(true)
    }

    /// 以文字取代選取（無選取時於游標插入）。 / Replaces the selection, or inserts at the caret when nothing is selected.
    pub fn replace_selection(&mut self, text: &str) -> Result<bool, EditorError> {
        let range = match self.selection() {
            Some(selection) => selection.range(),
            None => self.caret.dot()..self.caret.dot(),
        };
        self.replace_range(range, text)
    }

    /// 行數；空文件視為一行。 / Number of lines; an empty buffer has one line.
    pub fn line_count(&self) -> usize {
        self.contents.bytes().filter(|byte| *byte == b'\n').count() + 1
    }

    /// 取得位移所在的行（0 起算）。 / Returns the zero-based line containing `offset`.
    pub fn line_of_offset(&self, offset: usize) -> Result<usize, EditorError> {
        self.check_bounds(offset)?;
        Ok(self.contents.as_bytes()[..offset]
            .iter()
            .filter(|byte| **byte == b'\n')
            .count())
    }

    /// 行首位移。 / Byte offset where `line` starts.
    pub fn line_start_offset(&self, line: usize) -> Result<usize, EditorError> {
        if line == 0 {
            return Ok(0);
        }
        self.contents
            .match_indices('\n')
            .nth(line - 1)
            .map(|(idx, _)| idx + 1)
            .ok_or(EditorError::LineOutOfBounds {
                line,
                count: self.line_count(),
            })
    }

    /// 行尾位移，包含換行字元。 / Byte offset where `line` ends, including its newline.
    pub fn line_end_offset(&self, line: usize) -> Result<usize, EditorError> {
        let start = self.line_start_offset(line)?;
        Ok(match self.contents[start..].find('\n') {
            Some(idx) => start + idx + 1,
            None => self.contents.len(),
        })
    }

    /// 位移所在行內的字元欄位（0 起算）。 / Zero-based column of `offset`, counted in characters.
    pub fn char_column(&self, offset: usize) -> Result<usize, EditorError> {
        self.check_offset(offset)?;
        let line = self.line_of_offset(offset)?;
        let start = self.line_start_offset(line)?;
        Ok(self.contents[start..offset].chars().count())
    }

    fn check_bounds(&self, offset: usize) -> Result<(), EditorError> {
        if offset > self.contents.len() {
            return Err(EditorError::OutOfBounds {
                offset,
                len: self.contents.len(),
            });
        }
        Ok(())
    }

    fn check_offset(&self, offset: usize) -> Result<(), EditorError> {
        self.check_bounds(offset)?;
        if !self.contents.is_char_boundary(offset) {
            return Err(EditorError::NotCharBoundary { offset });
        }
        Ok(())
    }

    fn snap(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.contents.len());
        while !self.contents.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_orders_dot_and_mark() {
        let mut buffer = EditorBuffer::new("alpha beta");
        buffer.select(10, 6);
        let selection = buffer.selection().unwrap();
        assert_eq!((selection.start(), selection.end()), (6, 10));
        assert_eq!(buffer.selected_text(), Some("beta"));
        assert_eq!(buffer.caret().dot(), 6);
    }

    #[test]
    fn select_snaps_to_char_boundaries() {
        let mut buffer = EditorBuffer::new("čaša");
        buffer.select(0, 1);
        assert!(!buffer.has_selection());
        buffer.select(0, 99);
        assert_eq!(buffer.selected_text(), Some("čaša"));
    }

    #[test]
    fn replace_range_reports_changes() {
        let mut buffer = EditorBuffer::new("abc");
        assert!(!buffer.replace_range(0..1, "a").unwrap());
        assert!(buffer.replace_range(0..1, "xy").unwrap());
        assert_eq!(buffer.contents(), "xybc");
        assert_eq!(buffer.caret().dot(), 2);
    }

    #[test]
    fn replace_range_rejects_split_characters() {
        let mut buffer = EditorBuffer::new("ž");
        assert_eq!(
            buffer.insert(1, "x"),
            Err(EditorError::NotCharBoundary { offset: 1 })
        );
        assert_eq!(
            buffer.remove(0..5),
            Err(EditorError::OutOfBounds { offset: 5, len: 2 })
        );
    }

    #[test]
    fn replace_selection_inserts_at_caret_without_selection() {
        let mut buffer = EditorBuffer::new("ac");
        buffer.set_caret(1);
        buffer.replace_selection("b").unwrap();
        assert_eq!(buffer.contents(), "abc");
        buffer.select(0, 2);
        buffer.replace_selection("").unwrap();
        assert_eq!(buffer.contents(), "c");
    }

    #[test]
    fn line_geometry() {
        let buffer = EditorBuffer::new("one\ntwo\n\nfour");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.line_of_offset(0).unwrap(), 0);
        assert_eq!(buffer.line_of_offset(4).unwrap(), 1);
        assert_eq!(buffer.line_of_offset(9).unwrap(), 3);
        assert_eq!(buffer.line_start_offset(2).unwrap(), 8);
        assert_eq!(buffer.line_end_offset(1).unwrap(), 8);
        assert_eq!(buffer.line_end_offset(3).unwrap(), 13);
        assert_eq!(
            buffer.line_start_offset(4),
            Err(EditorError::LineOutOfBounds { line: 4, count: 4 })
        );
    }

    #[test]
    fn char_column_counts_characters() {
        let buffer = EditorBuffer::new("x\nšđ!");
        assert_eq!(buffer.char_column("x\nšđ".len()).unwrap(), 2);
    }
}
