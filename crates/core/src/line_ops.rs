use std::collections::HashSet;
use std::ops::Range;

use crate::collation::LineCollator;
use crate::editor::{EditorBuffer, EditorError};

/// 大小寫轉換模式。 / Case conversions offered by the Tools menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseTransform {
    Upper,
    Lower,
    Invert,
}

/// 行排序方向。 / Direction for line sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// 對選取文字進行大小寫轉換，轉換後保持選取。 / Converts the case of the selected text and keeps it selected.
///
/// Does nothing when there is no selection.
pub fn convert_case(
    buffer: &mut EditorBuffer,
    transform: CaseTransform,
) -> Result<bool, EditorError> {
    let Some(selection) = buffer.selection() else {
        return Ok(false);
    };

    let target = &buffer.contents()[selection.range()];
    let converted = match transform {
        CaseTransform::Upper => target.to_uppercase(),
        CaseTransform::Lower => target.to_lowercase(),
        CaseTransform::Invert => invert_case(target),
    };

    let changed = buffer.replace_range(selection.range(), &converted)?;
    buffer.select(selection.start(), selection.start() + converted.len());
    Ok(changed)
}

/// 依語系排序選取所涵蓋的整行。 / Sorts every whole line touched by the selection using `collator`.
pub fn sort_lines(
    buffer: &mut EditorBuffer,
    order: SortOrder,
    collator: &LineCollator,
) -> Result<bool, EditorError> {
    let block = LineBlock::around_selection(buffer)?;
    let mut lines = block.lines();
    if lines.len() <= 1 {
        return Ok(false);
    }

    lines.sort_by(|a, b| match order {
        SortOrder::Ascending => collator.compare(a, b),
        SortOrder::Descending => collator.compare(b, a),
    });
    let joined = block.join(&lines);
    block.apply(buffer, &joined)
}

/// 移除重複行，保留第一次出現的順序。 / Drops repeated lines, keeping the first occurrence of each.
pub fn unique_lines(buffer: &mut EditorBuffer) -> Result<bool, EditorError> {
    let block = LineBlock::around_selection(buffer)?;
    let lines = block.lines();
    if lines.len() <= 1 {
        return Ok(false);
    }

    let mut seen = HashSet::new();
    let kept: Vec<&str> = lines
        .into_iter()
        .filter(|line| seen.insert(*line))
        .collect();
    let joined = block.join(&kept);
    block.apply(buffer, &joined)
}

fn invert_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_lowercase() {
            result.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

/// 選取涵蓋的完整行區塊。 / The run of whole lines touched by the selection (or the caret line).
///
/// Line terminators belong to their position in the block, so a sorted or
/// filtered block keeps the same mix of `\r\n` and `\n` endings.
struct LineBlock {
    range: Range<usize>,
    text: String,
    terminators: Vec<&'static str>,
}

impl LineBlock {
    fn around_selection(buffer: &EditorBuffer) -> Result<Self, EditorError> {
        let (start, end) = match buffer.selection() {
            Some(selection) => (selection.start(), selection.end()),
            None => (buffer.caret().dot(), buffer.caret().dot()),
        };

        let first = buffer.line_of_offset(start)?;
        let last = buffer.line_of_offset(end)?;
        let block_start = buffer.line_start_offset(first)?;
        let block_end = buffer.line_end_offset(last)?;

        let text = buffer.contents()[block_start..block_end].to_string();
        let terminators = text
            .split_inclusive('\n')
            .map(|segment| {
                if segment.ends_with("\r\n") {
                    "\r\n"
                } else if segment.ends_with('\n') {
                    "\n"
                } else {
                    ""
                }
            })
            .collect();
        Ok(Self {
            range: block_start..block_end,
            text,
            terminators,
        })
    }

    fn lines(&self) -> Vec<&str> {
        self.text
            .split_inclusive('\n')
            .zip(&self.terminators)
            .map(|(segment, terminator)| &segment[..segment.len() - terminator.len()])
            .collect()
    }

    /// The last line always takes the block's final terminator.
    fn join(&self, lines: &[&str]) -> String {
        let last = self.terminators.last().copied().unwrap_or("");
        let mut joined = String::with_capacity(self.text.len());
        for (index, line) in lines.iter().enumerate() {
            joined.push_str(line);
            if index + 1 == lines.len() {
                joined.push_str(last);
            } else {
                joined.push_str(self.terminators.get(index).copied().unwrap_or(last));
            }
        }
        joined
    }

    fn apply(&self, buffer: &mut EditorBuffer, replacement: &str) -> Result<bool, EditorError> {
        let changed = buffer.replace_range(self.range.clone(), replacement)?;
        buffer.select(self.range.start, self.range.start + replacement.len());
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with_selection(text: &str, start: usize, end: usize) -> EditorBuffer {
        let mut buffer = EditorBuffer::new(text);
        buffer.select(start, end);
        buffer
    }

    #[test]
    fn case_conversion_requires_selection() {
        let mut buffer = EditorBuffer::new("Hello");
        assert!(!convert_case(&mut buffer, CaseTransform::Upper).unwrap());
        assert_eq!(buffer.contents(), "Hello");
    }

    #[test]
    fn case_conversion_touches_only_selection() {
        let mut buffer = buffer_with_selection("hello world", 6, 11);
        assert!(convert_case(&mut buffer, CaseTransform::Upper).unwrap());
        assert_eq!(buffer.contents(), "hello WORLD");
        assert_eq!(buffer.selected_text(), Some("WORLD"));

        convert_case(&mut buffer, CaseTransform::Lower).unwrap();
        assert_eq!(buffer.contents(), "hello world");
    }

    #[test]
    fn invert_case_leaves_uncased_characters() {
        let mut buffer = buffer_with_selection("Šta 42 Je?", 0, "Šta 42 Je?".len());
        convert_case(&mut buffer, CaseTransform::Invert).unwrap();
        assert_eq!(buffer.contents(), "šTA 42 jE?");
    }

    #[test]
    fn sort_expands_selection_to_whole_lines() {
        let text = "zeta\nbeta\nalpha\ngamma\n";
        // Selection starts mid "beta" and ends mid "alpha".
        let mut buffer = buffer_with_selection(text, 7, 12);
        let collator = LineCollator::for_language("en");
        assert!(sort_lines(&mut buffer, SortOrder::Ascending, &collator).unwrap());
        assert_eq!(buffer.contents(), "zeta\nalpha\nbeta\ngamma\n");
    }

    #[test]
    fn sort_descending_keeps_trailing_newline_and_crlf() {
        let text = "b\r\nc\r\na\r\n";
        let mut buffer = buffer_with_selection(text, 0, text.len());
        let collator = LineCollator::for_language("en");
        sort_lines(&mut buffer, SortOrder::Descending, &collator).unwrap();
        assert_eq!(buffer.contents(), "c\r\nb\r\na\r\n");
    }

    #[test]
    fn selection_ending_at_line_start_includes_that_line() {
        let text = "c\nb\na";
        let mut buffer = buffer_with_selection(text, 0, 4);
        let collator = LineCollator::ordinal();
        sort_lines(&mut buffer, SortOrder::Ascending, &collator).unwrap();
        assert_eq!(buffer.contents(), "a\nb\nc");
    }

    #[test]
    fn mixed_line_endings_stay_in_place() {
        let text = "b\r\nc\na";
        let mut buffer = buffer_with_selection(text, 0, text.len());
        let collator = LineCollator::ordinal();
        sort_lines(&mut buffer, SortOrder::Ascending, &collator).unwrap();
        assert_eq!(buffer.contents(), "a\r\nb\nc");

        let text = "x\ny\r\nx\r\n";
        let mut buffer = buffer_with_selection(text, 0, text.len());
        assert!(unique_lines(&mut buffer).unwrap());
        assert_eq!(buffer.contents(), "x\ny\r\n");
    }

    #[test]
    fn sort_uses_locale_collation() {
        let text = "dan\nčaj\ncvijet";
        let mut buffer = buffer_with_selection(text, 0, text.len());
        let collator = LineCollator::for_language("hr");
        sort_lines(&mut buffer, SortOrder::Ascending, &collator).unwrap();
        assert_eq!(buffer.contents(), "cvijet\nčaj\ndan");
    }

    #[test]
    fn single_caret_line_is_left_alone() {
        let mut buffer = EditorBuffer::new("b\na");
        buffer.set_caret(0);
        let collator = LineCollator::ordinal();
        assert!(!sort_lines(&mut buffer, SortOrder::Ascending, &collator).unwrap());
        assert!(!unique_lines(&mut buffer).unwrap());
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        let text = "b\na\nb\n\na\n";
        let mut buffer = buffer_with_selection(text, 0, text.len());
        assert!(unique_lines(&mut buffer).unwrap());
        assert_eq!(buffer.contents(), "b\na\n\n");
        assert!(!unique_lines(&mut buffer).unwrap());
    }
}
