use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::editor::{EditorBuffer, EditorError};

/// 分頁的穩定識別碼。 / Stable identifier of a document tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u64);

/// 文件載入或儲存時可能發生的錯誤。 / Errors that can occur while loading or saving a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} is not valid UTF-8 text")]
    InvalidUtf8 { path: PathBuf },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("document has no associated path")]
    NoPath,
    #[error(transparent)]
    Edit(#[from] EditorError),
}

/// 一個開啟中的分頁文件。 / One open document: optional path, text buffer and dirty flag.
#[derive(Debug, Clone)]
pub struct DocumentTab {
    id: TabId,
    path: Option<PathBuf>,
    buffer: EditorBuffer,
    dirty: bool,
}

impl DocumentTab {
    /// 建立尚未儲存的空白文件。 / Creates an empty document that has never been saved.
    pub fn untitled(id: TabId) -> Self {
        Self {
            id,
            path: None,
            buffer: EditorBuffer::default(),
            dirty: false,
        }
    }

    /// 以 UTF-8 讀取檔案內容。 / Reads a file as raw UTF-8 text.
    pub fn open(id: TabId, path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref().to_path_buf();
        let bytes = fs::read(&path).map_err(|source| DocumentError::Read {
            path: path.clone(),
            source,
        })?;
        let text =
            String::from_utf8(bytes).map_err(|_| DocumentError::InvalidUtf8 { path: path.clone() })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "opened document");
        Ok(Self {
            id,
            path: Some(path),
            buffer: EditorBuffer::new(text),
            dirty: false,
        })
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 檔名（不含目錄）。 / File name without its directory, if the tab has a path.
    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn buffer(&self) -> &EditorBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.contents()
    }

    /// 以閉包修改緩衝區；回報變更時標記為已修改。 / Runs an edit against the buffer, marking the tab dirty when it reports a change.
    pub fn edit<F, E>(&mut self, op: F) -> Result<bool, E>
    where
        F: FnOnce(&mut EditorBuffer) -> Result<bool, E>,
    {
        let changed = op(&mut self.buffer)?;
        if changed {
            self.dirty = true;
        }
        Ok(changed)
    }

    /// 以編輯器元件的文字取代內容。 / Replaces the text from an editor widget, keeping the caret where the widget put it.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        let caret = self.buffer.caret();
        let changed = self.buffer.set_contents(text);
        if changed {
            self.dirty = true;
        }
        self.buffer.select(caret.mark(), caret.dot());
        changed
    }

    /// 游標與選取變更不影響修改狀態。 / Caret and selection changes never touch the dirty flag.
    pub fn select(&mut self, mark: usize, dot: usize) {
        self.buffer.select(mark, dot);
    }

    /// 儲存至目前路徑。 / Saves to the current path; untitled tabs fail with [`DocumentError::NoPath`].
    pub fn save(&mut self) -> Result<(), DocumentError> {
        let path = self.path.clone().ok_or(DocumentError::NoPath)?;
        self.save_as(path)
    }

    /// 另存新檔並更新路徑。 / Saves to `path`, adopting it as the tab's path.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        write_atomically(path, self.buffer.contents().as_bytes()).map_err(|source| {
            DocumentError::Write {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        tracing::info!(path = %path.display(), "saved document");
        Ok(())
    }

    /// 分頁標題。 / Tab title: the file name, or `untitled_label` for new documents.
    pub fn title(&self, untitled_label: &str) -> String {
        self.file_name()
            .unwrap_or_else(|| untitled_label.to_string())
    }

    /// 分頁提示文字（完整路徑）。 / Tab tooltip: the full path.
    pub fn tooltip(&self) -> Option<String> {
        self.path.as_ref().map(|path| path.display().to_string())
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    // 先寫入暫存檔再重新命名。 / Write a temporary file, then rename it over the target.
    let tmp_path = path.with_extension("tmp_jnotepad");
    let result = write_and_sync(&tmp_path, bytes).and_then(|()| fs::rename(&tmp_path, path));
    if result.is_err() {
        // 失敗時清除暫存檔。 / Leave nothing behind on failure.
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn untitled_tab_cannot_save_without_path() {
        let mut tab = DocumentTab::untitled(TabId(1));
        assert!(matches!(tab.save(), Err(DocumentError::NoPath)));
        assert_eq!(tab.title("New file"), "New file");
        assert!(tab.tooltip().is_none());
    }

    #[test]
    fn edits_mark_dirty_and_saving_clears_it() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        let mut tab = DocumentTab::untitled(TabId(1));

        assert!(!tab.set_text("hello"));
        assert!(!tab.is_dirty());
        tab.edit(|buffer| buffer.insert(0, "hello")).unwrap();
        assert!(tab.is_dirty());

        tab.save_as(&path).unwrap();
        assert!(!tab.is_dirty());
        assert_eq!(tab.path(), Some(path.as_path()));
        assert_eq!(tab.title("New file"), "notes.txt");
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
        assert!(!path.with_extension("tmp_jnotepad").exists());
    }

    #[test]
    fn failed_save_removes_temporary_file() {
        let dir = tempdir().expect("tempdir");
        let target = dir.path().join("target");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inner.txt"), "keep").unwrap();

        let mut tab = DocumentTab::untitled(TabId(4));
        tab.edit(|buffer| buffer.insert(0, "text")).unwrap();
        let err = tab.save_as(&target).unwrap_err();
        assert!(matches!(err, DocumentError::Write { .. }));
        assert!(!target.with_extension("tmp_jnotepad").exists());
        assert!(tab.is_dirty());
        assert!(tab.path().is_none());
    }

    #[test]
    fn unchanged_edit_keeps_tab_clean() {
        let mut tab = DocumentTab::untitled(TabId(3));
        tab.edit(|buffer| buffer.insert(0, "")).unwrap();
        tab.select(0, 0);
        assert!(!tab.is_dirty());
    }

    #[test]
    fn open_rejects_invalid_utf8() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [0x63, 0x61, 0x66, 0xE9]).unwrap();
        let err = DocumentTab::open(TabId(2), &path).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidUtf8 { .. }));
    }

    #[test]
    fn open_missing_file_reports_path() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("missing.txt");
        let err = DocumentTab::open(TabId(2), &path).unwrap_err();
        assert!(err.to_string().contains("missing.txt"));
    }
}
