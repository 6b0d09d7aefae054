use std::path::{Path, PathBuf};

use crate::document::{DocumentError, DocumentTab, TabId};

pub const APP_NAME: &str = "JNotepad++";

/// 有序的分頁集合與目前作用中的分頁。 / Ordered set of open tabs plus the active one.
///
/// Whenever the set is non-empty exactly one tab is active; tool and edit
/// actions always target it.
#[derive(Debug, Default)]
pub struct TabSet {
    tabs: Vec<DocumentTab>,
    active: Option<usize>,
    next_id: u64,
}

impl TabSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentTab> {
        self.tabs.iter()
    }

    /// 新增空白分頁並設為作用中。 / Adds an untitled tab and activates it.
    pub fn new_untitled(&mut self) -> TabId {
        let id = self.allocate_id();
        self.push(DocumentTab::untitled(id))
    }

    /// 開啟檔案；若已開啟則切換至該分頁。 / Opens `path`, re-activating the tab that already shows it.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<TabId, DocumentError> {
        let path = path.as_ref();
        if let Some(existing) = self.find_by_path(path) {
            tracing::debug!(path = %path.display(), "file already open, activating tab");
            self.activate(existing);
            return Ok(existing);
        }
        let id = self.allocate_id();
        let tab = DocumentTab::open(id, path)?;
        Ok(self.push(tab))
    }

    /// 加入分頁並設為作用中。 / Appends a tab and activates it.
    pub fn push(&mut self, tab: DocumentTab) -> TabId {
        let id = tab.id();
        self.next_id = self.next_id.max(id.0 + 1);
        self.tabs.push(tab);
        self.active = Some(self.tabs.len() - 1);
        id
    }

    pub fn activate(&mut self, id: TabId) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active().map(DocumentTab::id)
    }

    pub fn active(&self) -> Option<&DocumentTab> {
        self.active.and_then(|index| self.tabs.get(index))
    }

    pub fn active_mut(&mut self) -> Option<&mut DocumentTab> {
        self.active.and_then(|index| self.tabs.get_mut(index))
    }

    pub fn get(&self, id: TabId) -> Option<&DocumentTab> {
        self.index_of(id).map(|index| &self.tabs[index])
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut DocumentTab> {
        self.index_of(id).map(move |index| &mut self.tabs[index])
    }

    /// 關閉分頁，作用中分頁移至相鄰分頁。 / Removes a tab; activation moves to its neighbour.
    pub fn remove(&mut self, id: TabId) -> Option<DocumentTab> {
        let index = self.index_of(id)?;
        let removed = self.tabs.remove(index);
        self.active = match self.active {
            _ if self.tabs.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) if active == index => Some(index.min(self.tabs.len() - 1)),
            other => other,
        };
        Some(removed)
    }

    /// 有未儲存變更的分頁。 / Ids of tabs with unsaved changes, in tab order.
    pub fn dirty_tabs(&self) -> Vec<TabId> {
        self.tabs
            .iter()
            .filter(|tab| tab.is_dirty())
            .map(DocumentTab::id)
            .collect()
    }

    /// 視窗標題。 / Window title for the current active tab.
    pub fn window_title(&self, untitled_label: &str) -> String {
        match self.active() {
            None => APP_NAME.to_string(),
            Some(tab) => {
                let name = tab.tooltip().unwrap_or_else(|| untitled_label.to_string());
                format!("{name} - {APP_NAME}")
            }
        }
    }

    fn find_by_path(&self, path: &Path) -> Option<TabId> {
        let wanted = normalized(path);
        self.tabs
            .iter()
            .find(|tab| tab.path().map(normalized).as_deref() == Some(wanted.as_path()))
            .map(DocumentTab::id)
    }

    fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id() == id)
    }

    fn allocate_id(&mut self) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        id
    }
}

/// 正規化路徑；無法解析時沿用原路徑。 / Canonical form of `path`, or the path itself when it cannot be resolved.
fn normalized(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
