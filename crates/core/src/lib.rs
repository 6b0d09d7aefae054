pub mod clipboard;
pub mod collation;
pub mod document;
pub mod editor;
pub mod line_ops;
pub mod stats;
pub mod tabs;

pub use clipboard::Clipboard;
pub use collation::LineCollator;
pub use document::{DocumentError, DocumentTab, TabId};
pub use editor::{Caret, EditorBuffer, EditorError, Selection};
pub use line_ops::{CaseTransform, SortOrder};
pub use stats::{DocumentStatistics, StatusInfo};
pub use tabs::{TabSet, APP_NAME};
