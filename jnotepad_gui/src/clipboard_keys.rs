use eframe::egui;
use jnotepad_core::clipboard;
use jnotepad_core::{Clipboard, EditorError, TabId, TabSet};

use crate::actions::Action;

/// 剪貼簿指令的執行結果。 / What a clipboard command did.
#[derive(Debug, Default)]
pub struct ClipboardOutcome {
    /// Edited tab and the edit result; `None` for copy or when no tab is open.
    pub edit: Option<(TabId, Result<bool, EditorError>)>,
    /// Text to mirror into the system clipboard after a copy or cut.
    ///
    /// The native backend only reports Ctrl+V while the system clipboard
    /// holds text, so it has to track the internal one.
    pub mirror: Option<String>,
}

/// 取出剪貼簿事件。 / Removes copy, cut and paste events from `events` and
/// returns the matching actions in arrival order.
///
/// Pasted text is dropped; paste always reads the internal clipboard.
pub fn take_clipboard_events(events: &mut Vec<egui::Event>) -> Vec<Action> {
    let mut actions = Vec::new();
    events.retain(|event| match event {
        egui::Event::Copy => {
            actions.push(Action::Copy);
            false
        }
        egui::Event::Cut => {
            actions.push(Action::Cut);
            false
        }
        egui::Event::Paste(_) => {
            actions.push(Action::Paste);
            false
        }
        _ => true,
    });
    actions
}

/// 對作用中分頁執行剪貼簿指令。 / Runs a copy, cut or paste against the active tab.
pub fn apply(action: Action, tabs: &mut TabSet, clip: &mut Clipboard) -> ClipboardOutcome {
    match action {
        Action::Copy => {
            let copied = tabs.active().map_or(false, |tab| clipboard::copy(tab, clip));
            ClipboardOutcome {
                edit: None,
                mirror: copied.then(|| clip.contents().unwrap_or_default().to_string()),
            }
        }
        Action::Cut => {
            let Some(tab) = tabs.active_mut() else {
                return ClipboardOutcome::default();
            };
            let result = clipboard::cut(tab, clip);
            let mirror = match result {
                Ok(true) => clip.contents().map(str::to_string),
                _ => None,
            };
            ClipboardOutcome {
                edit: Some((tab.id(), result)),
                mirror,
            }
        }
        Action::Paste => ClipboardOutcome {
            edit: tabs
                .active_mut()
                .map(|tab| (tab.id(), clipboard::paste(tab, clip))),
            mirror: None,
        },
        _ => ClipboardOutcome::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tabs_with(text: &str, mark: usize, dot: usize) -> (TabSet, TabId) {
        let mut tabs = TabSet::new();
        let id = tabs.new_untitled();
        let tab = tabs.get_mut(id).expect("tab");
        tab.set_text(text);
        tab.select(mark, dot);
        (tabs, id)
    }

    #[test]
    fn clipboard_events_become_actions() {
        let mut events = vec![
            egui::Event::Copy,
            egui::Event::Text("x".to_string()),
            egui::Event::Paste("system".to_string()),
            egui::Event::Cut,
        ];
        let actions = take_clipboard_events(&mut events);
        assert_eq!(actions, vec![Action::Copy, Action::Paste, Action::Cut]);
        assert_eq!(events, vec![egui::Event::Text("x".to_string())]);
    }

    #[test]
    fn copy_mirrors_text_so_paste_keeps_arriving() {
        let (mut tabs, _) = tabs_with("hello world", 0, 5);
        let mut clip = Clipboard::new();

        let outcome = apply(Action::Copy, &mut tabs, &mut clip);
        assert!(outcome.edit.is_none());
        assert_eq!(outcome.mirror.as_deref(), Some("hello"));

        let target = tabs.new_untitled();
        let outcome = apply(Action::Paste, &mut tabs, &mut clip);
        assert!(matches!(outcome.edit, Some((id, Ok(true))) if id == target));
        assert!(outcome.mirror.is_none());
        assert_eq!(tabs.get(target).expect("tab").text(), "hello");
    }

    #[test]
    fn paste_uses_internal_contents_not_system_text() {
        let (mut tabs, id) = tabs_with("abc", 3, 3);
        let mut clip = Clipboard::new();
        clip.set("!");

        let mut events = vec![egui::Event::Paste("from elsewhere".to_string())];
        for action in take_clipboard_events(&mut events) {
            apply(action, &mut tabs, &mut clip);
        }
        assert_eq!(tabs.get(id).expect("tab").text(), "abc!");
    }

    #[test]
    fn cut_mirrors_removed_text() {
        let (mut tabs, id) = tabs_with("abc", 1, 3);
        let mut clip = Clipboard::new();

        let outcome = apply(Action::Cut, &mut tabs, &mut clip);
        assert_eq!(outcome.mirror.as_deref(), Some("bc"));
        assert!(matches!(outcome.edit, Some((edited, Ok(true))) if edited == id));
        assert_eq!(tabs.get(id).expect("tab").text(), "a");
    }

    #[test]
    fn nothing_selected_mirrors_nothing() {
        let (mut tabs, _) = tabs_with("abc", 1, 1);
        let mut clip = Clipboard::new();
        assert!(apply(Action::Copy, &mut tabs, &mut clip).mirror.is_none());
        assert!(apply(Action::Cut, &mut tabs, &mut clip).mirror.is_none());
        assert!(apply(Action::Copy, &mut TabSet::new(), &mut clip).edit.is_none());
    }
}
