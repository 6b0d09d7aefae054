use egui::{Key, KeyboardShortcut, Modifiers};
use jnotepad_core::{CaseTransform, SortOrder};

/// 介面語言與其快捷鍵。 / UI languages offered by the Languages menu, in menu order.
pub const UI_LANGUAGES: [UiLanguage; 5] = [
    UiLanguage::new("en", Key::E),
    UiLanguage::new("de", Key::G),
    UiLanguage::new("es", Key::S),
    UiLanguage::new("it", Key::I),
    UiLanguage::new("hr", Key::C),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UiLanguage {
    pub code: &'static str,
    key: Key,
}

impl UiLanguage {
    const fn new(code: &'static str, key: Key) -> Self {
        Self { code, key }
    }
}

/// 主視窗的所有動作。 / Every command reachable from menus, toolbar or keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    New,
    Open,
    Save,
    SaveAs,
    Close,
    Exit,
    Statistics,
    Copy,
    Cut,
    Paste,
    Case(CaseTransform),
    Sort(SortOrder),
    Unique,
    Language(UiLanguage),
}

impl Action {
    pub const FILE_MENU: [Action; 6] = [
        Action::New,
        Action::Open,
        Action::Save,
        Action::SaveAs,
        Action::Close,
        Action::Exit,
    ];

    pub const EDIT_MENU: [Action; 4] = [
        Action::Copy,
        Action::Cut,
        Action::Paste,
        Action::Statistics,
    ];

    pub const CASE_TOOLS: [Action; 3] = [
        Action::Case(CaseTransform::Upper),
        Action::Case(CaseTransform::Lower),
        Action::Case(CaseTransform::Invert),
    ];

    pub const SORT_TOOLS: [Action; 3] = [
        Action::Sort(SortOrder::Ascending),
        Action::Sort(SortOrder::Descending),
        Action::Unique,
    ];

    /// 工具列按鈕。 / Actions mirrored on the toolbar.
    pub const TOOLBAR: [Action; 10] = [
        Action::New,
        Action::Open,
        Action::Save,
        Action::SaveAs,
        Action::Close,
        Action::Exit,
        Action::Copy,
        Action::Cut,
        Action::Paste,
        Action::Statistics,
    ];

    pub fn all() -> Vec<Action> {
        let mut actions = Vec::new();
        actions.extend(Self::FILE_MENU);
        actions.extend(Self::EDIT_MENU);
        actions.extend(Self::CASE_TOOLS);
        actions.extend(Self::SORT_TOOLS);
        actions.extend(UI_LANGUAGES.into_iter().map(Action::Language));
        actions
    }

    /// 名稱的翻譯鍵。 / Localization key of the action's name.
    pub fn name_key(&self) -> String {
        match self {
            Action::Language(language) => format!("action.language.{}", language.code),
            other => format!("action.{}", other.stem()),
        }
    }

    /// 說明的翻譯鍵。 / Localization key of the action's tooltip.
    pub fn description_key(&self) -> String {
        match self {
            Action::Language(_) => "description.language".to_string(),
            other => format!("description.{}", other.stem()),
        }
    }

    /// Tools only operate on a selection.
    pub fn requires_selection(&self) -> bool {
        matches!(self, Action::Case(_) | Action::Sort(_) | Action::Unique)
    }

    /// Actions that target the active tab.
    pub fn requires_document(&self) -> bool {
        !matches!(
            self,
            Action::New | Action::Open | Action::Exit | Action::Language(_)
        )
    }

    pub fn shortcut(&self) -> Option<KeyboardShortcut> {
        let command = Modifiers::COMMAND;
        let command_alt = Modifiers::COMMAND | Modifiers::ALT;
        let command_shift = Modifiers::COMMAND | Modifiers::SHIFT;
        let (modifiers, key) = match self {
            Action::New => (command, Key::N),
            Action::Open => (command, Key::O),
            Action::Save => (command, Key::S),
            Action::SaveAs => (command_alt, Key::S),
            Action::Close => (command, Key::L),
            Action::Exit => (command, Key::E),
            Action::Statistics => (command, Key::I),
            Action::Copy => (command, Key::C),
            Action::Cut => (command, Key::X),
            Action::Paste => (command, Key::V),
            Action::Case(CaseTransform::Upper) => (command_alt, Key::U),
            Action::Case(CaseTransform::Lower) => (command_alt, Key::L),
            Action::Case(CaseTransform::Invert) => (command_alt, Key::I),
            Action::Sort(SortOrder::Ascending) => (command_alt, Key::A),
            Action::Sort(SortOrder::Descending) => (command_alt, Key::D),
            Action::Unique => return None,
            Action::Language(language) => (command_shift, language.key),
        };
        Some(KeyboardShortcut::new(modifiers, key))
    }

    /// 依修飾鍵數量排序，較具體的快捷鍵先比對。 / Actions with shortcuts, most specific modifiers first.
    pub fn by_shortcut_priority() -> Vec<(Action, KeyboardShortcut)> {
        let mut bound: Vec<(Action, KeyboardShortcut)> = Self::all()
            .into_iter()
            .filter_map(|action| action.shortcut().map(|shortcut| (action, shortcut)))
            .collect();
        bound.sort_by_key(|(_, shortcut)| {
            let m = shortcut.modifiers;
            std::cmp::Reverse(
                [m.alt, m.shift, m.ctrl, m.command, m.mac_cmd]
                    .iter()
                    .filter(|flag| **flag)
                    .count(),
            )
        });
        bound
    }

    fn stem(&self) -> &'static str {
        match self {
            Action::New => "new",
            Action::Open => "open",
            Action::Save => "save",
            Action::SaveAs => "save_as",
            Action::Close => "close",
            Action::Exit => "exit",
            Action::Statistics => "statistics",
            Action::Copy => "copy",
            Action::Cut => "cut",
            Action::Paste => "paste",
            Action::Case(CaseTransform::Upper) => "to_uppercase",
            Action::Case(CaseTransform::Lower) => "to_lowercase",
            Action::Case(CaseTransform::Invert) => "invert_case",
            Action::Sort(SortOrder::Ascending) => "sort_ascending",
            Action::Sort(SortOrder::Descending) => "sort_descending",
            Action::Unique => "unique",
            Action::Language(_) => "language",
        }
    }
}
