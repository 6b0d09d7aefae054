use std::collections::HashMap;
use std::sync::Arc;

use jnotepad_settings::{Localize, LocalizedLabel};

use crate::actions::Action;

/// Fixed widget captions that are not action names.
const STATIC_KEYS: [&str; 7] = [
    "menu.file",
    "menu.edit",
    "menu.languages",
    "menu.tools",
    "menu.sort",
    "toolbar.title",
    "tab.new_file",
];

/// 介面標籤集合。 / Every caption of the main window, kept current across language changes.
pub struct Labels {
    localization: Arc<dyn Localize>,
    labels: HashMap<String, LocalizedLabel>,
}

impl Labels {
    pub fn new(localization: Arc<dyn Localize>) -> Self {
        let mut keys: Vec<String> = STATIC_KEYS.iter().map(|key| key.to_string()).collect();
        for action in Action::all() {
            keys.push(action.name_key());
            keys.push(action.description_key());
        }

        let mut labels = HashMap::with_capacity(keys.len());
        for key in keys {
            if !labels.contains_key(&key) {
                let label = LocalizedLabel::new(key.clone(), Arc::clone(&localization));
                labels.insert(key, label);
            }
        }
        Self {
            localization,
            labels,
        }
    }

    /// Caption for `key`; keys without a label are looked up directly.
    pub fn text(&self, key: &str) -> String {
        match self.labels.get(key) {
            Some(label) => label.text(),
            None => self.localization.text(key),
        }
    }

    pub fn name(&self, action: Action) -> String {
        self.text(&action.name_key())
    }

    pub fn description(&self, action: Action) -> String {
        self.text(&action.description_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::UI_LANGUAGES;
    use jnotepad_settings::{FormLocalization, LocalizationManager, LocalizationProvider};

    #[test]
    fn captions_switch_with_the_window_language() {
        let provider = Arc::new(LocalizationProvider::new(LocalizationManager::builtin()));
        let form = Arc::new(FormLocalization::new(provider.clone()));
        form.window_opened();
        let labels = Labels::new(form.clone());

        assert_eq!(labels.name(Action::New), "New");
        provider.set_language("hr").expect("hr");
        assert_eq!(labels.name(Action::New), "Novo");
        assert_eq!(labels.text("menu.tools"), "Alati");
        assert_eq!(labels.name(Action::Language(UI_LANGUAGES[0])), "Engleski");
    }

    #[test]
    fn closed_window_keeps_its_captions() {
        let provider = Arc::new(LocalizationProvider::new(LocalizationManager::builtin()));
        let form = Arc::new(FormLocalization::new(provider.clone()));
        let labels = Labels::new(form.clone());

        provider.set_language("hr").expect("hr");
        assert_eq!(labels.name(Action::New), "New");
    }
}
