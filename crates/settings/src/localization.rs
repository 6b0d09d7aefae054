use icu_locid::{Locale, ParserError as LocaleParserError};
use icu_plurals::{PluralCategory as IcuPluralCategory, PluralOperands, PluralRules};
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

pub const FALLBACK_LOCALE: &str = "en";

/// Locale tables compiled into the binary, in menu order.
const BUILTIN_LOCALES: &[(&str, &str)] = &[
    ("en", include_str!("../locales/en.json")),
    ("de", include_str!("../locales/de.json")),
    ("es", include_str!("../locales/es.json")),
    ("it", include_str!("../locales/it.json")),
    ("hr", include_str!("../locales/hr.json")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "zero" => Some(Self::Zero),
            "one" => Some(Self::One),
            "two" => Some(Self::Two),
            "few" => Some(Self::Few),
            "many" => Some(Self::Many),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl From<IcuPluralCategory> for PluralCategory {
    fn from(value: IcuPluralCategory) -> Self {
        match value {
            IcuPluralCategory::Zero => PluralCategory::Zero,
            IcuPluralCategory::One => PluralCategory::One,
            IcuPluralCategory::Two => PluralCategory::Two,
            IcuPluralCategory::Few => PluralCategory::Few,
            IcuPluralCategory::Many => PluralCategory::Many,
            IcuPluralCategory::Other => PluralCategory::Other,
        }
    }
}

#[derive(Debug, Clone)]
enum Message {
    Simple(String),
    Plural(BTreeMap<PluralCategory, String>),
}

impl Message {
    fn template<'a>(&'a self, rules: Option<&PluralRules>, count: Option<u64>) -> &'a str {
        match self {
            Message::Simple(text) => text.as_str(),
            Message::Plural(forms) => {
                let category = count
                    .map(|value| select_plural_category(rules, value))
                    .unwrap_or(PluralCategory::Other);
                forms
                    .get(&category)
                    .or_else(|| forms.get(&PluralCategory::Other))
                    .map(String::as_str)
                    .unwrap_or("")
            }
        }
    }
}

/// Placeholder values for a message: `{0}`, `{1}`, ... and `{count}`.
#[derive(Debug, Clone, Copy)]
pub struct LocalizationParams<'a> {
    count: Option<u64>,
    positional: &'a [&'a str],
}

impl<'a> LocalizationParams<'a> {
    pub fn new(positional: &'a [&'a str]) -> Self {
        Self {
            count: None,
            positional,
        }
    }

    pub fn with_count(positional: &'a [&'a str], count: u64) -> Self {
        Self {
            count: Some(count),
            positional,
        }
    }
}

impl LocalizationParams<'static> {
    pub fn empty() -> Self {
        LocalizationParams {
            count: None,
            positional: &[],
        }
    }

    pub fn count_only(count: u64) -> Self {
        LocalizationParams {
            count: Some(count),
            positional: &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum LocalizationError {
    #[error("failed to enumerate locale directory {0}: {1}")]
    ReadDir(PathBuf, io::Error),
    #[error("failed to read locale file {0}: {1}")]
    ReadFile(PathBuf, io::Error),
    #[error("failed to parse locale table {0}: {1}")]
    Parse(String, serde_json::Error),
    #[error("unknown locale '{0}'")]
    UnknownLocale(String),
    #[error("locale {locale} message '{key}' is missing plural 'other' form")]
    PluralMissingOther { locale: String, key: String },
    #[error("locale {locale} message '{key}' contains invalid plural category '{category}'")]
    InvalidPluralCategory {
        locale: String,
        key: String,
        category: String,
    },
    #[error("locale {locale} message '{key}' uses unsupported type '{kind}'")]
    UnsupportedMessageType {
        locale: String,
        key: String,
        kind: String,
    },
    #[error("locale identifier '{locale}' is invalid: {error}")]
    InvalidLocaleIdentifier {
        locale: String,
        error: LocaleParserError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSummary {
    pub code: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
struct StringTable {
    summary: LocaleSummary,
    plural_rules: Option<Arc<PluralRules>>,
    messages: HashMap<String, Message>,
}

#[derive(Debug, Deserialize)]
struct LocaleFile {
    locale: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    strings: HashMap<String, LocaleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocaleEntry {
    Simple(String),
    Typed(LocaleEntryTyped),
}

#[derive(Debug, Deserialize)]
struct LocaleEntryTyped {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    forms: HashMap<String, String>,
}

/// Per-language string tables with one active language.
///
/// Lookups fall back to English, then to the key itself.
#[derive(Debug, Clone)]
pub struct LocalizationManager {
    tables: Vec<StringTable>,
    active: usize,
}

impl LocalizationManager {
    /// Tables for the languages shipped with the editor, English active.
    pub fn builtin() -> Self {
        let mut tables = Vec::with_capacity(BUILTIN_LOCALES.len());
        for (code, source) in BUILTIN_LOCALES {
            match parse_table(code, source) {
                Ok(table) => tables.push(table),
                Err(err) => tracing::error!(locale = code, %err, "built-in locale table rejected"),
            }
        }
        Self { tables, active: 0 }
    }

    /// Built-in tables overlaid with `*.json` locale files found in `dir`.
    ///
    /// A file for an existing language replaces individual keys; a new
    /// language is appended. A missing directory is not an error.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self, LocalizationError> {
        let mut manager = Self::builtin();
        manager.merge_directory(dir.as_ref())?;
        Ok(manager)
    }

    pub fn active_code(&self) -> &str {
        self.tables
            .get(self.active)
            .map(|table| table.summary.code.as_str())
            .unwrap_or(FALLBACK_LOCALE)
    }

    pub fn locale_summaries(&self) -> Vec<LocaleSummary> {
        self.tables
            .iter()
            .map(|table| table.summary.clone())
            .collect()
    }

    pub fn has_locale(&self, code: &str) -> bool {
        self.index_of(code).is_some()
    }

    /// Switches the active language.
    pub fn set_active(&mut self, code: &str) -> Result<(), LocalizationError> {
        let index = self
            .index_of(code)
            .ok_or_else(|| LocalizationError::UnknownLocale(code.to_string()))?;
        self.active = index;
        Ok(())
    }

    pub fn text<'a>(&'a self, key: &'a str) -> Cow<'a, str> {
        self.text_with_params(key, &LocalizationParams::empty())
    }

    pub fn text_with_params<'a>(
        &'a self,
        key: &'a str,
        params: &LocalizationParams<'_>,
    ) -> Cow<'a, str> {
        let fallback = self.index_of(FALLBACK_LOCALE);
        for index in std::iter::once(Some(self.active)).chain(std::iter::once(fallback)) {
            let Some(table) = index.and_then(|index| self.tables.get(index)) else {
                continue;
            };
            if let Some(message) = table.messages.get(key) {
                let template = message.template(table.plural_rules.as_deref(), params.count);
                return render_template(template, params);
            }
        }
        Cow::Borrowed(key)
    }

    /// Keys present in English but absent from `code`.
    pub fn missing_keys(&self, code: &str) -> Option<Vec<String>> {
        let table = self.tables.get(self.index_of(code)?)?;
        let reference = self.tables.get(self.index_of(FALLBACK_LOCALE)?)?;
        let mut missing: Vec<String> = reference
            .messages
            .keys()
            .filter(|key| !table.messages.contains_key(*key))
            .cloned()
            .collect();
        missing.sort();
        Some(missing)
    }

    fn index_of(&self, code: &str) -> Option<usize> {
        self.tables
            .iter()
            .position(|table| table.summary.code == code)
    }

    fn merge_directory(&mut self, dir: &Path) -> Result<(), LocalizationError> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(dir = %dir.display(), "no locale overrides");
                return Ok(());
            }
            Err(err) => return Err(LocalizationError::ReadDir(dir.to_path_buf(), err)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|err| LocalizationError::ReadDir(dir.to_path_buf(), err))?
                .path();
            if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            let contents = fs::read_to_string(&path)
                .map_err(|err| LocalizationError::ReadFile(path.clone(), err))?;
            let table = parse_table(&path.display().to_string(), &contents)?;
            tracing::debug!(locale = %table.summary.code, path = %path.display(), "merging locale file");
            match self.index_of(&table.summary.code) {
                Some(index) => {
                    let existing = &mut self.tables[index];
                    existing.messages.extend(table.messages);
                    existing.summary.display_name = table.summary.display_name;
                }
                None => self.tables.push(table),
            }
        }
        Ok(())
    }
}

fn parse_table(origin: &str, source: &str) -> Result<StringTable, LocalizationError> {
    let file: LocaleFile = serde_json::from_str(source)
        .map_err(|err| LocalizationError::Parse(origin.to_string(), err))?;
    let display_name = file
        .display_name
        .clone()
        .unwrap_or_else(|| file.locale.clone());
    let messages = build_messages(&file.locale, file.strings)?;
    let plural_rules = plural_rules_for(&file.locale)?;
    Ok(StringTable {
        summary: LocaleSummary {
            code: file.locale,
            display_name,
        },
        plural_rules,
        messages,
    })
}

fn plural_rules_for(locale: &str) -> Result<Option<Arc<PluralRules>>, LocalizationError> {
    let parsed =
        Locale::from_str(locale).map_err(|error| LocalizationError::InvalidLocaleIdentifier {
            locale: locale.to_string(),
            error,
        })?;
    match PluralRules::try_new_cardinal(&parsed.into()) {
        Ok(rules) => Ok(Some(Arc::new(rules))),
        Err(_) => Ok(None),
    }
}

fn build_messages(
    locale: &str,
    entries: HashMap<String, LocaleEntry>,
) -> Result<HashMap<String, Message>, LocalizationError> {
    let mut messages = HashMap::with_capacity(entries.len());
    for (key, entry) in entries {
        let message = match entry {
            LocaleEntry::Simple(value) => Message::Simple(value),
            LocaleEntry::Typed(typed) => {
                if typed.kind != "plural" {
                    return Err(LocalizationError::UnsupportedMessageType {
                        locale: locale.to_string(),
                        key,
                        kind: typed.kind,
                    });
                }
                let mut forms = BTreeMap::new();
                for (category, template) in typed.forms {
                    let Some(parsed) = PluralCategory::parse(&category) else {
                        return Err(LocalizationError::InvalidPluralCategory {
                            locale: locale.to_string(),
                            key,
                            category,
                        });
                    };
                    forms.insert(parsed, template);
                }
                if !forms.contains_key(&PluralCategory::Other) {
                    return Err(LocalizationError::PluralMissingOther {
                        locale: locale.to_string(),
                        key,
                    });
                }
                Message::Plural(forms)
            }
        };
        messages.insert(key, message);
    }
    Ok(messages)
}

fn render_template<'a>(template: &'a str, params: &LocalizationParams<'_>) -> Cow<'a, str> {
    if !template.contains('{') || (params.count.is_none() && params.positional.is_empty()) {
        return Cow::Borrowed(template);
    }

    let mut rendered = template.to_string();
    if let Some(count) = params.count {
        rendered = rendered.replace("{count}", &count.to_string());
    }
    for (idx, value) in params.positional.iter().enumerate() {
        rendered = rendered.replace(&format!("{{{idx}}}"), value);
    }
    Cow::Owned(rendered)
}

fn select_plural_category(rules: Option<&PluralRules>, count: u64) -> PluralCategory {
    if let Some(rules) = rules {
        return PluralCategory::from(rules.category_for(PluralOperands::from(count)));
    }
    if count == 1 {
        PluralCategory::One
    } else {
        PluralCategory::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_cover_every_english_key() {
        let manager = LocalizationManager::builtin();
        let codes: Vec<String> = manager
            .locale_summaries()
            .into_iter()
            .map(|summary| summary.code)
            .collect();
        assert_eq!(codes, ["en", "de", "es", "it", "hr"]);
        for code in &codes {
            assert_eq!(manager.missing_keys(code), Some(Vec::new()), "{code}");
        }
    }

    #[test]
    fn placeholders_are_rendered() {
        let manager = LocalizationManager::builtin();
        let values = ["3", "7", "0"];
        assert_eq!(
            manager.text_with_params("status.caret", &LocalizationParams::new(&values)),
            "Ln:3 Col:7 Sel:0"
        );
    }

    #[test]
    fn croatian_plural_forms() {
        let mut manager = LocalizationManager::builtin();
        manager.set_active("hr").unwrap();
        let render = |count| {
            manager
                .text_with_params("stat.lines", &LocalizationParams::count_only(count))
                .into_owned()
        };
        assert_eq!(render(1), "1 redak");
        assert_eq!(render(3), "3 retka");
        assert_eq!(render(5), "5 redaka");
        assert_eq!(render(21), "21 redak");
    }

    #[test]
    fn unknown_locale_keeps_active_language() {
        let mut manager = LocalizationManager::builtin();
        manager.set_active("de").unwrap();
        let err = manager.set_active("cro").unwrap_err();
        assert!(matches!(err, LocalizationError::UnknownLocale(code) if code == "cro"));
        assert_eq!(manager.active_code(), "de");
        assert_eq!(manager.text("menu.file"), "Datei");
        assert_eq!(manager.text("no.such.key"), "no.such.key");
    }
}
