use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use icu_collator::{Collator, CollatorOptions};
use icu_locid::Locale;

/// 依語系比較文字行。 / Locale-aware line comparison backed by ICU4X collation data.
pub struct LineCollator {
    language: String,
    inner: Inner,
}

enum Inner {
    Icu(Collator),
    Ordinal,
}

impl LineCollator {
    /// 為語言標籤建立比較器，無法辨識時退回根語系。 / Builds a collator for a BCP-47 tag, falling back to root collation.
    pub fn for_language(tag: &str) -> Self {
        let language = normalize_tag(tag).to_string();
        let locale = Locale::from_str(&language).unwrap_or_else(|err| {
            tracing::debug!(tag, %err, "invalid language tag, using root collation");
            Locale::UND
        });

        let inner = match Collator::try_new(&(&locale).into(), CollatorOptions::new()) {
            Ok(collator) => Inner::Icu(collator),
            Err(err) => {
                tracing::warn!(%locale, ?err, "collation data unavailable");
                match Collator::try_new(&(&Locale::UND).into(), CollatorOptions::new()) {
                    Ok(collator) => Inner::Icu(collator),
                    Err(_) => Inner::Ordinal,
                }
            }
        };
        Self { language, inner }
    }

    /// 以碼位順序比較的比較器。 / A collator comparing by code point order.
    pub fn ordinal() -> Self {
        Self {
            language: String::new(),
            inner: Inner::Ordinal,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        match &self.inner {
            Inner::Icu(collator) => collator.compare(left, right),
            Inner::Ordinal => left.cmp(right),
        }
    }
}

impl fmt::Debug for LineCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.inner {
            Inner::Icu(_) => "icu",
            Inner::Ordinal => "ordinal",
        };
        f.debug_struct("LineCollator")
            .field("language", &self.language)
            .field("kind", &kind)
            .finish()
    }
}

/// Maps legacy tags used by older preference files onto BCP-47.
fn normalize_tag(tag: &str) -> &str {
    match tag.trim() {
        "cro" => "hr",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn croatian_orders_digraph_letters_after_base() {
        let collator = LineCollator::for_language("hr");
        assert_eq!(collator.compare("čaj", "cvijet"), Ordering::Greater);
        assert_eq!(collator.compare("čaj", "dan"), Ordering::Less);
    }

    #[test]
    fn root_collation_ignores_case_at_primary_level() {
        let collator = LineCollator::for_language("en");
        assert_eq!(collator.compare("apple", "Banana"), Ordering::Less);
        assert_eq!("apple".cmp("Banana"), Ordering::Greater);
    }

    #[test]
    fn legacy_and_invalid_tags_still_compare() {
        assert_eq!(LineCollator::for_language("cro").language(), "hr");
        let collator = LineCollator::for_language("not a tag!");
        assert_eq!(collator.compare("a", "b"), Ordering::Less);
    }
}
