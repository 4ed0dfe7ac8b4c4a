use sonora_types::Locale;

use crate::dictionary::{self, Dictionary, LoadError};
use crate::template::{TemplateArgs, apply_template};

const EN: &str = include_str!("../locales/en.json");
const HI: &str = include_str!("../locales/hi.json");

/// Every supported dictionary, parsed up front
#[derive(Debug, Clone)]
pub struct Catalog {
    en: Dictionary,
    hi: Dictionary,
}

impl Catalog {
    /// Parse the dictionaries bundled with the binary
    pub fn bundled() -> Result<Self, LoadError> {
        let catalog = Self {
            en: Dictionary::from_json(EN)?,
            hi: Dictionary::from_json(HI)?,
        };
        tracing::debug!(
            "Loaded locale dictionaries (en: {} keys, hi: {} keys)",
            catalog.en.leaf_keys().len(),
            catalog.hi.leaf_keys().len()
        );
        Ok(catalog)
    }

    pub fn dictionary(&self, locale: Locale) -> &Dictionary {
        match locale {
            Locale::En => &self.en,
            Locale::Hi => &self.hi,
        }
    }

    pub fn localizer(&self, locale: Locale) -> Localizer<'_> {
        Localizer::new(locale, self.dictionary(locale))
    }
}

/// Lookups against one explicitly chosen dictionary
#[derive(Debug, Clone, Copy)]
pub struct Localizer<'a> {
    locale: Locale,
    dictionary: &'a Dictionary,
}

impl<'a> Localizer<'a> {
    pub fn new(locale: Locale, dictionary: &'a Dictionary) -> Self {
        Self { locale, dictionary }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t(&self, key: &str) -> String {
        dictionary::resolve(self.dictionary, key).to_string()
    }

    /// Templates only apply to resolved text; a missing key comes back raw
    pub fn t_with(&self, key: &str, args: &TemplateArgs) -> String {
        match dictionary::lookup(self.dictionary, key) {
            Some(text) => apply_template(text, args),
            None => key.to_string(),
        }
    }

    /// One string per list entry. Scalars render as text; a nested list or
    /// table has no text form and comes back as the key, like `t` does.
    pub fn t_list(&self, key: &str) -> Vec<String> {
        dictionary::resolve_list(self.dictionary, key)
            .into_iter()
            .map(|entry| match entry.as_text() {
                Some(text) => text.into_owned(),
                None => key.to_string(),
            })
            .collect()
    }
}
