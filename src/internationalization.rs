//! Translation store: the fixed per-locale tables every piece of displayed
//! text comes from.
//!
//! Each locale is one Fluent resource under `locales/<code>/landing.ftl`,
//! embedded at compile time. Markup refers to entries by dotted keys
//! (`hero.title`); the matching Fluent message id swaps the dots for dashes
//! (`hero-title`).

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    str::FromStr,
};

use eyre::Context;
use fluent::{FluentBundle, FluentResource};
use fluent_syntax::ast::Entry;
use unic_langid::LanguageIdentifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    De,
    En,
}

/// Locale used when no valid preference is stored.
pub const DEFAULT_LOCALE: Locale = Locale::De;

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::De, Locale::En];

    pub fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Self::De => include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/locales/de/landing.ftl"
            )),
            Self::En => include_str!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/locales/en/landing.ftl"
            )),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|locale| locale.code() == s)
            .ok_or_else(|| eyre::eyre!("unsupported locale `{s}`"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationKey(String);

impl TranslationKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn message_id(&self) -> String {
        self.0.replace('.', "-")
    }
}

impl fmt::Display for TranslationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TranslationKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Markup authored alongside the translation tables.
///
/// Only [`Translations::html`] can produce one, so runtime input never reaches
/// an HTML sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

struct Table {
    bundle: FluentBundle<FluentResource>,
    ids: BTreeSet<String>,
}

pub struct Translations {
    tables: HashMap<Locale, Table>,
}

impl Translations {
    /// Loads the tables shipped with the crate.
    pub fn load() -> eyre::Result<Self> {
        let sources = Locale::ALL.map(|locale| (locale, locale.source()));
        Self::from_sources(&sources)
    }

    pub fn from_sources(sources: &[(Locale, &str)]) -> eyre::Result<Self> {
        let mut tables = HashMap::new();
        for &(locale, source) in sources {
            tables.insert(locale, Table::parse(locale, source)?);
        }
        let translations = Self { tables };

        for locale in Locale::ALL {
            let missing = translations.missing_keys(locale);
            if !missing.is_empty() {
                tracing::warn!(%locale, ?missing, "translation table has gaps");
            }
        }

        Ok(translations)
    }

    /// Plain text for `key`, or `None` if the locale has no non-empty value.
    pub fn text(&self, locale: Locale, key: &TranslationKey) -> Option<String> {
        let table = self.tables.get(&locale)?;
        let message = table.bundle.get_message(&key.message_id())?;
        let pattern = message.value()?;

        let mut errors = Vec::new();
        let value = table.bundle.format_pattern(pattern, None, &mut errors);
        if !errors.is_empty() {
            tracing::debug!(%locale, %key, ?errors, "translation formatted with errors");
        }

        if value.is_empty() {
            None
        } else {
            Some(value.into_owned())
        }
    }

    pub fn html(&self, locale: Locale, key: &TranslationKey) -> Option<TrustedHtml> {
        self.text(locale, key).map(TrustedHtml)
    }

    pub fn keys(&self, locale: Locale) -> impl Iterator<Item = &str> {
        self.tables
            .get(&locale)
            .into_iter()
            .flat_map(|table| table.ids.iter().map(String::as_str))
    }

    /// Message ids some other locale defines but `locale` does not.
    pub fn missing_keys(&self, locale: Locale) -> Vec<String> {
        let own = self.tables.get(&locale).map(|table| &table.ids);
        self.tables
            .iter()
            .filter(|(other, _)| **other != locale)
            .flat_map(|(_, table)| table.ids.iter())
            .filter(|id| !own.is_some_and(|own| own.contains(*id)))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Table {
    fn parse(locale: Locale, source: &str) -> eyre::Result<Self> {
        let language = locale
            .code()
            .parse::<LanguageIdentifier>()
            .with_context(|| format!("invalid language identifier `{locale}`"))?;

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            eyre::eyre!("failed to parse `{locale}` translations: {errors:?}")
        })?;

        let ids = resource
            .entries()
            .filter_map(|entry| match entry {
                Entry::Message(message) => Some(message.id.name.to_string()),
                _ => None,
            })
            .collect();

        let mut bundle = FluentBundle::new(vec![language]);
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            eyre::eyre!("failed to register `{locale}` translations: {errors:?}")
        })?;

        Ok(Self { bundle, ids })
    }
}
