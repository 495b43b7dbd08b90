use crate::{
    internationalization::{Locale, Translations, DEFAULT_LOCALE},
    page::{Page, PreferenceStore, Slot},
};

/// Holds the active locale for the page session and keeps the page and the
/// stored preference in step with it.
pub struct LanguageController<S> {
    store: S,
    storage_key: String,
    current: Locale,
}

impl<S: PreferenceStore> LanguageController<S> {
    pub fn new(store: S, storage_key: impl Into<String>) -> Self {
        Self {
            store,
            storage_key: storage_key.into(),
            current: DEFAULT_LOCALE,
        }
    }

    pub fn current(&self) -> Locale {
        self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Restores the stored locale (or the default) and renders the page in it.
    pub fn initialize<P: Page>(&mut self, page: &mut P, translations: &Translations) -> Locale {
        self.current = match self.store.load(&self.storage_key) {
            Some(code) => code.parse::<Locale>().unwrap_or_else(|error| {
                tracing::warn!(?error, "ignoring stored language preference");
                DEFAULT_LOCALE
            }),
            None => DEFAULT_LOCALE,
        };
        tracing::info!(locale = %self.current, "initializing language");

        render(page, translations, self.current);
        reflect_selectors(page, self.current);
        self.current
    }

    /// Switches to `locale`. Returns `false` without touching anything if it is
    /// already active.
    pub fn set_locale<P: Page>(
        &mut self,
        page: &mut P,
        translations: &Translations,
        locale: Locale,
    ) -> bool {
        if locale == self.current {
            return false;
        }

        self.current = locale;
        if let Err(error) = self.store.save(&self.storage_key, locale.code()) {
            tracing::warn!(?error, %locale, "failed to persist language preference");
        }
        render(page, translations, locale);
        reflect_selectors(page, locale);
        tracing::info!(%locale, "switched language");
        true
    }

    /// Entry point for a selector click carrying a raw locale code.
    pub fn select<P: Page>(&mut self, page: &mut P, translations: &Translations, code: &str) -> bool {
        match code.parse::<Locale>() {
            Ok(locale) => self.set_locale(page, translations, locale),
            Err(error) => {
                tracing::debug!(?error, "ignoring language selector");
                false
            }
        }
    }
}

/// Applies every annotated element's translation for `locale`. Elements whose
/// key has no value keep their content.
fn render<P: Page>(page: &mut P, translations: &Translations, locale: Locale) {
    let mut applied = 0usize;
    let mut skipped = 0usize;

    for slot in Slot::ALL {
        for (node, key) in page.annotated(slot) {
            let done = match slot {
                Slot::Text => translations
                    .text(locale, &key)
                    .map(|text| page.set_text(&node, &text)),
                Slot::Placeholder => translations
                    .text(locale, &key)
                    .map(|text| page.set_placeholder(&node, &text)),
                Slot::Html => translations
                    .html(locale, &key)
                    .map(|html| page.set_html(&node, &html)),
            };
            if done.is_some() {
                applied += 1;
            } else {
                tracing::debug!(%locale, %key, "no translation, keeping content");
                skipped += 1;
            }
        }
    }

    tracing::debug!(%locale, applied, skipped, "applied translations");
}

fn reflect_selectors<P: Page>(page: &mut P, locale: Locale) {
    for (node, code) in page.language_selectors() {
        page.set_pressed(&node, code == locale.code());
    }
}
