use crate::{
    config::Config,
    contact::{self, ContactForm, Submission},
    hooks,
    internationalization::{Locale, Translations},
    language::LanguageController,
    page::{Page, PreferenceStore},
};

/// Page-lifetime state: configuration, the translation tables and the
/// language controller. Each method handles one kind of page event.
pub struct Landing<S> {
    config: Config,
    translations: Translations,
    language: LanguageController<S>,
}

impl<S: PreferenceStore> Landing<S> {
    pub fn new(config: Config, translations: Translations, store: S) -> Self {
        let language = LanguageController::new(store, config.storage_key.clone());
        Self {
            config,
            translations,
            language,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn current_locale(&self) -> Locale {
        self.language.current()
    }

    pub fn store(&self) -> &S {
        self.language.store()
    }

    /// Page ready.
    pub fn start<P: Page>(&mut self, page: &mut P, year: i32) -> Locale {
        let locale = self.language.initialize(page, &self.translations);
        hooks::write_footer_year(page, &self.config.year_element_id, year);
        locale
    }

    pub fn select_language<P: Page>(&mut self, page: &mut P, code: &str) -> bool {
        self.language.select(page, &self.translations, code)
    }

    pub fn set_locale<P: Page>(&mut self, page: &mut P, locale: Locale) -> bool {
        self.language.set_locale(page, &self.translations, locale)
    }

    pub fn submit<P: Page>(&self, page: &mut P, form: &ContactForm) -> Submission {
        contact::submit(
            page,
            &self.translations,
            self.language.current(),
            &self.config.recipient,
            form,
        )
    }

    pub fn key_down<P: Page>(&self, page: &mut P, key: &str) -> bool {
        hooks::dismiss_modal(page, key, &self.config.home_fragment)
    }
}
