//! Headless page and store, for rendering without a browser.

use std::collections::{BTreeMap, HashMap};

use url::Url;

use crate::internationalization::{TranslationKey, TrustedHtml};

use super::{
    Page, PreferenceStore, Slot, LANGUAGE_CODE_ATTRIBUTE, LANGUAGE_SELECTOR_CLASS,
    PRESSED_ATTRIBUTE,
};

#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    html: Option<String>,
}

impl MemoryElement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Element annotated for `slot` with `key`.
    pub fn annotated(slot: Slot, key: &str) -> Self {
        Self::new().with_attribute(slot.attribute(), key)
    }

    /// Language selector button for `code`.
    pub fn language_selector(code: &str) -> Self {
        Self::new()
            .with_class(LANGUAGE_SELECTOR_CLASS)
            .with_attribute(LANGUAGE_CODE_ATTRIBUTE, code)
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn inner_html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// In-memory [`Page`] that records every mutation it receives.
#[derive(Debug, Default)]
pub struct MemoryPage {
    elements: Vec<MemoryElement>,
    fragment: String,
    alerts: Vec<String>,
    navigations: Vec<Url>,
    mutations: usize,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an element and returns its node handle.
    pub fn push(&mut self, element: MemoryElement) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    pub fn element(&self, node: usize) -> Option<&MemoryElement> {
        self.elements.get(node)
    }

    pub fn elements(&self) -> &[MemoryElement] {
        &self.elements
    }

    pub fn with_fragment(mut self, fragment: &str) -> Self {
        self.fragment = fragment.to_string();
        self
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn navigations(&self) -> &[Url] {
        &self.navigations
    }

    /// Number of DOM writes seen so far.
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    fn element_mut(&mut self, node: usize) -> Option<&mut MemoryElement> {
        let element = self.elements.get_mut(node)?;
        self.mutations += 1;
        Some(element)
    }
}

impl Page for MemoryPage {
    type Node = usize;

    fn annotated(&self, slot: Slot) -> Vec<(usize, TranslationKey)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(node, element)| {
                element
                    .attribute(slot.attribute())
                    .map(|key| (node, TranslationKey::new(key)))
            })
            .collect()
    }

    fn set_text(&mut self, node: &usize, text: &str) {
        if let Some(element) = self.element_mut(*node) {
            element.text = text.to_string();
            element.html = None;
        }
    }

    fn set_placeholder(&mut self, node: &usize, text: &str) {
        if let Some(element) = self.element_mut(*node) {
            element
                .attributes
                .insert("placeholder".to_string(), text.to_string());
        }
    }

    fn set_html(&mut self, node: &usize, html: &TrustedHtml) {
        if let Some(element) = self.element_mut(*node) {
            element.html = Some(html.as_str().to_string());
        }
    }

    fn language_selectors(&self) -> Vec<(usize, String)> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, element)| element.has_class(LANGUAGE_SELECTOR_CLASS))
            .filter_map(|(node, element)| {
                element
                    .attribute(LANGUAGE_CODE_ATTRIBUTE)
                    .map(|code| (node, code.to_string()))
            })
            .collect()
    }

    fn set_pressed(&mut self, node: &usize, pressed: bool) {
        if let Some(element) = self.element_mut(*node) {
            element
                .attributes
                .insert(PRESSED_ATTRIBUTE.to_string(), pressed.to_string());
        }
    }

    fn set_text_by_id(&mut self, id: &str, text: &str) -> bool {
        let node = self
            .elements
            .iter()
            .position(|element| element.id.as_deref() == Some(id));
        match node {
            Some(node) => {
                self.set_text(&node, text);
                true
            }
            None => false,
        }
    }

    fn fragment(&self) -> String {
        self.fragment.clone()
    }

    fn set_fragment(&mut self, fragment: &str) {
        self.fragment = fragment.to_string();
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn navigate(&mut self, url: &Url) {
        self.navigations.push(url.clone());
    }
}

/// In-memory [`PreferenceStore`] counting writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> eyre::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn finds_annotated_elements_per_slot() {
        let mut page = MemoryPage::new();
        let title = page.push(MemoryElement::annotated(Slot::Text, "hero.title"));
        let input = page.push(MemoryElement::annotated(Slot::Placeholder, "contact.form.namePh"));
        page.push(MemoryElement::new().with_text("plain"));

        assert_eq!(page.annotated(Slot::Text), vec![(title, TranslationKey::from("hero.title"))]);
        assert_eq!(
            page.annotated(Slot::Placeholder),
            vec![(input, TranslationKey::from("contact.form.namePh"))]
        );
        assert!(page.annotated(Slot::Html).is_empty());
    }

    #[rstest]
    fn selectors_need_class_and_code() {
        let mut page = MemoryPage::new();
        let de = page.push(MemoryElement::language_selector("de"));
        page.push(MemoryElement::new().with_class(LANGUAGE_SELECTOR_CLASS));
        page.push(MemoryElement::new().with_attribute(LANGUAGE_CODE_ATTRIBUTE, "en"));

        assert_eq!(page.language_selectors(), vec![(de, "de".to_string())]);
    }

    #[rstest]
    fn set_text_by_id_reports_absent_element() {
        let mut page = MemoryPage::new();
        let year = page.push(MemoryElement::new().with_id("year"));

        assert!(page.set_text_by_id("year", "2026"));
        assert!(!page.set_text_by_id("missing", "2026"));
        assert_eq!(page.element(year).unwrap().text(), "2026");
        assert_eq!(page.mutations(), 1);
    }

    #[rstest]
    fn store_counts_writes() {
        let mut store = MemoryStore::new().with_value("lang", "en");

        assert_eq!(store.load("lang").as_deref(), Some("en"));
        store.save("lang", "de").unwrap();
        assert_eq!(store.load("lang").as_deref(), Some("de"));
        assert_eq!(store.writes(), 1);
    }
}
