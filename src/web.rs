//! Browser bindings: the `web-sys` side of [`Page`] and [`PreferenceStore`],
//! and the event wiring that boots the landing page once the DOM is parsed.

mod console;

use std::{cell::RefCell, rc::Rc};

use url::Url;
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{Document, Element, Event, EventTarget, KeyboardEvent, Storage, Window};

use crate::{
    config::Config,
    contact::ContactForm,
    hooks,
    internationalization::{TranslationKey, Translations, TrustedHtml},
    landing::Landing,
    page::{
        Page, PreferenceStore, Slot, LANGUAGE_CODE_ATTRIBUTE, LANGUAGE_SELECTOR_CLASS,
        PRESSED_ATTRIBUTE,
    },
};

/// Element holding an optional JSON [`Config`].
const CONFIG_ELEMENT_ID: &str = "landing-config";

const FORM_FIELDS: [&str; 4] = ["name", "email", "website", "message"];

fn js_error(error: JsValue) -> eyre::Report {
    eyre::eyre!("{error:?}")
}

#[derive(Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => (0..list.length())
                .filter_map(|index| list.get(index))
                .filter_map(|node| node.dyn_into::<Element>().ok())
                .collect(),
            Err(error) => {
                tracing::warn!(?error, selector, "selector query failed");
                Vec::new()
            }
        }
    }
}

fn field_value(form: &Element, field: &str) -> String {
    form.query_selector(&format!("[name=\"{field}\"]"))
        .ok()
        .flatten()
        .and_then(|element| js_sys::Reflect::get(&element, &JsValue::from_str("value")).ok())
        .and_then(|value| value.as_string())
        .unwrap_or_default()
}

/// Reads the named fields below `form`. Absent fields read as empty.
pub fn read_contact_form(form: &Element) -> ContactForm {
    let [name, email, website, message] = FORM_FIELDS.map(|field| field_value(form, field));
    ContactForm {
        name,
        email,
        website,
        message,
    }
}

impl Page for WebPage {
    type Node = Element;

    fn annotated(&self, slot: Slot) -> Vec<(Element, TranslationKey)> {
        let attribute = slot.attribute();
        self.query_all(&format!("[{attribute}]"))
            .into_iter()
            .filter_map(|element| {
                let key = element.get_attribute(attribute)?;
                Some((element, TranslationKey::new(key)))
            })
            .collect()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_placeholder(&mut self, node: &Element, text: &str) {
        if let Err(error) = node.set_attribute("placeholder", text) {
            tracing::warn!(?error, "failed to set placeholder");
        }
    }

    fn set_html(&mut self, node: &Element, html: &TrustedHtml) {
        node.set_inner_html(html.as_str());
    }

    fn language_selectors(&self) -> Vec<(Element, String)> {
        self.query_all(&format!(".{LANGUAGE_SELECTOR_CLASS}"))
            .into_iter()
            .filter_map(|element| {
                let code = element.get_attribute(LANGUAGE_CODE_ATTRIBUTE)?;
                Some((element, code))
            })
            .collect()
    }

    fn set_pressed(&mut self, node: &Element, pressed: bool) {
        let value = if pressed { "true" } else { "false" };
        if let Err(error) = node.set_attribute(PRESSED_ATTRIBUTE, value) {
            tracing::warn!(?error, "failed to reflect language selector");
        }
    }

    fn set_text_by_id(&mut self, id: &str, text: &str) -> bool {
        match self.document.get_element_by_id(id) {
            Some(element) => {
                element.set_text_content(Some(text));
                true
            }
            None => false,
        }
    }

    fn fragment(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn set_fragment(&mut self, fragment: &str) {
        if let Err(error) = self.window.location().set_hash(fragment) {
            tracing::warn!(?error, fragment, "failed to set fragment");
        }
    }

    fn alert(&mut self, message: &str) {
        if let Err(error) = self.window.alert_with_message(message) {
            tracing::warn!(?error, "failed to show alert");
        }
    }

    fn navigate(&mut self, url: &Url) {
        if let Err(error) = self.window.location().set_href(url.as_str()) {
            tracing::error!(?error, "failed to open mail link");
        }
    }
}

/// `localStorage`, if the browser grants access to it.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn new(window: &Window) -> Self {
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            tracing::warn!("local storage unavailable, language preference will not persist");
        }
        Self { storage }
    }
}

impl PreferenceStore for LocalStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn save(&mut self, key: &str, value: &str) -> eyre::Result<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| eyre::eyre!("local storage unavailable"))?;
        storage
            .set_item(key, value)
            .map_err(|error| eyre::eyre!("failed to write `{key}`: {error:?}"))
    }
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> eyre::Result<()> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .map_err(js_error)?;
    closure.forget();
    Ok(())
}

type SharedLanding = Rc<RefCell<Landing<LocalStorage>>>;

fn bind_language_selectors(page: &WebPage, landing: &SharedLanding) -> eyre::Result<()> {
    for (button, _) in page.language_selectors() {
        let landing = landing.clone();
        let mut page = page.clone();
        let target = button.clone();
        listen(&target, "click", move |_| {
            if let Some(code) = button.get_attribute(LANGUAGE_CODE_ATTRIBUTE) {
                landing.borrow_mut().select_language(&mut page, &code);
            }
        })?;
    }
    Ok(())
}

fn bind_contact_form(page: &WebPage, landing: &SharedLanding) -> eyre::Result<()> {
    let form_id = landing.borrow().config().contact_form_id.clone();
    let Some(form) = page.document.get_element_by_id(&form_id) else {
        tracing::debug!(%form_id, "no contact form");
        return Ok(());
    };

    let landing = landing.clone();
    let mut page = page.clone();
    let target = form.clone();
    listen(&target, "submit", move |event| {
        event.prevent_default();
        let contact = read_contact_form(&form);
        landing.borrow().submit(&mut page, &contact);
    })
}

fn bind_escape(page: &WebPage, landing: &SharedLanding) -> eyre::Result<()> {
    let landing = landing.clone();
    let mut target = page.clone();
    listen(&page.document, "keydown", move |event| {
        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
            landing.borrow().key_down(&mut target, &event.key());
        }
    })
}

fn read_config(document: &Document) -> eyre::Result<Config> {
    match document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    {
        Some(json) => Config::from_json(&json),
        None => Ok(Config::default()),
    }
}

fn boot(window: Window, document: Document) -> eyre::Result<()> {
    let config = read_config(&document);
    let log_filter = config
        .as_ref()
        .map(|config| config.log_filter.as_str())
        .unwrap_or("info");
    console::init(log_filter);
    let config = config.unwrap_or_else(|error| {
        tracing::error!(?error, "falling back to default config");
        Config::default()
    });

    let translations = Translations::load()?;
    let store = LocalStorage::new(&window);
    let landing = Rc::new(RefCell::new(Landing::new(config, translations, store)));
    let mut page = WebPage::new(window, document);

    let locale = landing.borrow_mut().start(&mut page, hooks::current_year());
    tracing::info!(%locale, "landing page ready");

    bind_language_selectors(&page, &landing)?;
    bind_contact_form(&page, &landing)?;
    bind_escape(&page, &landing)?;
    Ok(())
}

fn boot_or_report(window: Window, document: Document) -> Result<(), JsValue> {
    boot(window, document).map_err(|error| JsValue::from_str(&format!("{error:?}")))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() != "loading" {
        return boot_or_report(window, document);
    }

    let target = document.clone();
    let ready = Closure::<dyn FnMut()>::new(move || {
        if let Err(error) = boot_or_report(window.clone(), document.clone()) {
            web_sys::console::error_1(&error);
        }
    });
    target.add_event_listener_with_callback("DOMContentLoaded", ready.as_ref().unchecked_ref())?;
    ready.forget();
    Ok(())
}
