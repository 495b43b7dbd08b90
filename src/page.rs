//! Contracts with the surrounding page: the annotated markup, the navigation
//! state of the window, and the key-value store the language preference
//! lives in.

pub mod memory;

use url::Url;

use crate::internationalization::{TranslationKey, TrustedHtml};

/// Class carried by language selector buttons.
pub const LANGUAGE_SELECTOR_CLASS: &str = "lang-btn";
/// Attribute naming the locale code of a language selector.
pub const LANGUAGE_CODE_ATTRIBUTE: &str = "data-lang";
/// Attribute reflecting whether a language selector is active.
pub const PRESSED_ATTRIBUTE: &str = "aria-pressed";

/// How a translated value is applied to an annotated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Text,
    Placeholder,
    Html,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Text, Slot::Placeholder, Slot::Html];

    /// Attribute whose value is the translation key.
    pub fn attribute(self) -> &'static str {
        match self {
            Self::Text => "data-i18n",
            Self::Placeholder => "data-i18n-placeholder",
            Self::Html => "data-i18n-html",
        }
    }
}

pub trait Page {
    type Node;

    /// Elements annotated for `slot`, each with the key it names.
    fn annotated(&self, slot: Slot) -> Vec<(Self::Node, TranslationKey)>;

    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn set_placeholder(&mut self, node: &Self::Node, text: &str);

    fn set_html(&mut self, node: &Self::Node, html: &TrustedHtml);

    /// Language selector elements with their raw locale code.
    fn language_selectors(&self) -> Vec<(Self::Node, String)>;

    fn set_pressed(&mut self, node: &Self::Node, pressed: bool);

    /// Replaces the text of the element with `id`. Returns `false` if there
    /// is no such element.
    fn set_text_by_id(&mut self, id: &str, text: &str) -> bool;

    /// Current fragment including the leading `#`, or empty.
    fn fragment(&self) -> String;

    fn set_fragment(&mut self, fragment: &str);

    /// Blocking notification to the user.
    fn alert(&mut self, message: &str);

    fn navigate(&mut self, url: &Url);
}

pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;

    fn save(&mut self, key: &str, value: &str) -> eyre::Result<()>;
}
