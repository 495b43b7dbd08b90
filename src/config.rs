use eyre::Context;
use serde::Deserialize;

fn default_recipient() -> String {
    "hello@example.com".to_string()
}

fn default_storage_key() -> String {
    "lang".to_string()
}

fn default_home_fragment() -> String {
    "#top".to_string()
}

fn default_year_element_id() -> String {
    "year".to_string()
}

fn default_contact_form_id() -> String {
    "contactForm".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the contact form drafts are addressed to.
    #[serde(default = "default_recipient")]
    pub recipient: String,

    /// Storage key holding the selected language code.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Fragment meaning "no modal open".
    #[serde(default = "default_home_fragment")]
    pub home_fragment: String,

    #[serde(default = "default_year_element_id")]
    pub year_element_id: String,

    #[serde(default = "default_contact_form_id")]
    pub contact_form_id: String,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recipient: default_recipient(),
            storage_key: default_storage_key(),
            home_fragment: default_home_fragment(),
            year_element_id: default_year_element_id(),
            contact_form_id: default_contact_form_id(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> eyre::Result<Self> {
        serde_json::from_str(json).context("failed to parse landing page config")
    }
}
