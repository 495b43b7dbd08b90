//! Turns the contact form into a prefilled `mailto:` draft. Nothing is sent
//! from here; the user's mail client takes over once the link is opened.

use std::fmt;

use askama::Template;
use eyre::Context;
use url::{form_urlencoded, Url};

use crate::{
    internationalization::{Locale, TranslationKey, Translations, DEFAULT_LOCALE},
    page::Page,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub website: String,
    pub message: String,
}

/// Trimmed form fields that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidContact<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub website: Option<&'a str>,
    pub message: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub Vec<&'static str>);

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required fields: {}", self.0.join(", "))
    }
}

impl std::error::Error for MissingFields {}

impl ContactForm {
    pub fn validate(&self) -> Result<ValidContact<'_>, MissingFields> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        let missing: Vec<_> = [("name", name), ("email", email), ("message", message)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(MissingFields(missing));
        }

        let website = Some(self.website.trim()).filter(|website| !website.is_empty());
        Ok(ValidContact {
            name,
            email,
            website,
            message,
        })
    }
}

#[derive(Template)]
#[template(
    ext = "txt",
    source = "{{ name_label }}: {{ name }}\n{{ email_label }}: {{ email }}\n{% if let Some(website) = website %}{{ website_label }}: {{ website }}\n{% endif %}{{ message_label }}:\n{{ message }}"
)]
struct MailBody<'a> {
    name_label: &'a str,
    name: &'a str,
    email_label: &'a str,
    email: &'a str,
    website_label: &'a str,
    website: Option<&'a str>,
    message_label: &'a str,
    message: &'a str,
}

fn t(translations: &Translations, locale: Locale, key: &str, fallback: &str) -> String {
    translations
        .text(locale, &TranslationKey::from(key))
        .unwrap_or_else(|| fallback.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailDraft {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl MailDraft {
    pub fn compose(
        contact: &ValidContact<'_>,
        translations: &Translations,
        locale: Locale,
        recipient: &str,
    ) -> eyre::Result<Self> {
        let name_label = t(translations, locale, "contact.form.name", "Name");
        let email_label = t(translations, locale, "contact.form.email", "E-Mail");
        let website_label = t(translations, locale, "contact.form.website", "Website");
        let message_label = t(translations, locale, "contact.form.message", "Nachricht");

        let body = MailBody {
            name_label: &name_label,
            name: contact.name,
            email_label: &email_label,
            email: contact.email,
            website_label: &website_label,
            website: contact.website,
            message_label: &message_label,
            message: contact.message,
        }
        .render()
        .context("failed to render mail body")?;

        Ok(Self {
            recipient: recipient.to_string(),
            subject: t(translations, locale, "contact.email.subject", "Anfrage"),
            body,
        })
    }

    pub fn to_url(&self) -> eyre::Result<Url> {
        let href = format!(
            "mailto:{}?subject={}&body={}",
            encode_component(&self.recipient).replace("%40", "@"),
            encode_component(&self.subject),
            encode_component(&self.body),
        );
        Url::parse(&href).with_context(|| format!("invalid mail link for `{}`", self.recipient))
    }
}

/// Percent-encodes `value` for a `mailto:` header field. Spaces become `%20`
/// since mail clients do not read `+` as a space.
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[derive(Debug)]
pub enum Submission {
    Rejected(MissingFields),
    Drafted(Url),
    Failed,
}

/// Validates `form` and opens the mail draft on `page`, or tells the user
/// what is missing.
pub fn submit<P: Page>(
    page: &mut P,
    translations: &Translations,
    locale: Locale,
    recipient: &str,
    form: &ContactForm,
) -> Submission {
    let contact = match form.validate() {
        Ok(contact) => contact,
        Err(missing) => {
            tracing::info!(%missing, %locale, "contact form rejected");
            let key = TranslationKey::from("contact.error");
            let message = translations
                .text(locale, &key)
                .or_else(|| translations.text(DEFAULT_LOCALE, &key))
                .unwrap_or_else(|| missing.to_string());
            page.alert(&message);
            return Submission::Rejected(missing);
        }
    };

    let url = MailDraft::compose(&contact, translations, locale, recipient)
        .and_then(|draft| draft.to_url());
    match url {
        Ok(url) => {
            tracing::info!(%locale, has_website = contact.website.is_some(), "opening mail draft");
            page.navigate(&url);
            Submission::Drafted(url)
        }
        Err(error) => {
            tracing::error!(?error, "failed to build mail link");
            Submission::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::{fixture, rstest};

    use super::*;
    use crate::page::memory::MemoryPage;

    const RECIPIENT: &str = "hello@example.com";

    #[fixture]
    fn translations() -> Translations {
        Translations::load().unwrap()
    }

    fn form(name: &str, email: &str, website: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            website: website.to_string(),
            message: message.to_string(),
        }
    }

    fn decoded(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    fn drafted(submission: Submission) -> Url {
        match submission {
            Submission::Drafted(url) => url,
            other => panic!("expected a draft, got {other:?}"),
        }
    }

    #[rstest]
    fn anna_without_website_gets_four_lines(translations: Translations) {
        let mut page = MemoryPage::new();
        let submission = submit(
            &mut page,
            &translations,
            Locale::De,
            RECIPIENT,
            &form("Anna", "anna@example.com", "", "Test"),
        );

        let url = drafted(submission);
        let query = decoded(&url);
        let lines: Vec<_> = query["body"].lines().collect();

        assert_eq!(
            lines,
            vec!["Name: Anna", "E-Mail: anna@example.com", "Nachricht:", "Test"]
        );
        assert!(!query["body"].contains("Website"));
        assert_eq!(query["subject"], "Anfrage: Landingpage Copy");
        assert_eq!(page.navigations(), &[url]);
        assert!(page.alerts().is_empty());
    }

    #[rstest]
    fn website_line_sits_between_email_and_message(translations: Translations) {
        let mut page = MemoryPage::new();
        let url = drafted(submit(
            &mut page,
            &translations,
            Locale::En,
            RECIPIENT,
            &form("Anna", "anna@example.com", "  https://anna.test ", "Hello\nthere"),
        ));

        let query = decoded(&url);
        assert_eq!(
            query["body"],
            "Name: Anna\nEmail: anna@example.com\nWebsite URL: https://anna.test\nMessage:\nHello\nthere"
        );
        assert_eq!(query["subject"], "Request: Landing page copy");
    }

    #[rstest]
    #[case(form("Anna", "anna@example.com", "", ""), vec!["message"])]
    #[case(form("  ", "anna@example.com", "", "Test"), vec!["name"])]
    #[case(form("", "\t", "https://anna.test", " "), vec!["name", "email", "message"])]
    fn missing_required_field_aborts(
        translations: Translations,
        #[case] contact: ContactForm,
        #[case] expected: Vec<&'static str>,
    ) {
        let mut page = MemoryPage::new();
        let submission = submit(&mut page, &translations, Locale::De, RECIPIENT, &contact);

        match submission {
            Submission::Rejected(MissingFields(fields)) => assert_eq!(fields, expected),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(page.alerts(), &["Bitte fülle alle Pflichtfelder aus.".to_string()]);
        assert!(page.navigations().is_empty());
        assert_eq!(page.mutations(), 0);
    }

    #[rstest]
    fn rejection_message_follows_locale(translations: Translations) {
        let mut page = MemoryPage::new();
        submit(&mut page, &translations, Locale::En, RECIPIENT, &ContactForm::default());

        assert_eq!(page.alerts(), &["Please fill all required fields.".to_string()]);
    }

    #[rstest]
    fn link_is_percent_encoded(translations: Translations) {
        let contact = ContactForm {
            name: "Jörg Müller".to_string(),
            email: "j@m.test".to_string(),
            website: String::new(),
            message: "1+1 = 2 & more?".to_string(),
        };
        let valid = contact.validate().unwrap();
        let draft = MailDraft::compose(&valid, &translations, Locale::De, RECIPIENT).unwrap();
        let url = draft.to_url().unwrap();

        assert_eq!(url.scheme(), "mailto");
        assert_eq!(url.path(), RECIPIENT);
        assert!(url
            .as_str()
            .starts_with("mailto:hello@example.com?subject=Anfrage%3A%20Landingpage%20Copy&body="));
        assert!(url.as_str().contains("J%C3%B6rg%20M%C3%BCller%0A"));
        assert!(!url.as_str().contains('+'));
        assert!(!url.as_str().contains(' '));
        assert_eq!(decoded(&url)["body"], draft.body);
        assert!(draft.body.ends_with("Nachricht:\n1+1 = 2 & more?"));
    }

    #[rstest]
    #[case("a?b#c%d@example.com", "a%3Fb%23c%25d@example.com")]
    #[case("first last@example.com", "first%20last@example.com")]
    #[case("a+tag@example.com", "a%2Btag@example.com")]
    fn recipient_cannot_break_out_of_the_address(
        translations: Translations,
        #[case] recipient: &str,
        #[case] path: &str,
    ) {
        let contact = form("Anna", "anna@example.com", "", "Test");
        let draft =
            MailDraft::compose(&contact.validate().unwrap(), &translations, Locale::De, recipient)
                .unwrap();
        let url = draft.to_url().unwrap();

        assert_eq!(url.path(), path);
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query_pairs().count(), 2);
        assert_eq!(decoded(&url)["subject"], "Anfrage: Landingpage Copy");
    }

    #[rstest]
    fn labels_fall_back_when_table_lacks_them() {
        let translations =
            Translations::from_sources(&[(Locale::En, "contact-form-name = Your name\n")])
                .unwrap();
        let contact = form("Anna", "anna@example.com", "anna.test", "Hi");
        let draft = MailDraft::compose(
            &contact.validate().unwrap(),
            &translations,
            Locale::En,
            RECIPIENT,
        )
        .unwrap();

        assert_eq!(draft.subject, "Anfrage");
        assert_eq!(
            draft.body,
            "Your name: Anna\nE-Mail: anna@example.com\nWebsite: anna.test\nNachricht:\nHi"
        );
    }

    #[rstest]
    fn validate_trims_fields() {
        let contact = form(" Anna ", " anna@example.com\n", "   ", "\tTest ");

        assert_eq!(
            contact.validate().unwrap(),
            ValidContact {
                name: "Anna",
                email: "anna@example.com",
                website: None,
                message: "Test",
            }
        );
    }
}
