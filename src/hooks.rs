use time::OffsetDateTime;

use crate::page::Page;

const DISMISS_KEY: &str = "Escape";

pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

/// Writes `year` into the footer element. Returns `false` if the page has no
/// such element.
pub fn write_footer_year<P: Page>(page: &mut P, element_id: &str, year: i32) -> bool {
    let written = page.set_text_by_id(element_id, &year.to_string());
    if !written {
        tracing::debug!(element_id, "no footer year element");
    }
    written
}

/// Closes a fragment-anchored modal on Escape by returning to `home_fragment`.
pub fn dismiss_modal<P: Page>(page: &mut P, key: &str, home_fragment: &str) -> bool {
    if key != DISMISS_KEY {
        return false;
    }

    let fragment = page.fragment();
    if fragment.is_empty() || fragment == home_fragment {
        return false;
    }

    tracing::debug!(%fragment, "dismissing modal");
    page.set_fragment(home_fragment);
    true
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::page::memory::{MemoryElement, MemoryPage};

    #[rstest]
    fn footer_year_is_written() {
        let mut page = MemoryPage::new();
        let year = page.push(MemoryElement::new().with_id("year").with_text("2020"));

        assert!(write_footer_year(&mut page, "year", 2026));
        assert_eq!(page.element(year).unwrap().text(), "2026");
    }

    #[rstest]
    fn missing_footer_element_is_skipped() {
        let mut page = MemoryPage::new();
        page.push(MemoryElement::new().with_id("footer"));

        assert!(!write_footer_year(&mut page, "year", 2026));
        assert_eq!(page.mutations(), 0);
    }

    #[rstest]
    fn current_year_is_plausible() {
        assert!(current_year() >= 2024);
    }

    #[rstest]
    #[case("#impressum")]
    #[case("#privacy")]
    fn escape_closes_open_modal(#[case] fragment: &str) {
        let mut page = MemoryPage::new().with_fragment(fragment);

        assert!(dismiss_modal(&mut page, "Escape", "#top"));
        assert_eq!(page.fragment(), "#top");
    }

    #[rstest]
    #[case("Escape", "")]
    #[case("Escape", "#top")]
    #[case("Enter", "#impressum")]
    #[case("Esc", "#impressum")]
    fn other_situations_leave_fragment(#[case] key: &str, #[case] fragment: &str) {
        let mut page = MemoryPage::new().with_fragment(fragment);

        assert!(!dismiss_modal(&mut page, key, "#top"));
        assert_eq!(page.fragment(), fragment);
    }
}
