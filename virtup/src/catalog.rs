//! Online distro image catalog listing.
//!
//! The catalog is an HTML index page whose list items name the available
//! images. The markup is not a documented contract, so the extraction sits
//! behind [`CatalogParser`] and can be swapped or faked without touching the
//! fetch path.

use crate::errors::VirtupResult;
use regex::Regex;
use tracing::warn;

/// Extracts distro names from the catalog page markup.
pub trait CatalogParser {
    fn distros(&self, html: &str) -> Vec<String>;
}

/// Pulls the text of every `<li>` element, tags stripped.
pub struct ListItemParser {
    item: Regex,
    tag: Regex,
}

impl ListItemParser {
    pub fn new() -> Self {
        Self {
            item: Regex::new(r"(?is)<li[^>]*>(.*?)</li>").expect("static regex"),
            tag: Regex::new(r"(?s)<[^>]*>").expect("static regex"),
        }
    }
}

impl Default for ListItemParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogParser for ListItemParser {
    fn distros(&self, html: &str) -> Vec<String> {
        self.item
            .captures_iter(html)
            .map(|cap| self.tag.replace_all(&cap[1], "").trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Fetch the catalog page. One attempt, no retry.
pub fn fetch_catalog(url: &str) -> VirtupResult<String> {
    let body = reqwest::blocking::get(url)?.error_for_status()?.text()?;
    Ok(body)
}

/// List the images available online: fetched, parsed, sorted,
/// de-duplicated.
///
/// A failed fetch degrades to an empty listing with a warning; listing is a
/// convenience and should never leave a non-zero exit behind.
pub fn list_online(url: &str, parser: &dyn CatalogParser) -> Vec<String> {
    let html = match fetch_catalog(url) {
        Ok(html) => html,
        Err(e) => {
            warn!("could not fetch image catalog from {}: {}", url, e);
            return Vec::new();
        }
    };

    let mut names = parser.distros(&html);
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <h1>Images</h1>
        <ul>
          <li><a href="/images/debian-12/">debian-12</a></li>
          <li class="new"><a href="/images/fedora-40/">fedora-40</a></li>
          <li><a href="/images/centos-9/">centos-9</a></li>
          <li><a href="/images/debian-12/">debian-12</a></li>
          <li>   </li>
        </ul>
        </body></html>
    "#;

    #[test]
    fn extracts_list_item_text() {
        let parser = ListItemParser::new();
        let names = parser.distros(PAGE);
        assert_eq!(names, vec!["debian-12", "fedora-40", "centos-9", "debian-12"]);
    }

    #[test]
    fn listing_is_sorted_and_deduplicated() {
        let parser = ListItemParser::new();
        let mut names = parser.distros(PAGE);
        names.sort();
        names.dedup();
        assert_eq!(names, vec!["centos-9", "debian-12", "fedora-40"]);
    }

    #[test]
    fn multiline_items_are_handled() {
        let parser = ListItemParser::new();
        let names = parser.distros("<li>\n  <a href=\"x\">\n  ubuntu-24.04\n  </a>\n</li>");
        assert_eq!(names, vec!["ubuntu-24.04"]);
    }

    #[test]
    fn pages_without_items_yield_nothing() {
        let parser = ListItemParser::new();
        assert!(parser.distros("<html><p>no lists here</p></html>").is_empty());
    }
}
