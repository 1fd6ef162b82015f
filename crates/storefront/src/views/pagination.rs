//! Pagination links.

use url::form_urlencoded;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// Links for a paged listing.
///
/// Every link keeps the listing's active filters and sets `page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub pages: u32,
    pub links: Vec<PageLink>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl Pagination {
    /// Build links under `base_path`, carrying the non-empty `query` pairs.
    #[must_use]
    pub fn new(page: u32, pages: u32, base_path: &str, query: &[(&str, String)]) -> Self {
        let pages = pages.max(1);
        let page = page.clamp(1, pages);
        let href = |number: u32| page_href(base_path, query, number);

        Self {
            page,
            pages,
            links: (1..=pages)
                .map(|number| PageLink {
                    number,
                    href: href(number),
                    current: number == page,
                })
                .collect(),
            prev: (page > 1).then(|| href(page - 1)),
            next: (page < pages).then(|| href(page + 1)),
        }
    }

    /// Whether there is more than one page to link.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.pages > 1
    }
}

fn page_href(base_path: &str, query: &[(&str, String)], page: u32) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        if !value.trim().is_empty() {
            serializer.append_pair(key, value.trim());
        }
    }
    serializer.append_pair("page", &page.to_string());
    format!("{base_path}?{}", serializer.finish())
}
