//! Page type for paginated list results.

use std::collections::HashSet;

use serde::Deserialize;

use crate::model::Keyed;

/// One fetched page of a list, in server order.
///
/// A page is never edited in place. Removing rows after a bulk action
/// produces a new page with [`ResultPage::without_ids`].
///
/// # Example
///
/// ```ignore
/// let page = fetcher.fetch(&descriptor).await?;
///
/// for notice in page.items() {
///     println!("{} {}", notice.notice_id, notice.title);
/// }
/// println!("of {} pages", page.total_pages());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultPage<T> {
    items: Vec<T>,
    total_pages: u32,
}

impl<T> ResultPage<T> {
    /// Creates a page from items and the backend's page count.
    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self { items, total_pages }
    }

    /// A page with no rows and no pages.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }

    /// Returns a reference to the rows.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page and returns the rows.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total number of pages for the current filters.
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T: Keyed + Clone> ResultPage<T> {
    /// Durable ids of the rows, in order.
    pub fn ids(&self) -> Vec<T::Id> {
        self.items.iter().map(Keyed::id).collect()
    }

    /// A new page without the rows whose id is in `ids`.
    ///
    /// The page count is kept as fetched; the next fetch corrects it.
    pub fn without_ids(&self, ids: &HashSet<T::Id>) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| !ids.contains(&item.id()))
                .cloned()
                .collect(),
            total_pages: self.total_pages,
        }
    }
}

impl<T> Default for ResultPage<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// A list response body in either shape the backend uses.
///
/// Paginated endpoints answer `{ "content": [...], "totalPages": n }`;
/// unpaginated ones answer a bare array. Without a page count, rows make
/// one page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PageBody<T> {
    Paged {
        content: Vec<T>,
        #[serde(rename = "totalPages", default)]
        total_pages: Option<u32>,
    },
    Bare(Vec<T>),
}

impl<T> From<PageBody<T>> for ResultPage<T> {
    fn from(body: PageBody<T>) -> Self {
        match body {
            PageBody::Paged {
                content,
                total_pages,
            } => {
                let total_pages = total_pages.unwrap_or_else(|| u32::from(!content.is_empty()));
                ResultPage::new(content, total_pages)
            }
            PageBody::Bare(items) => {
                let total_pages = u32::from(!items.is_empty());
                ResultPage::new(items, total_pages)
            }
        }
    }
}
