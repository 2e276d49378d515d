use super::params::lenient;
use crate::config::PaginationConfig;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QuerySelect, Select};
use serde::Deserialize;

/// Raw paging parameters as sent by the client. Anything out of range is
/// normalized by [`PageWindow::normalize`], never rejected.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub records_per_page: Option<i64>,
}

/// A normalized, 1-based page of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u64,
    size: u64,
}

impl PageWindow {
    #[must_use]
    pub fn normalize(request: PageRequest, config: &PaginationConfig) -> Self {
        let page = request
            .page
            .and_then(|p| u64::try_from(p).ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        let size = request
            .records_per_page
            .and_then(|s| u64::try_from(s).ok())
            .filter(|s| *s > 0)
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);

        Self { page, size }
    }

    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Records matching the filter, ignoring the window.
    pub total: u64,
    pub window: PageWindow,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.window.size)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            window: self.window,
        }
    }
}

/// Counts the filtered query, then fetches the requested window of it.
///
/// The count and the window come from the same `Select`, so filtering is
/// expressed once and the total reflects the filter but not the window. A
/// window starting at or past the total is empty without a second query.
pub async fn fetch_page<'db, E, C>(
    query: Select<E>,
    window: PageWindow,
    db: &'db C,
) -> Result<Page<E::Model>, DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Send + Sync + 'db,
{
    let total = query.clone().count(db).await?;
    if window.offset() >= total {
        return Ok(Page {
            items: Vec::new(),
            total,
            window,
        });
    }

    let items = query
        .limit(window.size())
        .offset(window.offset())
        .all(db)
        .await?;

    Ok(Page {
        items,
        total,
        window,
    })
}
