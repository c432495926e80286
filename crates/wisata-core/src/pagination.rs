//! Page-number window for list views.
//!
//! Every content list in the dashboard (articles, lodgings, culinary items,
//! handcrafts, destinations, discussions, accounts) shows a row of page
//! buttons between a "previous" and a "next" arrow. Only a few buttons are
//! shown at a time:
//!
//! ```text
//! max_page <= 4          1 2 3 4
//! near the start         1 2 [3] … 20
//! in the middle          8 9 [10] … 20
//! near the end           15 16 17 [18] 19 20
//! ```
//!
//! [`compute_window`] is pure. [`Pagination`] is the small state record a
//! list view keeps for the current page and fires the change callback.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Default page count of a fresh [`Pagination`].
pub const DEFAULT_MAX_PAGE: u32 = 10;

/// Page counts up to this size show every page.
const SMALL_PAGE_COUNT: u32 = 4;

/// Buttons shown before the ellipsis.
const LEADING_BUTTONS: u32 = 3;

/// Buttons shown when the current page is close to the end.
const TRAILING_BUTTONS: u32 = 6;

/// One element of the page-button row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WindowItem {
    /// A clickable page number.
    Page { number: u32, active: bool },
    /// The "…" gap before the last page.
    Ellipsis,
}

impl WindowItem {
    /// Page number, or `None` for an ellipsis.
    pub fn page_number(&self) -> Option<u32> {
        match self {
            WindowItem::Page { number, .. } => Some(*number),
            WindowItem::Ellipsis => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, WindowItem::Page { active: true, .. })
    }
}

/// The visible part of the pagination control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    /// Buttons and ellipses, left to right.
    pub items: Vec<WindowItem>,
    /// Whether the "previous" arrow is enabled.
    pub has_previous: bool,
    /// Whether the "next" arrow is enabled.
    pub has_next: bool,
}

impl PageWindow {
    /// Page numbers of the buttons, in order.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.items.iter().filter_map(WindowItem::page_number).collect()
    }

    /// Whether an ellipsis is shown.
    pub fn has_ellipsis(&self) -> bool {
        self.items.contains(&WindowItem::Ellipsis)
    }
}

impl<'a> IntoIterator for &'a PageWindow {
    type Item = &'a WindowItem;
    type IntoIter = std::slice::Iter<'a, WindowItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Compute which page buttons to show.
///
/// Expects `1 <= current_page <= max_page`, but never panics:
/// - `max_page = 0` yields an empty row
/// - `current_page > max_page` is treated as "near the end"
/// - `current_page = 0` is treated as "near the start" with no active button
///
/// The trailing window never starts below page 1.
pub fn compute_window(current_page: u32, max_page: u32) -> PageWindow {
    let page = |number: u32| WindowItem::Page {
        number,
        active: number == current_page,
    };

    let items: Vec<WindowItem> = if max_page <= SMALL_PAGE_COUNT {
        (1..=max_page).map(page).collect()
    } else if current_page <= max_page - SMALL_PAGE_COUNT {
        let first = if current_page >= SMALL_PAGE_COUNT {
            current_page - (LEADING_BUTTONS - 1)
        } else {
            1
        };
        (first..first + LEADING_BUTTONS)
            .map(page)
            .chain([WindowItem::Ellipsis, page(max_page)])
            .collect()
    } else {
        let first = max_page.saturating_sub(TRAILING_BUTTONS - 1).max(1);
        (first..=max_page).map(page).collect()
    };

    trace!(current_page, max_page, buttons = items.len(), "Computed page window");

    PageWindow {
        items,
        has_previous: current_page > 1,
        has_next: current_page < max_page,
    }
}

/// A navigation request from the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "page", rename_all = "camelCase")]
pub enum Navigation {
    Previous,
    Next,
    Page(u32),
}

/// Current-page state of one pagination control.
///
/// The list view owns this record and passes a callback that refetches the
/// list when the page changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    current_page: u32,
    max_page: u32,
    disabled: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGE)
    }
}

impl Pagination {
    /// Start on page 1 of `max_page`.
    pub fn new(max_page: u32) -> Self {
        Self {
            current_page: 1,
            max_page,
            disabled: false,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn max_page(&self) -> u32 {
        self.max_page
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disable or enable navigation (e.g. while a page is loading).
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Update the page count after a list response.
    ///
    /// The current page is left alone; the window copes with it being past
    /// the end.
    pub fn set_max_page(&mut self, max_page: u32) {
        self.max_page = max_page;
    }

    /// The buttons to render for the current state.
    pub fn window(&self) -> PageWindow {
        compute_window(self.current_page, self.max_page)
    }

    /// Apply a navigation request.
    ///
    /// Returns the new page and calls `on_change` with it when the request is
    /// accepted. Nothing happens while disabled, for an arrow that is
    /// disabled, or for a page outside `1..=max_page`. Selecting the current
    /// page again is accepted and fires the callback.
    pub fn navigate<F>(&mut self, request: Navigation, on_change: F) -> Option<u32>
    where
        F: FnOnce(u32),
    {
        if self.disabled {
            trace!(?request, "Navigation ignored while disabled");
            return None;
        }

        let window = self.window();
        let target = match request {
            Navigation::Previous if window.has_previous => self.current_page - 1,
            Navigation::Next if window.has_next => self.current_page + 1,
            Navigation::Page(page) if (1..=self.max_page).contains(&page) => page,
            _ => return None,
        };

        self.current_page = target;
        on_change(target);
        Some(target)
    }

    /// Go to `page`.
    pub fn select<F: FnOnce(u32)>(&mut self, page: u32, on_change: F) -> Option<u32> {
        self.navigate(Navigation::Page(page), on_change)
    }

    /// Go one page back.
    pub fn previous<F: FnOnce(u32)>(&mut self, on_change: F) -> Option<u32> {
        self.navigate(Navigation::Previous, on_change)
    }

    /// Go one page forward.
    pub fn next<F: FnOnce(u32)>(&mut self, on_change: F) -> Option<u32> {
        self.navigate(Navigation::Next, on_change)
    }
}
