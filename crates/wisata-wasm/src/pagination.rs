//! Pagination WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { JsPagination } from '@wisata/wasm';
//!
//! const pagination = new JsPagination(meta.maxPage);
//! pagination.set_on_change((page) => fetchArticles(page));
//! render(pagination.window()); // { items: [{ kind: 'page', number: 1, active: true }, ...] }
//! pagination.next();
//! ```

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wisata_core::pagination::{self, Navigation, PageWindow, Pagination};

fn window_to_js(window: &PageWindow) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(window).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Compute the page-button row for `current_page` of `max_page`.
///
/// Returns `{ items, hasPrevious, hasNext }` where each item is either
/// `{ kind: "page", number, active }` or `{ kind: "ellipsis" }`.
#[wasm_bindgen]
pub fn compute_window(current_page: u32, max_page: u32) -> Result<JsValue, JsValue> {
    window_to_js(&pagination::compute_window(current_page, max_page))
}

/// Pagination state of one list view.
#[wasm_bindgen]
pub struct JsPagination {
    inner: Pagination,
    on_change: Option<Function>,
}

#[wasm_bindgen]
impl JsPagination {
    /// Start on page 1. `max_page` defaults to 10.
    #[wasm_bindgen(constructor)]
    pub fn new(max_page: Option<u32>) -> JsPagination {
        let inner = max_page.map(Pagination::new).unwrap_or_default();
        JsPagination {
            inner,
            on_change: None,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn current_page(&self) -> u32 {
        self.inner.current_page()
    }

    #[wasm_bindgen(getter)]
    pub fn max_page(&self) -> u32 {
        self.inner.max_page()
    }

    #[wasm_bindgen(setter)]
    pub fn set_max_page(&mut self, max_page: u32) {
        self.inner.set_max_page(max_page);
    }

    #[wasm_bindgen(getter)]
    pub fn disabled(&self) -> bool {
        self.inner.is_disabled()
    }

    #[wasm_bindgen(setter)]
    pub fn set_disabled(&mut self, disabled: bool) {
        self.inner.set_disabled(disabled);
    }

    /// Register the callback invoked with the new page number.
    pub fn set_on_change(&mut self, callback: Option<Function>) {
        self.on_change = callback;
    }

    /// Buttons to render, in the same shape as `compute_window`.
    pub fn window(&self) -> Result<JsValue, JsValue> {
        window_to_js(&self.inner.window())
    }

    /// Go to `page`. Returns the new page, or `undefined` if ignored.
    pub fn select(&mut self, page: u32) -> Result<Option<u32>, JsValue> {
        self.navigate(Navigation::Page(page))
    }

    pub fn previous(&mut self) -> Result<Option<u32>, JsValue> {
        self.navigate(Navigation::Previous)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Option<u32>, JsValue> {
        self.navigate(Navigation::Next)
    }
}

impl JsPagination {
    fn navigate(&mut self, request: Navigation) -> Result<Option<u32>, JsValue> {
        let mut fired = Ok(JsValue::UNDEFINED);
        let on_change = &self.on_change;
        let page = self.inner.navigate(request, |page| {
            if let Some(callback) = on_change {
                fired = callback.call1(&JsValue::NULL, &JsValue::from(page));
            }
        });
        fired?;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // No callback is registered here: calling into JS needs a wasm32 host.

    #[test]
    fn test_default_max_page() {
        let pagination = JsPagination::new(None);
        assert_eq!(pagination.max_page(), 10);
        assert_eq!(pagination.current_page(), 1);
    }

    #[test]
    fn test_navigation_without_callback() {
        let mut pagination = JsPagination::new(Some(7));
        assert_eq!(pagination.next().unwrap(), Some(2));
        assert_eq!(pagination.select(7).unwrap(), Some(7));
        assert_eq!(pagination.next().unwrap(), None);
        assert_eq!(pagination.previous().unwrap(), Some(6));
        assert_eq!(pagination.select(0).unwrap(), None);
    }

    #[test]
    fn test_disabled_ignores_navigation() {
        let mut pagination = JsPagination::new(Some(5));
        pagination.set_disabled(true);
        assert!(pagination.disabled());
        assert_eq!(pagination.next().unwrap(), None);
        assert_eq!(pagination.current_page(), 1);
    }

    #[test]
    fn test_max_page_update() {
        let mut pagination = JsPagination::new(Some(3));
        pagination.set_max_page(12);
        assert_eq!(pagination.select(12).unwrap(), Some(12));
    }
}
