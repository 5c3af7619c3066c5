//! Sliding page-link window for the listing pager

/// Number of page links shown at once
pub const MAX_PAGES_TO_SHOW: u32 = 5;

/// Page count assumed when the backend doesn't report one
pub const FALLBACK_TOTAL_PAGES: u32 = 500;

/// Entry in the rendered pager, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerItem {
    Previous,
    /// `active` marks the current page, which is not navigable
    Page { page: u32, active: bool },
    Next,
}

/// Inclusive range of page links around the current page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: u32,
    pub end: u32,
    pub current: u32,
    pub total: u32,
}

impl PageWindow {
    /// Window keeping `current` centered where possible and flush against
    /// either boundary otherwise. Inputs are clamped to `1 <= current <= total`.
    pub fn new(current: u32, total: u32) -> Self {
        let total = total.max(1);
        let current = current.clamp(1, total);
        let half = MAX_PAGES_TO_SHOW / 2;

        let mut start = current.saturating_sub(half).max(1);
        let mut end = start + MAX_PAGES_TO_SHOW - 1;

        if end > total {
            end = total;
            start = (end + 1).saturating_sub(MAX_PAGES_TO_SHOW).max(1);
        }

        Self { start, end, current, total }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.start..=self.end
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    /// Controls in render order: optional previous, page links, optional next.
    pub fn items(&self) -> Vec<PagerItem> {
        let mut items = Vec::with_capacity(self.len() as usize + 2);
        if self.has_previous() {
            items.push(PagerItem::Previous);
        }
        items.extend(self.pages().map(|page| PagerItem::Page {
            page,
            active: page == self.current,
        }));
        if self.has_next() {
            items.push(PagerItem::Next);
        }
        items
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
