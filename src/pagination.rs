use std::num::NonZeroU32;

use serde::Serialize;

/// Rows requested per page
pub const PAGE_SIZE: u32 = 20;

/// Current page and page count of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: u32,
    pub total_pages: u32,
}

/// Pagination state machine.
///
/// States are `1..=total_pages`; every transition clamps into that range and
/// `total_pages` is never 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current: u32,
    total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            total_pages: 1,
        }
    }
}

impl Pagination {
    pub fn from_total_count(total_count: u64) -> Self {
        Self {
            current: 1,
            total_pages: pages_for(total_count),
        }
    }

    pub fn current(&self) -> NonZeroU32 {
        NonZeroU32::new(self.current).unwrap_or(NonZeroU32::MIN)
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn info(&self) -> PageInfo {
        PageInfo {
            current_page: self.current,
            total_pages: self.total_pages,
        }
    }

    /// Jump to page `n`, clamped into `[1, total_pages]`.
    pub fn go_to(&mut self, n: u32) -> NonZeroU32 {
        self.current = n.clamp(1, self.total_pages);
        self.current()
    }

    pub fn next(&mut self) -> NonZeroU32 {
        self.go_to(self.current.saturating_add(1))
    }

    pub fn prev(&mut self) -> NonZeroU32 {
        self.go_to(self.current.saturating_sub(1))
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    /// Recompute the page count, keeping the current page in range.
    pub fn set_total_count(&mut self, total_count: u64) {
        self.set_total_pages(pages_for(total_count));
    }

    pub fn set_total_pages(&mut self, total_pages: u32) {
        self.total_pages = total_pages.max(1);
        self.current = self.current.clamp(1, self.total_pages);
    }
}

fn pages_for(total_count: u64) -> u32 {
    let pages = total_count.div_ceil(u64::from(PAGE_SIZE));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}
