use crate::model::department::Department;

/// Page size used by the department list.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Inputs of the list view.
///
/// Changing `search_term` deliberately leaves `current_page` alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewQuery {
    pub search_term: String,
    pub page_size: usize,
    /// 1-based. `0` is read as page `1`.
    pub current_page: usize,
}

impl Default for ViewQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            current_page: 1,
        }
    }
}

impl ViewQuery {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.current_page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// One computed page of the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    pub items: Vec<&'a Department>,
    pub current_page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    /// Size of the unfiltered collection.
    pub total_count: usize,
}

impl PageView<'_> {
    /// Previous page number, clamped to `1..=total_pages`.
    pub fn previous_page(&self) -> usize {
        self.current_page
            .saturating_sub(1)
            .clamp(1, self.total_pages)
    }

    /// Next page number, never above `total_pages`.
    pub fn next_page(&self) -> usize {
        self.current_page.saturating_add(1).min(self.total_pages)
    }

    /// Page numbers offered by the pager, `1..=total_pages`.
    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.total_pages).collect()
    }

    /// Footer text. Counts against the unfiltered collection.
    pub fn summary(&self) -> String {
        format!(
            "Showing {} of {} departments",
            self.items.len(),
            self.total_count
        )
    }
}

/// Filters by case-insensitive name substring and slices one page.
///
/// A `page_size` of `0` is treated as `1`.
pub fn project<'a>(list: &'a [Department], query: &ViewQuery) -> PageView<'a> {
    let needle = query.search_term.to_lowercase();
    let filtered: Vec<&Department> = list
        .iter()
        .filter(|dept| needle.is_empty() || dept.name.to_lowercase().contains(&needle))
        .collect();

    let page_size = query.page_size.max(1);
    let total_pages = filtered.len().div_ceil(page_size).max(1);
    let current_page = query.current_page.max(1);

    let start = (current_page - 1).saturating_mul(page_size);
    let items = filtered
        .iter()
        .skip(start)
        .take(page_size)
        .copied()
        .collect();

    PageView {
        items,
        current_page,
        total_pages,
        filtered_count: filtered.len(),
        total_count: list.len(),
    }
}
