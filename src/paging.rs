//! Pagination and sorting state, and the query a list fetch is keyed by.

use crate::filter::FilterSet;

/// Page sizes a list offers.
pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 25, 50, 100];
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// 0-based page in state, 1-based on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub page_index: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn page_count(&self, total: u64) -> u32 {
        let size = u64::from(self.page_size.max(1));
        u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX)
    }

    /// `"1-12 of 12"`; `"0-0 of n"` when the page holds no rows.
    pub fn range_label(&self, total: u64) -> String {
        let size = u64::from(self.page_size);
        let offset = u64::from(self.page_index) * size;
        if offset >= total {
            return format!("0-0 of {total}");
        }
        let to = (offset + size).min(total);
        format!("{}-{to} of {total}", offset + 1)
    }

    /// Last valid page index for `total` rows.
    pub fn last_index(&self, total: u64) -> u32 {
        self.page_count(total).saturating_sub(1)
    }

    pub fn has_next(&self, total: u64) -> bool {
        self.page_index + 1 < self.page_count(total)
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// How a list reacts to a header click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortPolicy {
    /// Same column flips direction, a new column starts ascending.
    Toggle,
    /// Sorting is fixed by the page; clicks are ignored.
    Fixed,
}

impl SortPolicy {
    pub fn click(self, current: Option<&SortSpec>, column: &str) -> Option<SortSpec> {
        match self {
            SortPolicy::Fixed => current.cloned(),
            SortPolicy::Toggle => match current {
                Some(spec) if spec.column == column => {
                    Some(SortSpec::new(column, spec.direction.flipped()))
                }
                _ => Some(SortSpec::new(column, SortDirection::Asc)),
            },
        }
    }
}

/// Everything a list fetch depends on. Two equal queries are the same
/// logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub filters: FilterSet,
    pub page: PageRequest,
    pub sort: Option<SortSpec>,
}

impl ListQuery {
    /// Filters, then `page` (1-based), `limit`, `orderBy`, `order`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = self.filters.to_query_pairs();
        pairs.push(("page".to_string(), (self.page.page_index + 1).to_string()));
        pairs.push(("limit".to_string(), self.page.page_size.to_string()));
        if let Some(sort) = &self.sort {
            pairs.push(("orderBy".to_string(), sort.column.clone()));
            pairs.push(("order".to_string(), sort.direction.as_str().to_string()));
        }
        pairs
    }
}
