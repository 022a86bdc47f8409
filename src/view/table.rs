//! Sorted, filtered and paginated pool table.
//!
//! Table state is the selected sort field, its direction and the current
//! page. The filtered + sorted order is memoized against the exact data,
//! allow-list, network, field and direction it was computed from.

use std::sync::Arc;

use crate::models::{AllowList, FetchStatus, Network, PoolData, PoolDatas};
use crate::utils::{apy, daily_fees};

use super::SortField;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of pages needed for `total` rows; an exact multiple has no trailing empty page.
pub fn max_page(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow<'a> {
    /// 1-based position in the whole filtered and sorted table
    pub index: usize,
    pub pool: &'a PoolData,
    pub apy: f64,
    pub fees_24h: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    pub rows: Vec<TableRow<'a>>,
    pub page: usize,
    pub max_page: usize,
    /// Rows after allow-list filtering
    pub total: usize,
}

/// What the table should display for a given fetch state.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView<'a> {
    /// Placeholder rows while data is not yet populated
    Loading,
    Failed,
    Page(TablePage<'a>),
}

struct SortMemo {
    data: Arc<PoolDatas>,
    allow_list: Arc<AllowList>,
    network: Network,
    field: SortField,
    descending: bool,
    order: Vec<usize>,
}

impl SortMemo {
    fn matches(
        &self,
        data: &Arc<PoolDatas>,
        allow_list: &Arc<AllowList>,
        network: &Network,
        field: SortField,
        descending: bool,
    ) -> bool {
        Arc::ptr_eq(&self.data, data)
            && Arc::ptr_eq(&self.allow_list, allow_list)
            && self.network == *network
            && self.field == field
            && self.descending == descending
    }
}

pub struct PoolTable {
    sort_field: SortField,
    descending: bool,
    page: usize,
    page_size: usize,
    max_page: usize,
    memo: Option<SortMemo>,
}

impl Default for PoolTable {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, SortField::default())
    }
}

impl PoolTable {
    pub fn new(page_size: usize, sort_field: SortField) -> Self {
        Self {
            sort_field,
            descending: true,
            page: 1,
            page_size: page_size.max(1),
            max_page: 1,
            memo: None,
        }
    }

    pub fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Selecting the active field flips direction; a new field starts descending.
    pub fn select_sort_field(&mut self, field: SortField) {
        self.descending = if self.sort_field == field {
            !self.descending
        } else {
            true
        };
        self.sort_field = field;
    }

    /// Jump to a page, saturating at 1 and at the last computed page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.max_page.max(1));
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Header arrow for a column.
    pub fn arrow(&self, field: SortField) -> &'static str {
        if self.sort_field != field {
            ""
        } else if self.descending {
            "↓"
        } else {
            "↑"
        }
    }

    fn sorted_order(
        &mut self,
        data: &Arc<PoolDatas>,
        allow_list: &Arc<AllowList>,
        network: &Network,
    ) -> &[usize] {
        let (field, descending) = (self.sort_field, self.descending);
        let fresh = self
            .memo
            .as_ref()
            .is_some_and(|memo| memo.matches(data, allow_list, network, field, descending));

        if !fresh {
            let mut eligible: Vec<(usize, f64)> = data
                .iter()
                .enumerate()
                .filter(|(_, pool)| allow_list.contains(network, &pool.address))
                .map(|(i, pool)| (i, field.key(pool)))
                .collect();

            // stable: equal keys keep request order
            eligible.sort_by(|(_, a), (_, b)| {
                if descending {
                    b.total_cmp(a)
                } else {
                    a.total_cmp(b)
                }
            });

            self.memo = Some(SortMemo {
                data: Arc::clone(data),
                allow_list: Arc::clone(allow_list),
                network: network.clone(),
                field,
                descending,
                order: eligible.into_iter().map(|(i, _)| i).collect(),
            });
        }

        self.memo.as_ref().map(|memo| memo.order.as_slice()).unwrap_or(&[])
    }

    /// Filter, sort and slice the current page.
    pub fn page<'a>(
        &mut self,
        data: &'a Arc<PoolDatas>,
        allow_list: &Arc<AllowList>,
        network: &Network,
    ) -> TablePage<'a> {
        let page_size = self.page_size;
        let order = self.sorted_order(data, allow_list, network).to_vec();
        let total = order.len();

        self.max_page = max_page(total, page_size);
        self.page = self.page.clamp(1, self.max_page.max(1));

        let start = (self.page - 1) * page_size;
        let pools = data.as_slice();
        let rows = order
            .iter()
            .enumerate()
            .skip(start)
            .take(page_size)
            .map(|(position, &i)| {
                let pool = &pools[i];
                TableRow {
                    index: position + 1,
                    pool,
                    apy: apy(pool.volume_usd_24h, pool.fee_tier, pool.tvl_usd),
                    fees_24h: daily_fees(pool.volume_usd_24h, pool.fee_tier),
                }
            })
            .collect();

        TablePage {
            rows,
            page: self.page,
            max_page: self.max_page,
            total,
        }
    }

    /// Table contents for the aggregate fetch state.
    pub fn view<'a>(
        &mut self,
        status: &'a FetchStatus<Arc<PoolDatas>>,
        allow_list: &Arc<AllowList>,
        network: &Network,
    ) -> TableView<'a> {
        match status {
            FetchStatus::Loading => TableView::Loading,
            FetchStatus::Failed => TableView::Failed,
            FetchStatus::Ready(data) => TableView::Page(self.page(data, allow_list, network)),
        }
    }
}
