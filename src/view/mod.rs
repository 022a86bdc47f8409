mod sort;
mod table;

pub use sort::SortField;
pub use table::{max_page, PoolTable, TablePage, TableRow, TableView, DEFAULT_PAGE_SIZE};
