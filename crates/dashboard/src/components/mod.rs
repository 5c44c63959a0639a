//! View components.
//!
//! - `data_table` - Posts table columns and row views
//! - `header` - Navigation header and mobile menu
//! - `tabs` - Dashboard tab selection

pub mod data_table;
pub mod header;
pub mod tabs;

pub use data_table::{PostRowView, PostsPanelView, TableColumn, posts_table_columns};
pub use header::{HeaderView, MobileMenu};
pub use tabs::{DashboardQuery, DashboardTab, TabLink, tab_links};
