//! Back-office pages.

pub mod dashboard;
pub mod orders;
pub mod products;
pub mod table;

pub use dashboard::DashboardPage;
pub use orders::OrdersPage;
pub use products::{ProductForm, ProductsPage};
pub use table::{ResourceKind, ResourceTable, TableRow};
