//! Sales history module.
//!
//! Raw sales rows and the preparation step that turns them into a clean daily
//! series per product (no IO; loading lives in `stockcast-infra`).

pub mod record;
pub mod series;

pub use record::{SalesRecord, distinct_product_ids};
pub use series::{parse_sales_date, prepare};
