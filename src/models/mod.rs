mod category;
mod transaction;

pub use category::{default_display_order, default_rules, CategoryRule, CategoryTable, OTHER};
pub use transaction::Transaction;
