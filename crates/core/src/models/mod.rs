pub mod expense;
pub mod record;
pub mod summary;
pub mod totals;
