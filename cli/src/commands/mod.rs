pub mod scan;
pub mod totals;
