pub mod catalog;
pub mod loan;
