pub mod borrower;
pub mod check;
pub mod item;
pub mod loan;
pub mod save;
