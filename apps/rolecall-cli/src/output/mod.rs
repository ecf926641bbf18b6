//! Terminal output helpers.

mod table;

pub use table::print_assignment_table;
