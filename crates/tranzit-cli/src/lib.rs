//! Tranzit CLI library.
//!
//! Terminal styling and output formatting for the `tranzit` command-line
//! interface.

pub mod output;
pub mod terminal;

#[cfg(test)]
pub(crate) mod test_helpers;
