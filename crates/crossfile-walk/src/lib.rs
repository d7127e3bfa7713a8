//! Recursive tree walking for crossfile.
//!
//! Two consumers of the same sequential walk: structural/content
//! comparison of two directory trees, and recursive directory sizing.
//! Both report progress at natural boundaries and poll the cancel
//! flag between work units.

mod compare;
mod size;

pub use compare::{
    compare_directories, CompareConfig, CompareConfigBuilder, CompareEntry, CompareReport,
    CompareSummary, DiffClass,
};
pub use size::{directory_size, SizeReport};
