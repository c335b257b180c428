pub mod entry;

pub use entry::{Entry, NewEntry, SortOrder};
