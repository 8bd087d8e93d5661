pub mod collection;
pub mod entry;
