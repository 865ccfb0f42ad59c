pub mod summary;
pub mod sync;
