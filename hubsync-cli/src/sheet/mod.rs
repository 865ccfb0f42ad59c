//! In-memory workbook model and xlsx persistence

pub mod model;
pub mod reader;
pub mod writer;
