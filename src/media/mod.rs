//! Media module for record representation and extraction.

pub mod item;
pub mod parser;

pub use item::{MediaRecord, MediaType};
pub use parser::{build_record, extract_media, extract_records, FoundMedia, DEFAULT_MAX_DEPTH};
