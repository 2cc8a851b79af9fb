//! The runway catalog: show-directory scanning, thumbnails and filtering.
//!
//! A catalog is the ordered list of [`ImageRecord`](crate::types::ImageRecord)s
//! produced by one [`CatalogScanner::scan`]. It is rebuilt on every scan;
//! only the per-image labels survive between scans, in the tagger's cache.

pub mod filter;
pub mod scanner;
pub mod thumbnail;

pub use filter::{filter, FilterCriteria};
pub use scanner::{CatalogDimensions, CatalogScanner, ScanReport};
pub use thumbnail::{JpegThumbnailer, ThumbnailCodec};
