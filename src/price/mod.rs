//! Price text handling: normalization to a canonical decimal, rendering back
//! to display form, and regex cleanup of scraped values.
//!
//! A canonical price is a plain `String` such as `"12.90"`: dot separator,
//! exactly two fraction digits, no currency symbol, no grouping. Text that
//! cannot be read as a number passes through [`normalize_price`] trimmed but
//! otherwise untouched.

pub mod cleanup;
pub mod format;
pub mod normalize;

pub use cleanup::{apply_regex_cleanup, extract_price};
pub use format::{FormatOptions, format_price};
pub use normalize::{is_canonical, normalize_price};
