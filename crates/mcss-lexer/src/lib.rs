//! MCSS Lexer
//!
//! Context-aware scanning primitives and the source preprocessor for the
//! MCSS stylesheet dialect. The scanner primitives locate unquoted
//! delimiters while tracking string, escape, and parenthesis state; the
//! preprocessor normalizes line endings, strips comments, infers the
//! indentation unit, and auto-unindents uniformly indented input.
//!
//! # Example
//!
//! ```
//! use mcss_lexer::preprocess;
//!
//! let source = preprocess("div\r\n\tcolor: red; // note\r\n");
//! assert_eq!(source.text, "div\n\tcolor: red; \n");
//! assert_eq!(source.indent, "\t");
//! ```

pub mod cursor;
pub mod preprocess;

pub use cursor::{find_delimiter, property_start, rfind_colon, split_commas, ScanState};
pub use preprocess::{lint, preprocess, Lint, Source};
