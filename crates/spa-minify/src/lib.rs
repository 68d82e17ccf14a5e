//! Pure minification engine for server-rendered output.
//!
//! Passes:
//! 1. Literal guard (placeholder protection of strings, `url(...)`, preformatted blocks)
//! 2. JavaScript: comments, whitespace, heuristic semicolon insertion, operator spacing
//! 3. CSS: comments, whitespace, punctuation, zero units, rgb → hex
//! 4. HTML: comments, whitespace, attributes, embedded script/style dispatch

pub mod css;
pub mod html;
pub mod js;
pub mod literal_guard;
pub mod pipeline;

pub use literal_guard::PlaceholderMap;
pub use pipeline::{minify, MinifyResult, Minifier};

#[cfg(test)]
mod tests;
