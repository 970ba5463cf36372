//! sectionize-lib: split pasted page markup into reusable sections, each
//! paired with the CSS rules that plausibly style it.
//!
//! The pipeline is a pure, single-pass batch transform: a raw HTML string and
//! a raw CSS string go in, a list of [`ParsedSection`] records comes out.
//! There is no real CSS engine here — no cascade, specificity, or selector
//! evaluation — only a containment heuristic good enough to decide which
//! rules visually belong to which top-level section.
//!
//! ```no_run
//! use sectionize_lib::parse_css_and_match_sections;
//!
//! let sections = parse_css_and_match_sections(
//!     r#"<section class="hero"><h1>Hi</h1></section>"#,
//!     ".hero { color: red; }",
//! );
//! assert_eq!(sections.len(), 1);
//! ```

pub mod dom;
pub mod parser;
pub mod split;
pub mod style;

pub use split::{
    parse_css_and_match_sections, split_sections, ParsedSection, SectionError, SectionOutcome,
};
pub use style::matcher::extract_selectors;
pub use style::rules::{parse_css, CssRule};
