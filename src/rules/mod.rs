//! Defect validators for translation groups.
//!
//! Each rule is a pure function over one `TranslationGroup` returning the
//! locales whose values violate it. Fixable rules also provide an in-place
//! fix that is a no-op when run a second time.
//!
//! - `unicode`: raw non-ASCII in escaped catalogs, stray escapes in decoded ones
//! - `indices`: `{N}` placeholder sets must match the default value
//! - `braces`: bracket balance and bracket counts
//! - `whitespace`: leading/trailing whitespace must match the default value
//! - `newline`: newline form and count
//! - `cjk`: CJK-heavy output in non-CJK locales
//! - `defects`: aggregation into `DefectGroups` and the fix pass
//!
//! `hardcoded` is the exception: it scans source files rather than catalogs,
//! for UI text that never reached a translation call.

pub mod braces;
pub mod cjk;
pub mod defects;
pub mod hardcoded;
pub mod indices;
pub mod newline;
pub mod unicode;
pub mod whitespace;

pub use defects::{DefectGroups, DefectKind, DefectOptions, FixSummary, KeyDefect};

/// How a catalog format stores characters outside printable ASCII and newlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingPolicy {
    /// Gettext: values carry `\uXXXX` and `\n` escapes, never raw characters.
    Escaped,
    /// Rails YAML: values are decoded text, escape sequences are leftovers.
    Literal,
}
