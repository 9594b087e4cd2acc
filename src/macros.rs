//! Helper macros

/// Helper to build an ordered alternation from resolvable values.
/// ```
/// use pipette::{alts, Parser};
///
/// let keyword: Parser<&'static str, ()> = alts!("let", "fn", "mod");
/// assert_eq!(keyword.parse_str("fn main"), Ok("fn"));
/// ```
#[macro_export]
macro_rules! alts {
    ($($option:expr),+ $(,)?) => {
        $crate::core::choice(vec![$($crate::resolve::resolved($option)),+])
    };
}

pub use alts;
