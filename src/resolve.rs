//! Type-directed resolution of values into canonical parsers.
//!
//! Anything implementing [Resolve] can stand in for a parser in a
//! [pipe](crate::pipe): literal characters and strings, case-insensitive
//! wrappers, lists of alternatives, existing [Parser] handles, and types
//! registering a canonical factory through [DefaultParser]. Trait coherence
//! guarantees each value has exactly one resolution path, and the
//! capture/ignore decision is fixed at resolution time in [Resolve::Tag].

use crate::{
    core::choice,
    pipe::Pipe,
    text::{
        basic::{foldchar, foldstr, getchar, matchchar, matchstr},
        number::{float, integer},
    },
    Parser,
};

/// Marks a pipe step whose result is discarded. The default for every
/// resolvable value.
#[derive(Clone, Copy, Debug)]
pub struct Skip;

/// Marks a pipe step whose result is forwarded to the combining function.
#[derive(Clone, Copy, Debug)]
pub struct Keep;

/// A value convertible into a canonical parser, tagged with the
/// capture/ignore decision.
#[cfg_attr(
    feature = "nightly",
    rustc_on_unimplemented(
        message = "`{Self}` cannot be resolved to a parser",
        label = "no resolution rule applies",
    )
)]
pub trait Resolve<S = ()>: Sized
where
    S: 'static,
{
    type Output: 'static;
    /// [Skip] or [Keep].
    type Tag: 'static;

    fn resolve(self) -> Parser<Self::Output, S>;
}

/// The single canonical default parser for a type, used when a bare type
/// token is resolved via [of]. Register at most one factory per type; a
/// missing registration is a build-time error, never a parse failure.
#[cfg_attr(
    feature = "nightly",
    rustc_on_unimplemented(
        message = "no canonical default parser is registered for `{Self}`",
        label = "not `DefaultParser`",
    )
)]
pub trait DefaultParser<S = ()>: Sized {
    fn default_parser() -> Parser<Self, S>;
}

/// The canonical parser for the type `T` (the "type token" resolution rule).
pub fn of<T: DefaultParser<S> + 'static, S: 'static>() -> Parser<T, S> {
    T::default_parser()
}

/// Prefix shorthand: resolve `value` and return the bare parser.
pub fn resolved<S: 'static, R: Resolve<S>>(value: R) -> Parser<R::Output, S> {
    value.resolve()
}

/// A literal to be matched ignoring case; consumed by resolution.
#[derive(Clone, Copy, Debug)]
pub struct CaseInsensitive<L>(pub L);

/// Marks a literal for case-insensitive matching.
pub fn caseless<L>(lit: L) -> CaseInsensitive<L> {
    CaseInsensitive(lit)
}

/// A resolvable re-tagged as captured; see [capture].
pub struct Captured<R>(pub R);

/// Re-tags any resolvable as [Keep], regardless of its prior tag: the
/// step's result is forwarded to the pipe's combining function.
pub fn capture<R>(value: R) -> Captured<R> {
    Captured(value)
}

/// A resolvable explicitly tagged as [Skip] (the default); see [ignored].
pub struct Ignored<R>(pub R);

/// Tags a resolvable as [Skip], discarding the step's result.
pub fn ignored<R>(value: R) -> Ignored<R> {
    Ignored(value)
}

impl<S: 'static, R: Resolve<S>> Resolve<S> for Captured<R> {
    type Output = R::Output;
    type Tag = Keep;

    fn resolve(self) -> Parser<R::Output, S> {
        self.0.resolve()
    }
}

impl<S: 'static, R: Resolve<S>> Resolve<S> for Ignored<R> {
    type Output = R::Output;
    type Tag = Skip;

    fn resolve(self) -> Parser<R::Output, S> {
        self.0.resolve()
    }
}

impl<T: 'static, S: 'static> Resolve<S> for Parser<T, S> {
    type Output = T;
    type Tag = Skip;

    fn resolve(self) -> Parser<T, S> {
        self
    }
}

impl<Caps: 'static, S: 'static> Resolve<S> for Pipe<Caps, S> {
    type Output = Caps;
    type Tag = Skip;

    fn resolve(self) -> Parser<Caps, S> {
        self.parser()
    }
}

impl<S: 'static> Resolve<S> for char {
    type Output = char;
    type Tag = Skip;

    fn resolve(self) -> Parser<char, S> {
        matchchar(self)
    }
}

impl<S: 'static> Resolve<S> for &'static str {
    type Output = &'static str;
    type Tag = Skip;

    fn resolve(self) -> Parser<&'static str, S> {
        matchstr(self)
    }
}

impl<S: 'static> Resolve<S> for CaseInsensitive<char> {
    type Output = char;
    type Tag = Skip;

    fn resolve(self) -> Parser<char, S> {
        foldchar(self.0)
    }
}

impl<S: 'static> Resolve<S> for CaseInsensitive<&'static str> {
    type Output = String;
    type Tag = Skip;

    fn resolve(self) -> Parser<String, S> {
        foldstr(self.0)
    }
}

/// An ordered list of alternatives: each element resolves independently and
/// the first match wins.
impl<S: 'static, R: Resolve<S>, const N: usize> Resolve<S> for [R; N] {
    type Output = R::Output;
    type Tag = Skip;

    fn resolve(self) -> Parser<R::Output, S> {
        choice(self.into_iter().map(Resolve::resolve).collect())
    }
}

impl<S: 'static, R: Resolve<S>> Resolve<S> for Vec<R> {
    type Output = R::Output;
    type Tag = Skip;

    fn resolve(self) -> Parser<R::Output, S> {
        choice(self.into_iter().map(Resolve::resolve).collect())
    }
}

impl<S: 'static> DefaultParser<S> for char {
    fn default_parser() -> Parser<char, S> {
        getchar()
    }
}

impl<S: 'static> DefaultParser<S> for f64 {
    fn default_parser() -> Parser<f64, S> {
        float()
    }
}

macro_rules! integer_defaults {
    ($($t:ty),* $(,)?) => {
        $(impl<S: 'static> DefaultParser<S> for $t {
            fn default_parser() -> Parser<$t, S> {
                integer()
            }
        })*
    };
}

integer_defaults!(u8, u16, u32, u64, i8, i16, i32, i64);
