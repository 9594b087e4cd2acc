//! A pipeline combinator layer over character stream parsing.
//!
//! Parsers are composed into a sequential *pipe*: each step is any
//! [resolvable value](resolve::Resolve) (a literal, a case-insensitive
//! literal, a list of alternatives, or an existing parser), each step's
//! result is either discarded or [captured](resolve::capture), and the
//! captured values are finally applied in order to a combining function
//! whose arity must match.
//!
//! ```
//! use pipette::{pipe::pipe, resolve::capture, text::number::integer};
//!
//! let sum = pipe(capture(integer::<i64, ()>()))
//!     .then('+')
//!     .then(capture(integer::<i64, ()>()))
//!     .map(|a: i64, b: i64| a + b);
//!
//! assert_eq!(sum.parse_str("1+2"), Ok(3));
//! ```
#![allow(internal_features)]
#![cfg_attr(feature = "nightly", feature(rustc_attrs))]
#![warn(clippy::style)]
#![warn(clippy::perf)]
#![warn(clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

use derive_where::derive_where;

pub mod core;
pub mod macros;
pub mod pipe;
pub mod resolve;
pub mod stream;
pub mod text;

use stream::Stream;

/// The result of running a parser over a [Stream].
pub type Reply<T> = Result<T, Failure>;

/// An unsuccessful match, carrying the expectation that was not met.
///
/// `consumed` records whether input was consumed on the way to the failure,
/// decided by comparing cursor positions (never by error kind). A
/// non-consuming failure is recoverable by [choice](core::choice); a
/// consuming one propagates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Byte offset the failure is reported at.
    pub pos: usize,
    /// True if input was consumed before the failure.
    pub consumed: bool,
    /// Human-readable expectation, e.g. `Expected 'a', found 'b'`.
    pub expected: String,
}

impl Failure {
    /// True iff an enclosing alternative may try another branch.
    pub fn recoverable(&self) -> bool {
        !self.consumed
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.expected, self.pos)
    }
}

impl std::error::Error for Failure {}

/// The core trait for parsing computations over a character [Stream].
///
/// Implementors provide the parse step itself and a representation of what
/// they expect, used when building failure messages.
#[cfg_attr(
    feature = "nightly",
    rustc_on_unimplemented(
        message = "`{Self}` is not a `Parse` computation so cannot be run against a stream",
        label = "Not `Parse`",
    )
)]
pub trait Parse<S = ()> {
    type Output;

    /// Runs the computation against the stream, advancing it on success.
    /// On a non-consuming failure the stream is left where it started.
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<Self::Output>;

    /// Produces a representation of the expected input for error messages.
    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result;
}

/// An opaque, freely shareable handle to a parser.
///
/// Immutable once constructed: the same handle may be reused across any
/// number of independent parse runs, each run owning its own [Stream].
#[derive_where(Clone)]
pub struct Parser<T, S = ()>(Rc<dyn Parse<S, Output = T>>);

impl<T, S> Parser<T, S> {
    pub fn new(parse: impl Parse<S, Output = T> + 'static) -> Self {
        Parser(Rc::new(parse))
    }

    /// Runs the parser against an existing stream.
    pub fn run(&self, input: &mut Stream<'_, S>) -> Reply<T> {
        self.0.parse(input)
    }

    /// Runs the parser over `src` from the start, with a default state.
    pub fn parse_str(&self, src: &str) -> Reply<T>
    where
        S: Default,
    {
        self.run(&mut Stream::with_state(src, S::default()))
    }

    /// As [Parser::parse_str], threading an explicit user state.
    pub fn parse_str_with(&self, src: &str, state: S) -> Reply<T> {
        self.run(&mut Stream::with_state(src, state))
    }
}

impl<T, S> Parse<S> for Parser<T, S> {
    type Output = T;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<T> {
        self.0.parse(input)
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.expects(f)
    }
}

/// Displays as the parser's expectation (see [Parse::expects]).
impl<T, S> Display for Parser<T, S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.expects(f)
    }
}
