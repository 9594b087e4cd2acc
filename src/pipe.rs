//! The pipe accumulator: sequential composition threading capture/ignore
//! decisions and the three backtracking disciplines.
//!
//! A pipe starts from one [resolvable](Resolve) step and grows by appending
//! further steps with [Pipe::then], [Pipe::then_backtrack_left] or
//! [Pipe::then_backtrack_right]. Steps marked with
//! [capture](crate::resolve::capture) append their value, left to right, to
//! the pipe's tuple of captures; all other steps are matched and discarded.
//! [Pipe::map] finishes the pipe by applying a combining function whose
//! parameters must match the captured tuple exactly (checked at compile
//! time, before any parsing).

use std::fmt::{self, Formatter};
use std::marker::PhantomData;

use derive_where::derive_where;

use crate::{
    core::mapsuc,
    resolve::{Keep, Resolve, Skip},
    stream::Stream,
    Failure, Parse, Parser, Reply,
};

/// Type-level append of one captured value onto the capture tuple.
pub trait TupleAppend<U> {
    type Out: 'static;

    fn append(self, item: U) -> Self::Out;
}

macro_rules! tuple_append {
    ($($t:ident),*) => {
        impl<$($t: 'static,)* U: 'static> TupleAppend<U> for ($($t,)*) {
            type Out = ($($t,)* U,);

            #[allow(non_snake_case)]
            fn append(self, item: U) -> Self::Out {
                let ($($t,)*) = self;
                ($($t,)* item,)
            }
        }
    };
}

tuple_append!();
tuple_append!(A);
tuple_append!(A, B);
tuple_append!(A, B, C);
tuple_append!(A, B, C, D);
tuple_append!(A, B, C, D, E);
tuple_append!(A, B, C, D, E, F);
tuple_append!(A, B, C, D, E, F, G);

/// How a step's resolution tag folds its value into the capture tuple:
/// [Keep] appends, [Skip] discards.
pub trait StepTag<Caps, U> {
    type Next: 'static;

    fn fold(caps: Caps, item: U) -> Self::Next;
}

impl<Caps: 'static, U> StepTag<Caps, U> for Skip {
    type Next = Caps;

    #[inline]
    fn fold(caps: Caps, _item: U) -> Caps {
        caps
    }
}

impl<Caps: TupleAppend<U>, U> StepTag<Caps, U> for Keep {
    type Next = Caps::Out;

    #[inline]
    fn fold(caps: Caps, item: U) -> Self::Next {
        caps.append(item)
    }
}

/// A combining function applied to the pipe's captured values. Implemented
/// for closures of each arity, so a pipe capturing `k` values only accepts
/// a `k`-parameter function.
#[cfg_attr(
    feature = "nightly",
    rustc_on_unimplemented(
        message = "`{Self}` does not take the pipe's captured values `{Args}` as parameters",
        label = "arity does not match the pipe's captures",
    )
)]
pub trait Apply<Args, R> {
    fn apply(&self, args: Args) -> R;
}

macro_rules! apply {
    ($($t:ident),*) => {
        impl<Fun: Fn($($t),*) -> R, $($t,)* R> Apply<($($t,)*), R> for Fun {
            #[allow(non_snake_case)]
            #[inline]
            fn apply(&self, ($($t,)*): ($($t,)*)) -> R {
                self($($t),*)
            }
        }
    };
}

apply!();
apply!(A);
apply!(A, B);
apply!(A, B, C);
apply!(A, B, C, D);
apply!(A, B, C, D, E);
apply!(A, B, C, D, E, F);
apply!(A, B, C, D, E, F, G);
apply!(A, B, C, D, E, F, G, H);

#[derive_where(Clone)]
struct Then<Caps, U, S, Tag> {
    prev: Parser<Caps, S>,
    next: Parser<U, S>,
    _tag: PhantomData<Tag>,
}

impl<Caps: 'static, U: 'static, S: 'static, Tag: 'static> Parse<S> for Then<Caps, U, S, Tag>
where
    Tag: StepTag<Caps, U>,
{
    type Output = Tag::Next;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<Tag::Next> {
        let start = input.mark();
        let caps = self.prev.run(input)?;
        let mid = input.mark();
        match self.next.run(input) {
            Ok(item) => Ok(Tag::fold(caps, item)),
            Err(fail) => Err(Failure {
                consumed: fail.consumed || mid > start,
                ..fail
            }),
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} then {}", self.prev, self.next)
    }
}

#[derive_where(Clone)]
struct ThenBacktrackLeft<Caps, U, S, Tag> {
    prev: Parser<Caps, S>,
    next: Parser<U, S>,
    _tag: PhantomData<Tag>,
}

impl<Caps: 'static, U: 'static, S: 'static, Tag: 'static> Parse<S>
    for ThenBacktrackLeft<Caps, U, S, Tag>
where
    Tag: StepTag<Caps, U>,
{
    type Output = Tag::Next;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<Tag::Next> {
        let start = input.mark();
        let caps = self.prev.run(input)?;
        match self.next.run(input) {
            Ok(item) => Ok(Tag::fold(caps, item)),
            Err(fail) => {
                // undo the whole accumulated sequence
                input.rewind(start);
                Err(Failure {
                    pos: start,
                    consumed: false,
                    expected: fail.expected,
                })
            }
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} then {}", self.prev, self.next)
    }
}

#[derive_where(Clone)]
struct ThenBacktrackRight<Caps, U, S, Tag> {
    prev: Parser<Caps, S>,
    next: Parser<U, S>,
    _tag: PhantomData<Tag>,
}

impl<Caps: 'static, U: 'static, S: 'static, Tag: 'static> Parse<S>
    for ThenBacktrackRight<Caps, U, S, Tag>
where
    Tag: StepTag<Caps, U>,
{
    type Output = Tag::Next;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<Tag::Next> {
        let caps = self.prev.run(input)?;
        let mid = input.mark();
        match self.next.run(input) {
            Ok(item) => Ok(Tag::fold(caps, item)),
            // consumption is judged by position, never by error kind
            Err(fail) if fail.consumed || input.mark() > mid => Err(Failure {
                consumed: true,
                ..fail
            }),
            Err(fail) => Err(Failure {
                pos: mid,
                consumed: false,
                expected: fail.expected,
            }),
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} then {}", self.prev, self.next)
    }
}

/// An accumulating sequential composition of parsers, tracking the tuple of
/// captured values in `Caps`.
///
/// Pipes are append-only values: every join consumes the pipe and produces
/// a new one, and a step's capture/ignore tag is never revisited.
#[derive_where(Clone)]
pub struct Pipe<Caps, S = ()> {
    parser: Parser<Caps, S>,
}

/// Starts a pipe from any resolvable first step.
pub fn pipe<S: 'static, R>(first: R) -> Pipe<<R::Tag as StepTag<(), R::Output>>::Next, S>
where
    R: Resolve<S>,
    R::Tag: StepTag<(), R::Output>,
{
    Pipe {
        parser: mapsuc(first.resolve(), |item| {
            <R::Tag as StepTag<(), R::Output>>::fold((), item)
        }),
    }
}

impl<Caps: 'static, S: 'static> Pipe<Caps, S> {
    /// Sequential join: if this pipe succeeds, run the appended step on the
    /// resulting position. A failure of the appended step after the pipe
    /// consumed input is a consuming failure — no recovery.
    pub fn then<R>(self, step: R) -> Pipe<<R::Tag as StepTag<Caps, R::Output>>::Next, S>
    where
        R: Resolve<S>,
        R::Tag: StepTag<Caps, R::Output>,
    {
        Pipe {
            parser: Parser::new(Then::<Caps, R::Output, S, R::Tag> {
                prev: self.parser,
                next: step.resolve(),
                _tag: PhantomData,
            }),
        }
    }

    /// As [Pipe::then], but a failure of the appended step rewinds to the
    /// position before the whole pipe began and reports a non-consuming
    /// failure there, so an outer alternative can be tried instead.
    pub fn then_backtrack_left<R>(
        self,
        step: R,
    ) -> Pipe<<R::Tag as StepTag<Caps, R::Output>>::Next, S>
    where
        R: Resolve<S>,
        R::Tag: StepTag<Caps, R::Output>,
    {
        Pipe {
            parser: Parser::new(ThenBacktrackLeft::<Caps, R::Output, S, R::Tag> {
                prev: self.parser,
                next: step.resolve(),
                _tag: PhantomData,
            }),
        }
    }

    /// As [Pipe::then], but a failure of the appended step that consumed no
    /// input itself is reported as non-consuming from the position after
    /// the pipe, so an alternative anchored there can be tried. A consuming
    /// failure of the appended step propagates as consuming.
    pub fn then_backtrack_right<R>(
        self,
        step: R,
    ) -> Pipe<<R::Tag as StepTag<Caps, R::Output>>::Next, S>
    where
        R: Resolve<S>,
        R::Tag: StepTag<Caps, R::Output>,
    {
        Pipe {
            parser: Parser::new(ThenBacktrackRight::<Caps, R::Output, S, R::Tag> {
                prev: self.parser,
                next: step.resolve(),
                _tag: PhantomData,
            }),
        }
    }

    /// Finishes the pipe, applying `combine` to the captured values in the
    /// order they were captured. The parameter list must match the captures
    /// exactly; a mismatch does not compile.
    pub fn map<F, R: 'static>(self, combine: F) -> Parser<R, S>
    where
        F: Apply<Caps, R> + 'static,
    {
        mapsuc(self.parser, move |caps| combine.apply(caps))
    }

    /// The residual parser, yielding the capture tuple itself.
    pub fn parser(self) -> Parser<Caps, S> {
        self.parser
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::choice,
        resolve::{capture, caseless},
        text::basic::matchstr,
    };

    #[test]
    fn ignored_steps_capture_nothing() {
        let p: Parser<&'static str, ()> = pipe('a').then('b').then("cd").map(|| "matched");
        assert_eq!(p.parse_str("abcd"), Ok("matched"));
    }

    #[test]
    fn captures_keep_order_across_interleaved_ignores() {
        let p: Parser<(char, char), ()> = pipe('(')
            .then(capture(caseless('x')))
            .then(',')
            .then(capture(caseless('y')))
            .then(')')
            .map(|x, y| (x, y));
        assert_eq!(p.parse_str("(X,y)"), Ok(('X', 'y')));
    }

    #[test]
    fn matching_arity_applies_left_to_right() {
        let p: Parser<String, ()> = pipe(capture('1'))
            .then(capture('2'))
            .then(capture('3'))
            .map(|a, b, c| format!("{a}{b}{c}"));
        assert_eq!(p.parse_str("123"), Ok(String::from("123")));
    }

    #[test]
    fn sequential_failure_consumes() {
        let p: Parser<(), ()> = pipe('a').then('b').map(|| ());
        let mut s = Stream::new("az");
        let fail = p.run(&mut s).unwrap_err();
        assert!(fail.consumed);
        assert_eq!(fail.pos, 1);
        assert_eq!(s.pos(), 1);
    }

    #[test]
    fn sequential_failure_is_not_recoverable() {
        let p = choice(vec![
            pipe::<(), _>('a').then('b').map(|| "ab"),
            matchstr("az"),
        ]);
        let fail = p.parse_str("az").unwrap_err();
        assert!(fail.consumed);
    }

    #[test]
    fn backtrack_left_rewinds_to_origin() {
        let p: Parser<(), ()> = pipe('a').then_backtrack_left('b').map(|| ());
        let mut s = Stream::new("az");
        let fail = p.run(&mut s).unwrap_err();
        assert!(!fail.consumed);
        assert_eq!(fail.pos, 0);
        assert_eq!(s.pos(), 0);
    }

    #[test]
    fn backtrack_left_enables_outer_alternative() {
        let p = choice(vec![
            pipe::<(), _>("foo").then_backtrack_left("bar").map(|| "foobar"),
            matchstr("foo!"),
        ]);
        assert_eq!(p.parse_str("foobar"), Ok("foobar"));
        assert_eq!(p.parse_str("foo!"), Ok("foo!"));
    }

    #[test]
    fn backtrack_right_reports_from_the_intermediate_position() {
        let p: Parser<(), ()> = pipe('a').then_backtrack_right('q').map(|| ());
        let mut s = Stream::new("az");
        let fail = p.run(&mut s).unwrap_err();
        assert!(!fail.consumed);
        assert_eq!(fail.pos, 1);
        // not rewound to before the pipe
        assert_eq!(s.pos(), 1);
    }

    #[test]
    fn backtrack_right_keeps_consuming_failures() {
        // the appended step consumes 'b' before failing on 'q'
        let inner = pipe::<(), _>('b').then('q');
        let p: Parser<(), ()> = pipe('a').then_backtrack_right(inner).map(|| ());
        let mut s = Stream::new("abz");
        let fail = p.run(&mut s).unwrap_err();
        assert!(fail.consumed);
        assert_eq!(fail.pos, 2);
        assert_eq!(s.pos(), 2);
    }

    #[test]
    fn pipes_nest_as_steps() {
        let digits = pipe::<(), _>(capture('1')).then(capture('2'));
        let p: Parser<(char, char), ()> =
            pipe('<').then(capture(digits)).then('>').map(|(a, b)| (a, b));
        assert_eq!(p.parse_str("<12>"), Ok(('1', '2')));
    }
}
