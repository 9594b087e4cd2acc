//! General combinators over the base engine: mapping, ordered alternation,
//! and forward references for recursive grammars.

use std::cell::RefCell;
use std::fmt::{self, Formatter};
use std::rc::Rc;

use derive_where::derive_where;
use itertools::Itertools;

use crate::{stream::Stream, Failure, Parse, Parser, Reply};

#[derive_where(Clone)]
pub struct MapSuc<T, U, S> {
    parser: Parser<T, S>,
    map: Rc<dyn Fn(T) -> U>,
}
/// Maps a parser's success value through `map`.
pub fn mapsuc<T: 'static, U: 'static, S: 'static>(
    parser: Parser<T, S>,
    map: impl Fn(T) -> U + 'static,
) -> Parser<U, S> {
    Parser::new(MapSuc {
        parser,
        map: Rc::new(map),
    })
}
impl<T: 'static, U: 'static, S: 'static> Parse<S> for MapSuc<T, U, S> {
    type Output = U;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<U> {
        self.parser.run(input).map(|value| (self.map)(value))
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.parser.expects(f)
    }
}

#[derive_where(Clone)]
pub struct Choice<T, S> {
    options: Vec<Parser<T, S>>,
}
/// Tries each option in order, succeeding with the first match.
///
/// An option failing without consuming input lets the next be tried from
/// the same position; a consuming failure propagates immediately.
pub fn choice<T: 'static, S: 'static>(options: Vec<Parser<T, S>>) -> Parser<T, S> {
    Parser::new(Choice { options })
}
impl<T: 'static, S: 'static> Parse<S> for Choice<T, S> {
    type Output = T;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<T> {
        let start = input.mark();
        for option in &self.options {
            match option.run(input) {
                Ok(value) => return Ok(value),
                Err(fail) if fail.consumed => return Err(fail),
                Err(_) => input.rewind(start),
            }
        }
        Err(Failure {
            pos: start,
            consumed: false,
            expected: format!("Expected {}", self.options.iter().format(" or ")),
        })
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.options.iter().format(" or "))
    }
}

/// A placeholder delegating to whatever its [ForwardCell] was filled with.
#[derive_where(Clone)]
pub struct Forward<T, S>(Rc<RefCell<Option<Parser<T, S>>>>);

impl<T: 'static, S: 'static> Parse<S> for Forward<T, S> {
    type Output = T;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<T> {
        let parser = self
            .0
            .borrow()
            .as_ref()
            .expect("forward parser was run before its definition was supplied")
            .clone();
        parser.run(input)
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // not delegated: a recursive definition would recurse here too
        write!(f, "<recursive>")
    }
}

/// The fill-once binding cell completing a [forward] parser.
///
/// `define` consumes the cell, so the binding is written exactly once.
pub struct ForwardCell<T, S>(Rc<RefCell<Option<Parser<T, S>>>>);

impl<T, S> ForwardCell<T, S> {
    pub fn define(self, parser: Parser<T, S>) {
        *self.0.borrow_mut() = Some(parser);
    }
}

/// A forward-reference parser plus the cell that completes it later.
///
/// The placeholder must not be run before the cell is filled; doing so is a
/// logic error in the caller.
pub fn forward<T: 'static, S: 'static>() -> (Parser<T, S>, ForwardCell<T, S>) {
    let cell = Rc::new(RefCell::new(None));
    (Parser::new(Forward(cell.clone())), ForwardCell(cell))
}

/// Builds a self-referential parser: `define` is handed the parser being
/// defined and returns its full definition, which may use the handed-in
/// parser for recursive structure (during later parsing only, never while
/// `define` itself runs).
pub fn recursive<T: 'static, S: 'static>(
    define: impl FnOnce(Parser<T, S>) -> Parser<T, S>,
) -> Parser<T, S> {
    let (placeholder, cell) = forward();
    let definition = define(placeholder.clone());
    cell.define(definition);
    placeholder
}
