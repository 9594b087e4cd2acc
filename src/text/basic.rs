//! Basic character and literal parsers.

use std::fmt::{self, Formatter};

use crate::{
    stream::{fold_eq, Stream},
    Parse, Parser, Reply,
};

#[derive(Clone, Debug)]
pub struct GetChar;
/// Any single character.
pub fn getchar<S: 'static>() -> Parser<char, S> {
    Parser::new(GetChar)
}
impl<S> Parse<S> for GetChar {
    type Output = char;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<char> {
        match input.bump() {
            Some(c) => Ok(c),
            None => Err(input.fail_here("Expected any character, found end of input")),
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<any character>")
    }
}

#[derive(Clone, Debug)]
pub struct MatchChar(char);
/// Exactly the character `c`, case-sensitively.
pub fn matchchar<S: 'static>(c: char) -> Parser<char, S> {
    Parser::new(MatchChar(c))
}
impl<S> Parse<S> for MatchChar {
    type Output = char;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<char> {
        match input.peek() {
            Some(c) if c == self.0 => {
                input.bump();
                Ok(c)
            }
            _ => Err(input.fail_here(format!(
                "Expected '{}', found {}",
                self.0,
                input.describe_next()
            ))),
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct MatchStr(&'static str);
/// Exactly the literal `lit`, case-sensitively.
pub fn matchstr<S: 'static>(lit: &'static str) -> Parser<&'static str, S> {
    Parser::new(MatchStr(lit))
}
impl<S> Parse<S> for MatchStr {
    type Output = &'static str;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<&'static str> {
        if input.eat_str(self.0) {
            Ok(self.0)
        } else {
            Err(input.fail_here(format!(
                "Expected \"{}\", found {}",
                self.0,
                input.describe_next()
            )))
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct FoldChar(char);
/// The character `c` ignoring case, yielding the character actually on the
/// stream (not the pattern character).
pub fn foldchar<S: 'static>(c: char) -> Parser<char, S> {
    Parser::new(FoldChar(c))
}
impl<S> Parse<S> for FoldChar {
    type Output = char;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<char> {
        match input.peek() {
            Some(c) if fold_eq(c, self.0) => {
                input.bump();
                Ok(c)
            }
            _ => Err(input.fail_here(format!(
                "Expected '{}' (any case), found {}",
                self.0,
                input.describe_next()
            ))),
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' (any case)", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct FoldStr(&'static str);
/// The literal `lit` ignoring case, yielding the consumed text with its
/// original casing.
pub fn foldstr<S: 'static>(lit: &'static str) -> Parser<String, S> {
    Parser::new(FoldStr(lit))
}
impl<S> Parse<S> for FoldStr {
    type Output = String;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<String> {
        match input.eat_str_fold(self.0) {
            Some(consumed) => Ok(consumed.to_owned()),
            None => Err(input.fail_here(format!(
                "Expected \"{}\" (any case), found {}",
                self.0,
                input.describe_next()
            ))),
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" (any case)", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct Position;
/// The current stream position, consuming nothing.
pub fn position<S: 'static>() -> Parser<usize, S> {
    Parser::new(Position)
}
impl<S> Parse<S> for Position {
    type Output = usize;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<usize> {
        Ok(input.pos())
    }

    fn expects(&self, _: &mut Formatter<'_>) -> fmt::Result {
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct End;
/// The end of the input.
pub fn end<S: 'static>() -> Parser<(), S> {
    Parser::new(End)
}
impl<S> Parse<S> for End {
    type Output = ();

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<()> {
        if input.at_end() {
            Ok(())
        } else {
            Err(input.fail_here(format!(
                "Expected end of input, found {}",
                input.describe_next()
            )))
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<end of input>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matchchar_leaves_stream_on_failure() {
        let p = matchchar::<()>('a');
        let mut s = Stream::new("b");
        let fail = p.run(&mut s).unwrap_err();
        assert!(!fail.consumed);
        assert_eq!(fail.pos, 0);
        assert_eq!(s.pos(), 0);
        assert_eq!(fail.expected, "Expected 'a', found 'b'");
    }

    #[test]
    fn foldchar_yields_stream_character() {
        // against either case variant the actual character is produced,
        // consuming exactly one character
        for src in ["x rest", "X rest"] {
            let mut s = Stream::new(src);
            let got = foldchar::<()>('x').run(&mut s).unwrap();
            assert_eq!(Some(got), src.chars().next());
            assert_eq!(s.pos(), 1);
        }

        let mut s = Stream::new("y");
        let fail = foldchar::<()>('x').run(&mut s).unwrap_err();
        assert!(!fail.consumed);
        assert_eq!(s.pos(), 0);
    }

    #[test]
    fn literals() {
        assert_eq!(matchstr::<()>("let").parse_str("let x"), Ok("let"));
        assert!(matchstr::<()>("let").parse_str("Let x").is_err());
        assert_eq!(
            foldstr::<()>("let").parse_str("LET x"),
            Ok(String::from("LET"))
        );
    }

    #[test]
    fn position_and_end() {
        let mut s = Stream::new("a");
        assert_eq!(position::<()>().run(&mut s), Ok(0));
        assert!(end::<()>().run(&mut s).is_err());
        s.bump();
        assert_eq!(end::<()>().run(&mut s), Ok(()));
    }
}
