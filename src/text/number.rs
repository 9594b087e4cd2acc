//! Fixed-width integer and floating point parsers.
//!
//! Literals are scanned by lookahead first and only consumed once known to
//! be well-formed, so every failure here is non-consuming.

use std::fmt::{self, Formatter};
use std::marker::PhantomData;
use std::str::FromStr;

use crate::{stream::Stream, Parse, Parser, Reply};

/// A fixed-width integer type with a canonical decimal form.
pub trait Digits: FromStr + 'static {
    const SIGNED: bool;
    const NAME: &'static str;
}

macro_rules! digits {
    ($(($t:ty, $signed:literal)),* $(,)?) => {
        $(impl Digits for $t {
            const SIGNED: bool = $signed;
            const NAME: &'static str = stringify!($t);
        })*
    };
}

digits!(
    (u8, false),
    (u16, false),
    (u32, false),
    (u64, false),
    (i8, true),
    (i16, true),
    (i32, true),
    (i64, true),
);

fn digits_at(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .map_or(0, |s| s.iter().take_while(|b| b.is_ascii_digit()).count())
}

/// Byte length of a decimal integer literal at the start of `rest`.
fn scan_decimal(rest: &str, signed: bool) -> Option<usize> {
    let bytes = rest.as_bytes();
    let sign = usize::from(signed && matches!(bytes.first().copied(), Some(b'-' | b'+')));
    let digits = digits_at(bytes, sign);
    if digits == 0 {
        None
    } else {
        Some(sign + digits)
    }
}

/// Byte length of a float literal (`digits ['.' digits] [e [sign] digits]`)
/// at the start of `rest`.
fn scan_float(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut len = usize::from(matches!(bytes.first().copied(), Some(b'-' | b'+')));
    let whole = digits_at(bytes, len);
    if whole == 0 {
        return None;
    }
    len += whole;
    if bytes.get(len).copied() == Some(b'.') {
        let frac = digits_at(bytes, len + 1);
        if frac > 0 {
            len += 1 + frac;
        }
    }
    if matches!(bytes.get(len).copied(), Some(b'e' | b'E')) {
        let mut exp = len + 1;
        if matches!(bytes.get(exp).copied(), Some(b'-' | b'+')) {
            exp += 1;
        }
        let digits = digits_at(bytes, exp);
        if digits > 0 {
            len = exp + digits;
        }
    }
    Some(len)
}

#[derive(Clone, Debug)]
pub struct Integer<N: Digits>(PhantomData<N>);
/// A decimal integer of width `N` (signed widths accept a leading sign).
pub fn integer<N: Digits, S: 'static>() -> Parser<N, S> {
    Parser::new(Integer(PhantomData))
}
impl<N: Digits, S> Parse<S> for Integer<N> {
    type Output = N;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<N> {
        let Some(len) = scan_decimal(input.rest(), N::SIGNED) else {
            return Err(input.fail_here(format!(
                "Expected {}, found {}",
                N::NAME,
                input.describe_next()
            )));
        };
        match input.rest()[..len].parse::<N>() {
            Ok(value) => {
                input.advance(len);
                Ok(value)
            }
            Err(_) => Err(input.fail_here(format!(
                "Expected {}, literal \"{}\" is out of range",
                N::NAME,
                &input.rest()[..len]
            ))),
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", N::NAME)
    }
}

#[derive(Clone, Debug)]
pub struct Float;
/// A decimal floating point number.
pub fn float<S: 'static>() -> Parser<f64, S> {
    Parser::new(Float)
}
impl<S> Parse<S> for Float {
    type Output = f64;

    #[inline]
    fn parse(&self, input: &mut Stream<'_, S>) -> Reply<f64> {
        let Some(len) = scan_float(input.rest()) else {
            return Err(input.fail_here(format!(
                "Expected float, found {}",
                input.describe_next()
            )));
        };
        match input.rest()[..len].parse::<f64>() {
            Ok(value) => {
                input.advance(len);
                Ok(value)
            }
            Err(_) => Err(input.fail_here(format!(
                "Expected float, literal \"{}\" is malformed",
                &input.rest()[..len]
            ))),
        }
    }

    fn expects(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "<float>")
    }
}
