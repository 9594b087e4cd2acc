//! End-to-end tests composing the resolver, pipes and recursion over a
//! realistic little grammar.

use pipette::{
    alts,
    core::{choice, mapsuc, recursive},
    pipe::pipe,
    resolve::{capture, caseless, of, resolved},
    stream::Stream,
    text::number::integer,
    Parse, Parser,
};

/// `LIMIT <n>` in any keyword casing, capturing only the count.
fn limit_clause() -> Parser<u32, ()> {
    pipe(caseless("limit"))
        .then(' ')
        .then(capture(of::<u32, ()>()))
        .map(|n: u32| n)
}

#[test]
fn keyword_casing_is_ignored_but_operands_are_exact() {
    assert_eq!(limit_clause().parse_str("LIMIT 10"), Ok(10));
    assert_eq!(limit_clause().parse_str("limit 3"), Ok(3));
    assert!(limit_clause().parse_str("limit ten").is_err());
}

#[test]
fn nested_recursive_expression() {
    // expr := int | '(' expr '+' expr ')' | '(' expr ')'
    //
    // the sum arm shares its prefix with the grouping arm, so its joins
    // backtrack-left to let the grouping arm be retried from scratch
    let expr = recursive::<i64, ()>(|expr| {
        let sum = pipe('(')
            .then_backtrack_left(capture(expr.clone()))
            .then_backtrack_left('+')
            .then_backtrack_left(capture(expr.clone()))
            .then_backtrack_left(')')
            .map(|a: i64, b: i64| a + b);
        let grouped = pipe('(')
            .then(capture(expr.clone()))
            .then(')')
            .map(|inner: i64| inner);
        choice(vec![integer(), sum, grouped])
    });

    assert_eq!(expr.parse_str("7"), Ok(7));
    assert_eq!(expr.parse_str("(7)"), Ok(7));
    assert_eq!(expr.parse_str("(1+2)"), Ok(3));
    assert_eq!(expr.parse_str("((5))"), Ok(5));
    assert_eq!(expr.parse_str("((1+2)+(3+4))"), Ok(10));
}

#[test]
fn alternation_macro_resolves_each_option() {
    let keyword: Parser<&'static str, ()> = alts!("select", "insert", "delete");
    assert_eq!(keyword.parse_str("insert into"), Ok("insert"));
    assert!(keyword.parse_str("update t").is_err());
}

#[test]
fn one_parser_value_is_reusable_across_runs() {
    let p = limit_clause();
    for (src, want) in [("limit 1", 1), ("LIMIT 2", 2), ("Limit 3", 3)] {
        assert_eq!(p.parse_str(src), Ok(want));
    }
}

#[test]
fn failures_carry_readable_expectations() {
    let fail = resolved::<(), _>(caseless('k')).parse_str("x").unwrap_err();
    assert_eq!(fail.expected, "Expected 'k' (any case), found 'x'");
    assert_eq!(fail.to_string(), "Expected 'k' (any case), found 'x' (at byte 0)");
}

/// A parser that mutates the user state: counts every list element parsed.
struct CountedItem;

impl Parse<usize> for CountedItem {
    type Output = u32;

    fn parse(&self, input: &mut Stream<'_, usize>) -> pipette::Reply<u32> {
        let item = integer::<u32, usize>().run(input)?;
        input.state += 1;
        Ok(item)
    }

    fn expects(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<counted item>")
    }
}

#[test]
fn user_state_threads_through_a_pipe() {
    let item = Parser::new(CountedItem);
    let pair = pipe(capture(item.clone()))
        .then(',')
        .then(capture(item))
        .map(|a: u32, b: u32| (a, b));

    let mut input = Stream::with_state("4,5", 0usize);
    assert_eq!(pair.run(&mut input), Ok((4, 5)));
    assert_eq!(input.state, 2);
}

#[test]
fn ambiguous_statement_heads_backtrack() {
    // both statements start with the same keyword; backtrack-left lets the
    // second alternative be tried after the shared prefix matched
    let drop_table = pipe(caseless("drop"))
        .then_backtrack_left(' ')
        .then_backtrack_left(caseless("table"))
        .then_backtrack_left(' ')
        .then_backtrack_left(capture(of::<u32, ()>()))
        .map(|id: u32| ("table", id));
    let drop_index = pipe(caseless("drop"))
        .then(' ')
        .then(caseless("index"))
        .then(' ')
        .then(capture(of::<u32, ()>()))
        .map(|id: u32| ("index", id));

    let stmt = choice(vec![drop_table, drop_index]);
    assert_eq!(stmt.parse_str("DROP TABLE 7"), Ok(("table", 7)));
    assert_eq!(stmt.parse_str("drop index 9"), Ok(("index", 9)));

    let fail = mapsuc(stmt, |_| ()).parse_str("drop view 1").unwrap_err();
    assert!(fail.consumed);
}
