use std::time::{Duration, Instant};

use lexpat_rs::{
    CompilerOptions, ExtractError, Extractor, ExtractorOptions, Pattern, PatternCompiler,
    RegexValidator, Syntax, Token, TokenStream, WildcardPolicy, extract,
};

fn compile(source: &str) -> Pattern {
    Pattern::compile(source).expect("pattern should compile")
}

fn stream(values: &[&str]) -> TokenStream {
    TokenStream::new(Syntax::default().tokens(values.iter().copied()))
}

#[test]
fn extractor_when_unit_matches_then_consumes_one_without_captures() {
    let mut input = stream(&["x"]);
    let result = extract(&compile("x"), &mut input).expect("extraction should not error");

    assert!(result.is_matched());
    assert_eq!(result.consumed(), 1);
    assert!(result.captures().is_empty());
    assert_eq!(input.index(), 1);
}

#[test]
fn extractor_when_unit_mismatches_then_cursor_is_unchanged() {
    let pattern = compile("x");
    let mut input = stream(&["y"]);

    let first = extract(&pattern, &mut input).expect("extraction should not error");
    let second = extract(&pattern, &mut input).expect("extraction should not error");

    assert!(!first.is_matched());
    assert_eq!(first, second);
    assert_eq!(input.index(), 0);
}

#[test]
fn extractor_when_optional_is_absent_then_matches_consuming_nothing() {
    let pattern = compile("[a]");

    let empty = extract(&pattern, &mut stream(&[])).expect("extraction should not error");
    assert!(empty.is_matched());
    assert_eq!(empty.consumed(), 0);

    let present = extract(&pattern, &mut stream(&["a"])).expect("extraction should not error");
    assert!(present.is_matched());
    assert_eq!(present.consumed(), 1);
}

#[test]
fn extractor_when_pattern_is_blank_then_matches_exactly_one_blank_token() {
    let pattern = compile(" ");

    let mut blank = stream(&[" ", "x"]);
    let result = extract(&pattern, &mut blank).expect("extraction should not error");
    assert!(result.is_matched());
    assert_eq!(result.consumed(), 1);
    assert!(result.captures().is_empty());
    assert_eq!(blank.index(), 1);

    let result = extract(&pattern, &mut stream(&["x"])).expect("extraction should not error");
    assert!(!result.is_matched());
}

#[test]
fn extractor_when_wildcard_has_no_token_left_then_only_optional_form_matches() {
    let input = ["a"];

    let required = extract(&compile("a *"), &mut stream(&input)).expect("extraction should not error");
    assert!(!required.is_matched());

    let optional =
        extract(&compile("a [*]"), &mut stream(&input)).expect("extraction should not error");
    assert!(optional.is_matched());
    assert_eq!(optional.consumed(), 1);
}

#[test]
fn extractor_when_variant_alternative_fails_later_then_next_alternative_is_tried() {
    let result =
        extract(&compile("(a|a b) c"), &mut stream(&["a", "b", "c"])).expect("extraction should not error");

    assert!(result.is_matched());
    assert_eq!(result.consumed(), 3);
}

#[test]
fn extractor_when_variant_compiled_then_each_alternative_matches() {
    let pattern = compile("(a|b)");

    for value in ["a", "b"] {
        let result = extract(&pattern, &mut stream(&[value])).expect("extraction should not error");
        assert!(result.is_matched(), "alternative {value} should match");
    }

    let result = extract(&pattern, &mut stream(&["c"])).expect("extraction should not error");
    assert!(!result.is_matched());
}

#[test]
fn extractor_when_unit_is_named_then_capture_holds_its_token() {
    let result =
        extract(&compile("name:a"), &mut stream(&["a"])).expect("extraction should not error");

    assert_eq!(result.captures().len(), 1);
    assert_eq!(result.captures().values_of("name"), Some(vec!["a"]));
}

#[test]
fn extractor_when_section_nested_then_consumes_through_matching_close() {
    let pattern = compile("~{");

    let flat = extract(&pattern, &mut stream(&["{", "x", "y", "}"]))
        .expect("extraction should not error");
    assert_eq!(flat.consumed(), 4);

    let nested = extract(&pattern, &mut stream(&["{", "{", "z", "}", "}"]))
        .expect("extraction should not error");
    assert_eq!(nested.consumed(), 5);
}

#[test]
fn extractor_when_section_never_closes_then_does_not_match() {
    let result = extract(&compile("~{"), &mut stream(&["{", "{", "z", "}"]))
        .expect("extraction should not error");

    assert!(!result.is_matched());
}

#[test]
fn extractor_when_section_is_named_then_capture_excludes_separators() {
    let result = extract(
        &compile("call name:* args:~("),
        &mut stream(&["call", "f", "(", "a", ",", "b", ")"]),
    )
    .expect("extraction should not error");

    assert_eq!(result.consumed(), 7);
    assert_eq!(result.captures().values_of("name"), Some(vec!["f"]));
    assert_eq!(result.captures().values_of("args"), Some(vec!["a", ",", "b"]));
}

#[test]
fn extractor_when_literal_escapes_brackets_then_matches_three_tokens() {
    let result = extract(&compile(r"\[a\]"), &mut stream(&["[", "a", "]"]))
        .expect("extraction should not error");

    assert!(result.is_matched());
    assert_eq!(result.consumed(), 3);
}

#[test]
fn extractor_when_wildcard_trails_then_it_takes_the_rest() {
    let result = extract(
        &compile("return value:*"),
        &mut stream(&["return", "a", "+", "b"]),
    )
    .expect("extraction should not error");

    assert_eq!(result.consumed(), 4);
    assert_eq!(result.captures().values_of("value"), Some(vec!["a", "+", "b"]));
}

#[test]
fn extractor_when_policy_is_greedy_then_wildcard_prefers_longest_run() {
    let options = CompilerOptions::builder()
        .wildcard_policy(WildcardPolicy::Greedy)
        .build()
        .expect("options should build");
    let compiler = PatternCompiler::with_options(options);
    let pattern =
        Pattern::compile_with(&compiler, "head:* ; tail:*").expect("pattern should compile");

    let result = extract(&pattern, &mut stream(&["a", ";", "b", ";", "c"]))
        .expect("extraction should not error");

    assert_eq!(result.captures().values_of("head"), Some(vec!["a", ";", "b"]));
    assert_eq!(result.captures().values_of("tail"), Some(vec!["c"]));
}

#[test]
fn extractor_when_policy_is_lazy_then_every_wildcard_takes_the_shortest_run() {
    let options = CompilerOptions::builder()
        .wildcard_policy(WildcardPolicy::Lazy)
        .build()
        .expect("options should build");
    let compiler = PatternCompiler::with_options(options);

    let split =
        Pattern::compile_with(&compiler, "head:* ; tail:*").expect("pattern should compile");
    let mut input = stream(&["a", ";", "b", ";", "c"]);
    let result = extract(&split, &mut input).expect("extraction should not error");

    assert_eq!(result.captures().values_of("head"), Some(vec!["a"]));
    assert_eq!(result.captures().values_of("tail"), Some(vec!["b"]));
    assert_eq!(result.consumed(), 3);
    assert_eq!(input.index(), 3);

    let trailing = Pattern::compile_with(&compiler, "value:*").expect("pattern should compile");
    let result = extract(&trailing, &mut stream(&["a", "b"])).expect("extraction should not error");

    assert_eq!(result.consumed(), 1);
    assert_eq!(result.captures().values_of("value"), Some(vec!["a"]));
}

#[test]
fn extractor_when_hint_has_validator_then_rejected_runs_do_not_match() {
    let validator = RegexValidator::new()
        .rule("number", r"\d+")
        .expect("expression should compile");
    let pattern = compile("n:<number> x").with_validator(validator);

    let accepted =
        extract(&pattern, &mut stream(&["42", "x"])).expect("extraction should not error");
    assert_eq!(accepted.captures().values_of("n"), Some(vec!["42"]));

    let rejected =
        extract(&pattern, &mut stream(&["ab", "x"])).expect("extraction should not error");
    assert!(!rejected.is_matched());
}

#[test]
fn extractor_when_isolation_enforced_then_glued_tokens_are_rejected() {
    let syntax = Syntax::default();
    let extractor = Extractor::new(&syntax)
        .with_options(ExtractorOptions::builder().enforce_isolation(true).build());
    let pattern = compile("foo");

    let mut glued = TokenStream::new(vec![Token::new("x"), Token::new("foo")]);
    glued.read(1);
    let result = extractor
        .extract(&pattern, &mut glued)
        .expect("extraction should not error");
    assert!(!result.is_matched());
    assert_eq!(glued.index(), 1);

    let mut spaced = TokenStream::new(syntax.tokens(["x", "foo"]));
    spaced.read(1);
    let result = extractor
        .extract(&pattern, &mut spaced)
        .expect("extraction should not error");
    assert!(result.is_matched());

    let mut lenient_input = TokenStream::new(vec![Token::new("x"), Token::new("foo")]);
    lenient_input.read(1);
    let lenient = Extractor::new(&syntax)
        .extract(&pattern, &mut lenient_input)
        .expect("extraction should not error");
    assert!(lenient.is_matched());
}

#[test]
fn extractor_when_dynamic_has_resolver_then_reference_consumes_resolved_tokens() {
    let syntax = Syntax::default();
    let resolver = |reference: &str, tokens: &[Token]| {
        (reference == "number" && tokens.first()?.value().parse::<i64>().is_ok()).then_some(1usize)
    };
    let extractor = Extractor::new(&syntax).with_resolver(&resolver);

    let result = extractor
        .extract(&compile("x = n:{number} ;"), &mut stream(&["x", "=", "7", ";"]))
        .expect("extraction should not error");
    assert_eq!(result.consumed(), 4);
    assert_eq!(result.captures().values_of("n"), Some(vec!["7"]));
}

#[test]
fn extractor_when_dynamic_has_no_resolver_then_returns_error() {
    let mut input = stream(&["a"]);
    let err = extract(&compile("{expr}"), &mut input).expect_err("missing resolver should error");

    assert!(matches!(err, ExtractError::MissingResolver { ref reference, .. } if reference == "expr"));
    assert_eq!(input.index(), 0);
}

#[test]
fn extractor_when_stream_partially_read_then_matching_starts_at_cursor() {
    let mut input = stream(&["a", "b", "c"]);
    input.read(1);

    let result = extract(&compile("b c"), &mut input).expect("extraction should not error");

    assert_eq!(result.consumed(), 2);
    assert!(!input.has_next());
}

#[test]
fn extractor_when_sequence_matches_then_consumed_is_sum_of_children() {
    let result = extract(
        &compile("a [b] (c d|e) ~( f:*"),
        &mut stream(&["a", "e", "(", "x", ")", "y", "z"]),
    )
    .expect("extraction should not error");

    // 1 + 0 + 1 + 3 + 2
    assert_eq!(result.consumed(), 7);
    assert_eq!(result.captures().values_of("f"), Some(vec!["y", "z"]));
}

#[test]
fn extractor_when_nested_variants_of_wildcards_fail_then_terminates_unmatched() {
    let pattern = compile("((* *|*) (* *|*)|(* *|*) *) (* *|*) (* *|*) end");
    let values = ["a"; 12];

    let started = Instant::now();
    let result = extract(&pattern, &mut stream(&values)).expect("extraction should not error");

    assert!(!result.is_matched());
    assert!(started.elapsed() < Duration::from_secs(30));
}
