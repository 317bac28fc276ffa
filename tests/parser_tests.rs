// Integration tests for the SimPL parser
//
// Syntax trees are compared through their S-expression rendering, which keeps
// expectations short. Error recovery tests check that one parse reports
// every independent mistake and still terminates.

use simpl::ast::{Expr, Stmt};
use simpl::lexer::{tokenize, TokenKind};
use simpl::parser::{parse_program, Parser, MAX_NESTING};

fn parse(source: &str) -> (Vec<String>, Vec<String>) {
    let mut parser = Parser::new(tokenize(source));
    let stmts = parser.parse().iter().map(|s| s.to_string()).collect();
    let errors = parser.errors().iter().map(|e| e.to_string()).collect();
    (stmts, errors)
}

fn parse_ok(source: &str) -> Vec<String> {
    let (stmts, errors) = parse(source);
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
    stmts
}

#[test]
fn test_precedence_ladder() {
    assert_eq!(
        parse_ok("1 + 2 * 3 - 4;"),
        vec!["(expr (- (+ 1 (* 2 3)) 4))"]
    );
    assert_eq!(parse_ok("a == b < c;"), vec!["(expr (== a (< b c)))"]);
    assert_eq!(parse_ok("x % 2 != 0;"), vec!["(expr (!= (% x 2) 0))"]);
}

#[test]
fn test_grouping_overrides_precedence() {
    assert_eq!(parse_ok("(1 + 2) * 3;"), vec!["(expr (* (+ 1 2) 3))"]);
}

#[test]
fn test_unary_minus_nests() {
    assert_eq!(parse_ok("- -x;"), vec!["(expr (- (- x)))"]);
}

#[test]
fn test_assignment_is_right_associative() {
    let stmts = Parser::new(tokenize("a = b = 5;")).parse();
    assert_eq!(stmts.len(), 1);
    match &stmts[0] {
        Stmt::Expression(Expr::Assign { name, value }) => {
            assert_eq!(name.text, "a");
            match value.as_ref() {
                Expr::Assign { name, value } => {
                    assert_eq!(name.text, "b");
                    assert!(matches!(value.as_ref(), Expr::Literal(t) if t.text == "5"));
                }
                other => panic!("expected nested assignment, got {:?}", other),
            }
        }
        other => panic!("expected assignment statement, got {:?}", other),
    }
}

#[test]
fn test_invalid_assignment_target_is_an_error() {
    let (stmts, errors) = parse("10 = 5;");
    assert!(stmts.is_empty());
    assert_eq!(errors, vec!["[line 1] Error: Invalid assignment target."]);
}

#[test]
fn test_binary_expression_is_not_an_assignment_target() {
    let (stmts, errors) = parse("a + b = 1; print 2;");
    assert_eq!(stmts, vec!["(print 2)"]);
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_let_and_print_statements() {
    assert_eq!(
        parse_ok("let x = 1 + 2; let y; print x;"),
        vec!["(let x (+ 1 2))", "(let y)", "(print x)"]
    );
}

#[test]
fn test_if_else_with_block() {
    assert_eq!(
        parse_ok("if (x) print 1; else { print 2; }"),
        vec!["(if x (print 1) (block (print 2)))"]
    );
}

#[test]
fn test_dangling_else_binds_to_nearest_if() {
    assert_eq!(
        parse_ok("if (a) if (b) print 1; else print 2;"),
        vec!["(if a (if b (print 1) (print 2)))"]
    );
}

#[test]
fn test_while_statement() {
    assert_eq!(
        parse_ok("while (i < 3) i = i + 1;"),
        vec!["(while (< i 3) (expr (= i (+ i 1))))"]
    );
}

#[test]
fn test_return_with_and_without_value() {
    assert_eq!(
        parse_ok("return; return 1 + 1;"),
        vec!["(return)", "(return (+ 1 1))"]
    );
}

#[test]
fn test_function_declaration() {
    let source =
        "func main() { let x = 10 + 20 * 2; if (x > 40) { return x; } else { return 0; } }";
    assert_eq!(
        parse_ok(source),
        vec![concat!(
            "(func main (let x (+ 10 (* 20 2))) ",
            "(if (> x 40) (block (return x)) (block (return 0))))"
        )]
    );
}

#[test]
fn test_function_parameters_are_rejected() {
    let (stmts, errors) = parse("func f(a) { }");
    assert!(stmts.is_empty());
    assert_eq!(errors[0], "[line 1] Error: Expect ')' after parameters.");
}

#[test]
fn test_func_without_name_is_not_a_declaration() {
    let (stmts, errors) = parse("func (); let x = 1;");
    assert_eq!(errors, vec!["[line 1] Error: Expect expression."]);
    assert_eq!(stmts, vec!["(let x 1)"]);
}

#[test]
fn test_literal_kinds_in_primary() {
    assert_eq!(
        parse_ok("print true; print nil; print 'c'; print \"s\"; print 1.5;"),
        vec!["(print true)", "(print nil)", "(print 'c')", "(print \"s\")", "(print 1.5)"]
    );
}

#[test]
fn test_two_missing_semicolons_give_two_errors() {
    let (stmts, errors) = parse("let a = 1\nlet b = 2\nlet c = 3;");
    assert_eq!(
        errors,
        vec![
            "[line 2] Error: Expect ';' after variable declaration.",
            "[line 3] Error: Expect ';' after variable declaration.",
        ]
    );
    assert_eq!(stmts, vec!["(let c 3)"]);
}

#[test]
fn test_recovery_resumes_after_semicolon() {
    let (stmts, errors) = parse("let a = 1;\nlet b = ;\nprint a;\nlet c = 3");
    assert_eq!(
        errors,
        vec![
            "[line 2] Error: Expect expression.",
            "[line 4] Error: Expect ';' after variable declaration.",
        ]
    );
    assert_eq!(stmts, vec!["(let a 1)", "(print a)"]);
}

#[test]
fn test_recovery_stops_before_while() {
    let (stmts, errors) = parse("print 1 while (0) print 2;");
    assert_eq!(errors, vec!["[line 1] Error: Expect ';' after value."]);
    assert_eq!(stmts, vec!["(while 0 (print 2))"]);
}

#[test]
fn test_recovery_stops_before_return() {
    let (stmts, errors) = parse("print 1 return 2;");
    assert_eq!(errors, vec!["[line 1] Error: Expect ';' after value."]);
    assert_eq!(stmts, vec!["(return 2)"]);
}

#[test]
fn test_recovery_stops_before_func() {
    let (stmts, errors) = parse("print 1 func f() { }");
    assert_eq!(errors, vec!["[line 1] Error: Expect ';' after value."]);
    assert_eq!(stmts, vec!["(func f)"]);
}

#[test]
fn test_error_inside_block_keeps_rest_of_block() {
    let (stmts, errors) = parse("{ let = 1; print 2; }");
    assert_eq!(errors, vec!["[line 1] Error: Expect variable name."]);
    assert_eq!(stmts, vec!["(block (print 2))"]);
}

#[test]
fn test_unclosed_block_reports_missing_brace() {
    let (stmts, errors) = parse("{ print 1;");
    assert!(stmts.is_empty());
    assert_eq!(errors, vec!["[line 1] Error: Expect '}' after block."]);
}

#[test]
fn test_unknown_tokens_are_reported() {
    let (_, errors) = parse("let x = @;");
    assert_eq!(errors, vec!["[line 1] Error: Unexpected character '@'."]);

    let (_, errors) = parse("print \"abc");
    assert_eq!(errors, vec!["[line 1] Error: Unterminated literal."]);
}

#[test]
fn test_garbage_input_terminates() {
    let mut parser = Parser::new(tokenize(") ) } ;; else = = ("));
    let stmts = parser.parse();
    assert!(stmts.is_empty());
    assert!(parser.has_errors());
}

#[test]
fn test_syntax_error_carries_offending_token() {
    let mut parser = Parser::new(tokenize("print 1 2;"));
    parser.parse();
    let errors = parser.take_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].token.kind, TokenKind::Integer);
    assert_eq!(errors[0].token.text, "2");
    assert!(parser.errors().is_empty());
}

#[test]
fn test_missing_eof_is_tolerated() {
    let mut tokens = tokenize("print 1;");
    tokens.pop();
    assert_eq!(Parser::new(tokens).parse().len(), 1);
    assert!(Parser::new(Vec::new()).parse().is_empty());
}

#[test]
fn test_parse_program_wraps_errors() {
    assert_eq!(parse_program(tokenize("print 1;")).map(|s| s.len()), Ok(1));
    let errors = parse_program(tokenize("print ;")).unwrap_err();
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_parsing_twice_gives_identical_trees() {
    let source = "let a = 10; if (a > 5) { a = a * 2; } else print 0; func f() { return a; }";
    let tokens = tokenize(source);
    let first = Parser::new(tokens.clone()).parse();
    let second = Parser::new(tokens).parse();
    assert_eq!(first, second);
}

#[test]
fn test_expression_lines_follow_anchor_tokens() {
    let stmts = Parser::new(tokenize("let a = 1;\na =\n  a +\n  2;")).parse();
    match &stmts[1] {
        Stmt::Expression(expr @ Expr::Assign { value, .. }) => {
            assert_eq!(expr.line(), 2);
            assert_eq!(value.line(), 3);
        }
        other => panic!("expected assignment statement, got {:?}", other),
    }
}

fn wrapped(open: &str, inner: &str, close: &str, depth: usize) -> String {
    format!("{}{}{}", open.repeat(depth), inner, close.repeat(depth))
}

#[test]
fn test_nesting_within_limit_parses() {
    let source = format!("print {};", wrapped("(", "1", ")", MAX_NESTING - 50));
    let stmts = parse_ok(&source);
    assert_eq!(stmts.len(), 1);
    assert!(stmts[0].starts_with("(print 1"));
}

#[test]
fn test_deeply_nested_grouping_is_one_error() {
    let source = format!("print {};", wrapped("(", "1", ")", 20_000));
    let (stmts, errors) = parse(&source);
    assert!(stmts.is_empty());
    assert_eq!(errors, vec!["[line 1] Error: Too much nesting."]);
}

#[test]
fn test_deep_unary_and_long_chains_are_one_error() {
    let unary = format!("print {}1;", "-".repeat(20_000));
    let sum = format!("print 1{};", " + 1".repeat(20_000));
    let assign = format!("{}1;", "a = ".repeat(20_000));
    for source in [unary, sum, assign] {
        let (stmts, errors) = parse(&source);
        assert!(stmts.is_empty());
        assert_eq!(errors, vec!["[line 1] Error: Too much nesting."]);
    }
}

#[test]
fn test_deep_blocks_keep_the_blocks_within_limit() {
    let source = wrapped("{ ", "print 1;", " }", 20_000);
    let (stmts, errors) = parse(&source);
    assert_eq!(stmts.len(), 1);
    assert!(stmts[0].starts_with("(block (block"));
    assert_eq!(errors[0], "[line 1] Error: Too much nesting.");
}

#[test]
fn test_nesting_budget_resets_between_statements() {
    let deep = wrapped("(", "1", ")", MAX_NESTING - 50);
    let source = format!("print {}; print {};", deep, deep);
    assert_eq!(parse_ok(&source).len(), 2);
}
