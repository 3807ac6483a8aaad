//! Tree-walking evaluator for Remark programs.
mod builtins;
mod context;
mod value;

pub use self::context::*;
pub use self::value::*;

use crate::ast::Statement;

/// Owns the persistent [`Context`] and runs top-level statements against it.
pub struct Interpreter {
    context: Context,
}

impl Interpreter {
    pub fn new() -> Self {
        let mut context = Context::new();
        builtins::register(&mut context);
        Self { context }
    }

    /// Run a parsed unit; the result is the value of its last statement.
    pub fn run(&mut self, statements: &[Statement]) -> Value {
        let mut result = Value::Empty;
        for statement in statements {
            result = statement.run(&mut self.context);
        }
        result
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;

    use crate::lexer::Lexer;
    use crate::parser::Parser;

    use super::*;

    fn eval(source: &str) -> Value {
        let mut interpreter = Interpreter::new();
        eval_with(&mut interpreter, source)
    }

    fn eval_with(interpreter: &mut Interpreter, source: &str) -> Value {
        let tokens = Lexer::new(source).lex().expect("lexing failed");
        let statements = Parser::new(tokens)
            .parse_toplevel()
            .expect("parsing failed");
        interpreter.run(&statements)
    }

    fn number(value: i64) -> Value {
        Value::Number(BigInt::from(value))
    }

    fn string(value: &str) -> Value {
        Value::Str(value.to_owned())
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("add(1, 2)"), number(3));
        assert_eq!(eval("sub(1, 2)"), number(-1));
        assert_eq!(eval("mul(6, 7)"), number(42));
        assert_eq!(eval("div(7, 2)"), number(3));
        assert_eq!(eval("mod(7, 2)"), number(1));
    }

    #[test]
    fn test_division_by_zero_keeps_accumulator() {
        assert_eq!(eval("div(7, 0)"), number(7));
        assert_eq!(eval("mod(7, 0)"), number(7));
    }

    #[test]
    fn test_add_concatenates_strings() {
        assert_eq!(eval(r#"add("foo", "bar")"#), string("foobar"));
        assert_eq!(eval(r#"add("n = ", 42)"#), string("n = 42"));
        assert_eq!(eval(r#"add(42, "!")"#), string("42!"));
        assert_eq!(
            eval(r#"add("a", "b", "c")"#),
            string("abc"),
            "string add is sequential concatenation"
        );
    }

    #[test]
    fn test_add_is_tolerant_of_empty() {
        assert_eq!(eval(r#"add("x: ", nope)"#), string("x: <empty>"));
    }

    #[test]
    fn test_unbound_name_is_empty() {
        assert_eq!(eval("nowhere"), Value::Empty);
    }

    #[test]
    fn test_assignment_value_and_lookup() {
        assert_eq!(eval("x = 41; add(x, 1)"), number(42));
    }

    #[test]
    fn test_rebinding_makes_lookup_ambiguous() {
        let result = eval("x = 1; x = 2; x");

        assert_eq!(result, Value::resolution_set(vec![number(1), number(2)]));
    }

    #[test]
    fn test_mention_without_words_keeps_all_bindings() {
        let result = eval("x = 1; x = 2; [x]");

        assert_eq!(result, Value::resolution_set(vec![number(1), number(2)]));
    }

    #[test]
    fn test_mention_single_binding_flattens() {
        assert_eq!(eval("x = 1; [x]"), number(1));
    }

    #[test]
    fn test_indirect_mention_never_flattens() {
        let result = eval("x = 1; #[x]");

        assert_eq!(result, Value::resolution_set(vec![number(1)]));
    }

    #[test]
    fn test_mention_words_disambiguate() {
        let source = "# greets\nx = 1;\n# greets loudly\nx = 2;\n[x loudly]";

        assert_eq!(eval(source), number(2));
    }

    #[test]
    fn test_mention_of_unbound_name_is_empty() {
        assert_eq!(eval("[ghost]"), Value::Empty);
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(eval("gt(3, 2)"), number(1));
        assert_eq!(eval("gt(2, 3)"), number(0));
        assert_eq!(eval(r#"gt("b", "a")"#), number(1));
        assert_eq!(eval("eq(2, 2)"), number(1));
        assert_eq!(eval(r#"eq("a", "b")"#), number(0));
    }

    #[test]
    fn test_eq_on_types_is_structural() {
        assert_eq!(eval("eq(typeof(1), int)"), number(1));
        assert_eq!(eval(r#"eq(typeof((x: 1)), typeof((x: 2)))"#), number(1));
        assert_eq!(eval(r#"eq(typeof((x: 1)), typeof((y: 1)))"#), number(0));
        assert_eq!(eval("eq(int, string)"), number(0));
    }

    #[test]
    fn test_typeof_is_stable() {
        assert_eq!(eval("eq(typeof(main), typeof(main))"), number(1));
        assert_eq!(eval(r#"eq(typeof("s"), string)"#), number(1));
    }

    #[test]
    fn test_max_min() {
        assert_eq!(eval("max(3, 7)"), number(7));
        assert_eq!(eval("min(3, 7)"), number(3));
        assert_eq!(eval(r#"max("a", "b")"#), string("b"));
        assert_eq!(eval(r#"max(2, "1")"#), string("2"));
        assert_eq!(eval(r#"min(2, "1")"#), string("1"));
    }

    #[test]
    fn test_cond() {
        assert_eq!(eval(r#"cond(0, "a", 1, "b")"#), string("b"));
        assert_eq!(eval(r#"cond(0, "a")"#), Value::Empty);
        assert_eq!(eval(r#"cond(0, "a", "fallback")"#), string("fallback"));
        assert_eq!(eval(r#"cond(1, "a", 1, "b")"#), string("a"));
    }

    #[test]
    fn test_function_call() {
        assert_eq!(eval("f = {a, b | add(a, b)}; f(20, 22)"), number(42));
    }

    #[test]
    fn test_function_body_value_is_last_statement() {
        assert_eq!(eval("f = {x | add(x, 1); mul(x, 10)}; f(3)"), number(30));
    }

    #[test]
    fn test_missing_arguments_are_empty() {
        assert_eq!(eval("f = {a, b | b}; f(1)"), Value::Empty);
    }

    #[test]
    fn test_closure_captures_scope_by_value() {
        let source = "n = 1; f = {x | add(x, n)}; n = 100; f(1)";

        assert_eq!(eval(source), number(2));
    }

    #[test]
    fn test_call_distributes_over_resolution_set_callee() {
        let source = "f = {x | add(x, 1)}; f = {x | add(x, 2)}; f(10)";

        assert_eq!(
            eval(source),
            Value::resolution_set(vec![number(11), number(12)])
        );
    }

    #[test]
    fn test_call_distributes_over_resolution_set_arguments() {
        let source = "x = 1; x = 2; f = {n | mul(n, 10)}; f([x])";

        assert_eq!(
            eval(source),
            Value::resolution_set(vec![number(10), number(20)])
        );
    }

    #[test]
    fn test_fold_flattens_resolution_set_arguments() {
        assert_eq!(eval("x = 1; x = 2; add([x], 10)"), number(13));
    }

    #[test]
    fn test_loop() {
        assert_eq!(
            eval("loop(0, {x | add(x, 1)}, {x | gt(x, 2)})"),
            number(3)
        );
    }

    #[test]
    fn test_loop_through_cond() {
        let source = "f = {n | cond(gt(n, 10), n, add(n, 1)) };\nloop(0, f, {n | gt(n, 10)})";

        assert_eq!(eval(source), number(11));
    }

    #[test]
    fn test_get() {
        assert_eq!(eval(r#"get(0, "abc")"#), string("a"));
        assert_eq!(eval(r#"get(2, "abc")"#), string("c"));
        assert_eq!(eval(r#"get(5, "abc")"#), Value::Empty);
        assert_eq!(eval(r#"get("x", (x: 7))"#), number(7));
        assert_eq!(eval(r#"get(0, 1)"#), Value::Empty);
    }

    #[test]
    fn test_slice() {
        assert_eq!(eval(r#"slice(0, 1, "abc")"#), string("a"));
        assert_eq!(eval(r#"slice(1, 2, "abc")"#), string("bc"));
        assert_eq!(eval(r#"slice(1, 5, "abc")"#), Value::Empty);
        assert_eq!(eval(r#"slice("a", 1, "abc")"#), Value::Empty);
    }

    #[test]
    fn test_member_access() {
        assert_eq!(eval(r#"r = (x: 1, y: "s"); r.x"#), number(1));
        assert_eq!(eval(r#"r = (x: 1, y: "s"); r.y"#), string("s"));
        assert_eq!(eval(r#"r = (x: 1); r.z"#), Value::Empty);
        assert_eq!(eval(r#"s = "abc"; s.1"#), string("b"));
    }

    #[test]
    fn test_unnamed_record_fields_get_synthetic_names() {
        assert_eq!(eval(r#"r = (7, "a"); r._1"#), number(7));
        assert_eq!(eval(r#"r = (7, "a"); r._2"#), string("a"));
    }

    #[test]
    fn test_append_to_empty_record() {
        assert_eq!(eval(r#"r = append("a", ()); r._1"#), string("a"));
    }

    #[test]
    fn test_append_increments_length() {
        assert_eq!(
            eval(r#"r = (length: 0); r = append("a", r); r = append("b", r); r.length"#),
            number(2)
        );
    }

    #[test]
    fn test_append_to_non_record_returns_subject() {
        assert_eq!(eval(r#"append("a", 1)"#), number(1));
    }

    #[test]
    fn test_is_queries_function_comments() {
        let source = "f = {x |\n# doubles things\nmul(x, 2)};\nis(f, \"doubles\")";

        assert_eq!(eval(source), number(1));
        assert_eq!(
            eval("f = {x |\n# doubles things\nmul(x, 2)};\nis(f, \"halves\")"),
            number(0)
        );
    }

    #[test]
    fn test_is_sees_binding_comments() {
        let source = "# adds numbers\nadd2 = {a, b | add(a, b)};\n# adds strings\nadd2 = {a, b | add(a, b)};\nis(add2, \"strings\")";

        assert_eq!(
            eval(source),
            Value::resolution_set(vec![number(0), number(1)])
        );
    }

    #[test]
    fn test_is_on_non_function_is_empty() {
        assert_eq!(eval(r#"is(1, "x")"#), Value::Empty);
        assert_eq!(eval("f = {x | x}; is(f, 1)"), Value::Empty);
    }

    #[test]
    fn test_collapse_picks_one_element() {
        let result = eval("x = 1; x = 2; collapse([x])");

        assert!(result == number(1) || result == number(2));
    }

    #[test]
    fn test_record_member_types_match_the_shape() {
        assert_eq!(eval("r = (x: 1); eq(typeof(r.x), int)"), number(1));
        assert_eq!(
            eval(r#"r = (x: 1, y: "s"); eq(typeof(r.y), string)"#),
            number(1)
        );
    }

    #[test]
    fn test_typeof_record_shape() {
        let result = eval(r#"typeof((x: 1, y: "s"))"#);

        assert_eq!(result.to_string(), "record { x: int y: string }");
    }

    #[test]
    fn test_mentions_can_pick_native_functions_by_comment() {
        // "addition" only occurs in the builtin comment of add.
        let result = eval("m = add; m = sub; [m addition]");

        assert!(matches!(result, Value::NativeFunction(_)));
        assert_eq!(eval("m = add; m = sub; [m addition](40, 2)"), number(42));
    }

    #[test]
    fn test_context_persists_across_units() {
        let mut interpreter = Interpreter::new();
        eval_with(&mut interpreter, "x = 41;");

        assert_eq!(eval_with(&mut interpreter, "add(x, 1)"), number(42));
    }
}
