use super::*;
use crate::compiler::parser::{WorkletSource, compile};
use crate::foundation::core::{ParamSpec, ValueKind};

fn number_program(body: &str) -> Program {
    compile(&WorkletSource {
        params: vec![ParamSpec::new("time", ValueKind::Number)],
        return_kind: ValueKind::Number,
        body: body.to_string(),
    })
    .unwrap()
}

fn time_binding(time: f64) -> FrameBinding {
    let mut binding = FrameBinding::new();
    binding.set("time", Value::Number(time));
    binding
}

fn eval_number(body: &str, time: f64) -> f64 {
    Interpreter::evaluate(&number_program(body), &time_binding(time))
        .unwrap()
        .as_number()
        .unwrap()
}

#[test]
fn arithmetic_fidelity() {
    assert_eq!(eval_number("time * 2", 2.0), 4.0);
    assert_eq!(eval_number("time * 2", 0.0), 0.0);
    assert_eq!(eval_number("time * 2", -3.5), -7.0);
}

#[test]
fn division_by_zero_follows_ieee754() {
    assert_eq!(eval_number("1 / time", 0.0), f64::INFINITY);
    assert_eq!(eval_number("-1 / time", 0.0), f64::NEG_INFINITY);
    assert!(eval_number("0 / time", 0.0).is_nan());
}

#[test]
fn modulo_sign_follows_dividend() {
    assert_eq!(eval_number("time % 3", 7.0), 1.0);
    assert_eq!(eval_number("time % 3", -7.0), -1.0);
    assert_eq!(eval_number("time % -3", 7.0), 1.0);
}

#[test]
fn conditional_evaluates_only_the_taken_branch() {
    // The untaken branch would fail (unresolved variable); taking the other
    // branch must not surface that failure.
    let program = number_program("time > 0 ? time : ghost");
    let out = Interpreter::evaluate(&program, &time_binding(5.0)).unwrap();
    assert_eq!(out.as_number().unwrap(), 5.0);

    // And division by zero in the untaken branch is likewise unreachable.
    assert_eq!(eval_number("time > 0 ? time : 1 / 0", 5.0), 5.0);
    assert_eq!(eval_number("time > 0 ? time * 2 : 0", -1.0), 0.0);
}

#[test]
fn logical_operators_short_circuit() {
    let program = compile(&WorkletSource {
        params: vec![ParamSpec::new("flag", ValueKind::Boolean)],
        return_kind: ValueKind::Number,
        body: "flag && ghost > 0 ? 1 : 0".to_string(),
    })
    .unwrap();
    let mut binding = FrameBinding::new();
    binding.set("flag", Value::Bool(false));
    // `ghost` never evaluates when the left side already decides.
    let out = Interpreter::evaluate(&program, &binding).unwrap();
    assert_eq!(out.as_number().unwrap(), 0.0);

    let program = compile(&WorkletSource {
        params: vec![ParamSpec::new("flag", ValueKind::Boolean)],
        return_kind: ValueKind::Number,
        body: "flag || ghost > 0 ? 1 : 0".to_string(),
    })
    .unwrap();
    let mut binding = FrameBinding::new();
    binding.set("flag", Value::Bool(true));
    let out = Interpreter::evaluate(&program, &binding).unwrap();
    assert_eq!(out.as_number().unwrap(), 1.0);
}

#[test]
fn clamp_boundaries() {
    assert_eq!(eval_number("time.clamp(0.0, 1.0)", -5.0), 0.0);
    assert_eq!(eval_number("time.clamp(0.0, 1.0)", 5.0), 1.0);
    assert_eq!(eval_number("time.clamp(0.0, 1.0)", 0.5), 0.5);
}

#[test]
fn clamp_with_inverted_bounds_returns_min() {
    assert_eq!(eval_number("time.clamp(1.0, 0.0)", 0.5), 1.0);
    assert_eq!(eval_number("time.clamp(1.0, 0.0)", 2.0), 1.0);
}

#[test]
fn rounding_methods() {
    assert_eq!(eval_number("time.floor()", 3.9), 3.0);
    assert_eq!(eval_number("time.ceil()", 3.1), 4.0);
    assert_eq!(eval_number("time.round()", 3.5), 4.0);
    assert_eq!(eval_number("time.abs()", -3.5), 3.5);
}

#[test]
fn math_functions() {
    assert_eq!(eval_number("sin(time)", 0.0), 0.0);
    assert_eq!(eval_number("pow(time, 3)", 2.0), 8.0);
    assert_eq!(eval_number("max(time, 10)", 2.0), 10.0);
    assert_eq!(eval_number("min(time, 10)", 2.0), 2.0);
    assert_eq!(eval_number("atan2(time, time)", 1.0), std::f64::consts::FRAC_PI_4);
    assert_eq!(eval_number("log(exp(time))", 2.0), 2.0);
    assert_eq!(eval_number("sqrt(time)", 9.0), 3.0);
}

fn words_program(body: &str) -> Program {
    compile(&WorkletSource {
        params: vec![
            ParamSpec::new("index", ValueKind::Number),
            ParamSpec::new("words", ValueKind::List),
        ],
        return_kind: ValueKind::Str,
        body: body.to_string(),
    })
    .unwrap()
}

fn words_binding(index: f64) -> FrameBinding {
    let mut binding = FrameBinding::new();
    binding.set("index", Value::Number(index));
    binding.set(
        "words",
        Value::List(vec![
            Value::Str("Hello".to_string()),
            Value::Str("World".to_string()),
        ]),
    );
    binding
}

#[test]
fn list_modulo_indexing_end_to_end() {
    let program = words_program("words[index.floor() % words.length]");
    let out = Interpreter::evaluate(&program, &words_binding(3.0)).unwrap();
    assert_eq!(out.as_str().unwrap(), "World");

    let out = Interpreter::evaluate(&program, &words_binding(2.2)).unwrap();
    assert_eq!(out.as_str().unwrap(), "Hello");
}

#[test]
fn out_of_range_index_is_an_evaluation_error() {
    let program = words_program("words[5]");
    let err = Interpreter::evaluate(&program, &words_binding(0.0)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "evaluation error: index 5 out of range for length 2"
    );

    let program = words_program("words[0 - 1]");
    assert!(Interpreter::evaluate(&program, &words_binding(0.0)).is_err());
}

#[test]
fn string_indexing_yields_one_character_strings() {
    let program = words_program("words[0][1]");
    let out = Interpreter::evaluate(&program, &words_binding(0.0)).unwrap();
    assert_eq!(out.as_str().unwrap(), "e");
}

fn text_program(body: &str) -> Program {
    compile(&WorkletSource {
        params: vec![ParamSpec::new("label", ValueKind::Str)],
        return_kind: ValueKind::Str,
        body: body.to_string(),
    })
    .unwrap()
}

fn label_binding(label: &str) -> FrameBinding {
    let mut binding = FrameBinding::new();
    binding.set("label", Value::Str(label.to_string()));
    binding
}

#[test]
fn substring_clamps_indices() {
    let eval = |body: &str, label: &str| {
        Interpreter::evaluate(&text_program(body), &label_binding(label))
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    };
    assert_eq!(eval("label.substring(1, 3)", "hello"), "el");
    assert_eq!(eval("label.substring(1)", "hello"), "ello");
    assert_eq!(eval("label.substring(0 - 5, 99)", "hello"), "hello");
    assert_eq!(eval("label.substring(4, 2)", "hello"), "");
    assert_eq!(eval("label.substring(99)", "hello"), "");
}

#[test]
fn length_counts_characters_and_elements() {
    let out = Interpreter::evaluate(&text_program("label.length"), &label_binding("héllo"))
        .unwrap();
    assert_eq!(out.as_number().unwrap(), 5.0);

    let program = words_program("words.length");
    let out = Interpreter::evaluate(&program, &words_binding(0.0)).unwrap();
    assert_eq!(out.as_number().unwrap(), 2.0);
}

#[test]
fn type_mismatch_is_an_evaluation_error_not_a_panic() {
    // String method on a number.
    let program = number_program("time.substring(0)");
    let err = Interpreter::evaluate(&program, &time_binding(1.0)).unwrap_err();
    assert!(matches!(err, crate::foundation::error::FrameletError::Evaluation(_)));

    // Ordering comparison on a string.
    let program = text_program("label < 'z' ? 'a' : 'b'");
    assert!(Interpreter::evaluate(&program, &label_binding("x")).is_err());

    // Non-boolean condition.
    let program = number_program("time ? 1 : 0");
    assert!(Interpreter::evaluate(&program, &time_binding(1.0)).is_err());
}

#[test]
fn equality_across_kinds_is_false() {
    let program = text_program("label == 1 ? 'same' : 'different'");
    let out = Interpreter::evaluate(&program, &label_binding("1")).unwrap();
    assert_eq!(out.as_str().unwrap(), "different");
}

#[test]
fn unresolved_variable_at_runtime_is_an_evaluation_error() {
    let program = number_program("time * 2");
    let err = Interpreter::evaluate(&program, &FrameBinding::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "evaluation error: unresolved variable 'time'"
    );
}

#[test]
fn evaluation_is_deterministic_across_invocations() {
    let program = number_program("sin(time * 6.28) * 0.5 + 0.5");
    let binding = time_binding(0.37);
    let a = Interpreter::evaluate(&program, &binding).unwrap();
    let b = Interpreter::evaluate(&program, &binding).unwrap();
    assert!(a.value_eq(&b));
}

#[test]
fn negation_and_not() {
    assert_eq!(eval_number("-time", 3.0), -3.0);
    let program = compile(&WorkletSource {
        params: vec![ParamSpec::new("flag", ValueKind::Boolean)],
        return_kind: ValueKind::Number,
        body: "!flag ? 1 : 0".to_string(),
    })
    .unwrap();
    let mut binding = FrameBinding::new();
    binding.set("flag", Value::Bool(false));
    let out = Interpreter::evaluate(&program, &binding).unwrap();
    assert_eq!(out.as_number().unwrap(), 1.0);
}
