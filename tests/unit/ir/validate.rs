use super::*;
use crate::compiler::parser::{WorkletSource, compile};
use crate::foundation::core::{ParamSpec, ValueKind};
use crate::ir::node::MathFn;

fn compiled(params: Vec<ParamSpec>, body: &str) -> Program {
    compile(&WorkletSource {
        params,
        return_kind: ValueKind::Number,
        body: body.to_string(),
    })
    .unwrap()
}

#[test]
fn resolved_variables_pass() {
    let program = compiled(
        vec![ParamSpec::new("time", ValueKind::Number)],
        "sin(time) * 0.5",
    );
    assert!(validate(&program).is_ok());
}

#[test]
fn unresolved_variable_fails_closed() {
    let program = compiled(vec![ParamSpec::new("time", ValueKind::Number)], "velocity * 2");
    let err = validate(&program).unwrap_err();
    assert_eq!(
        err.to_string(),
        "validation error: unresolved variable 'velocity'"
    );
}

#[test]
fn unresolved_variable_in_untaken_branch_still_fails() {
    // Validation is static; short-circuiting at evaluation time does not
    // excuse an unresolvable name.
    let program = compiled(
        vec![ParamSpec::new("time", ValueKind::Number)],
        "time > 0 ? time : ghost",
    );
    assert!(validate(&program).is_err());
}

#[test]
fn duplicate_parameter_fails() {
    let program = compiled(
        vec![
            ParamSpec::new("time", ValueKind::Number),
            ParamSpec::new("time", ValueKind::Str),
        ],
        "time",
    );
    let err = validate(&program).unwrap_err();
    assert_eq!(err.to_string(), "validation error: duplicate parameter 'time'");
}

#[test]
fn empty_parameter_name_fails() {
    let program = compiled(vec![ParamSpec::new("", ValueKind::Number)], "1");
    assert!(validate(&program).is_err());
}

#[test]
fn hand_built_bad_arity_is_caught() {
    // The parser enforces arity too; validation re-checks programs that
    // arrive via the wire rather than the compiler.
    let program = Program {
        root: Node::Call {
            function: MathFn::Pow,
            args: vec![Node::Literal {
                value: crate::ir::node::LiteralValue::Number(2.0),
                value_kind: ValueKind::Number,
            }],
        },
        params: vec![],
        return_kind: ValueKind::Number,
    };
    let err = validate(&program).unwrap_err();
    assert!(err.to_string().contains("pow() takes 2 argument(s)"));
}
