use super::*;

fn sample_program() -> Program {
    Program {
        root: Node::BinaryOp {
            operator: BinaryOperator::Multiply,
            left: Box::new(Node::Variable {
                name: "time".to_string(),
            }),
            right: Box::new(Node::Literal {
                value: LiteralValue::Number(2.0),
                value_kind: ValueKind::Number,
            }),
        },
        params: vec![ParamSpec::new("time", ValueKind::Number)],
        return_kind: ValueKind::Number,
    }
}

#[test]
fn wire_form_uses_type_discriminator_and_camel_case() {
    let json = sample_program().to_wire_json().unwrap();
    let v: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["root"]["type"], "binaryOp");
    assert_eq!(v["root"]["operator"], "multiply");
    assert_eq!(v["root"]["left"]["type"], "variable");
    assert_eq!(v["root"]["left"]["name"], "time");
    assert_eq!(v["root"]["right"]["type"], "literal");
    assert_eq!(v["root"]["right"]["valueKind"], "number");
    assert_eq!(v["returnKind"], "number");
}

#[test]
fn wire_round_trip_is_lossless() {
    let program = sample_program();
    let back = Program::from_wire_json(&program.to_wire_json().unwrap()).unwrap();
    assert_eq!(back, program);
}

#[test]
fn conditional_wire_fields() {
    let node = Node::Conditional {
        condition: Box::new(Node::Literal {
            value: LiteralValue::Bool(true),
            value_kind: ValueKind::Boolean,
        }),
        then_branch: Box::new(Node::Literal {
            value: LiteralValue::Number(1.0),
            value_kind: ValueKind::Number,
        }),
        else_branch: Box::new(Node::Literal {
            value: LiteralValue::Number(0.0),
            value_kind: ValueKind::Number,
        }),
    };
    let v = serde_json::to_value(&node).unwrap();
    assert_eq!(v["type"], "conditional");
    assert!(v.get("thenBranch").is_some());
    assert!(v.get("elseBranch").is_some());
}

#[test]
fn unknown_call_name_is_unrepresentable_on_the_wire() {
    let json = r#"{"type": "call", "function": "launchMissiles", "args": []}"#;
    assert!(serde_json::from_str::<Node>(json).is_err());

    let json = r#"{"type": "call", "function": "atan2", "args": []}"#;
    assert!(serde_json::from_str::<Node>(json).is_ok());
}

#[test]
fn unknown_node_type_is_rejected() {
    let json = r#"{"type": "whileLoop", "body": {}}"#;
    assert!(serde_json::from_str::<Node>(json).is_err());
}

#[test]
fn math_fn_names_round_trip_through_the_allow_list() {
    for f in [
        MathFn::Sin,
        MathFn::Atan2,
        MathFn::Log10,
        MathFn::Pow,
        MathFn::Round,
    ] {
        assert_eq!(MathFn::from_name(f.name()), Some(f));
    }
    assert_eq!(MathFn::from_name("random"), None);
    assert_eq!(MethodName::from_name("toUpperCase"), None);
}

#[test]
fn method_wire_names_are_camel_case() {
    assert_eq!(
        serde_json::to_string(&MethodName::Substring).unwrap(),
        "\"substring\""
    );
    assert_eq!(serde_json::to_string(&MathFn::Log10).unwrap(), "\"log10\"");
    assert_eq!(
        serde_json::to_string(&BinaryOperator::LessOrEqual).unwrap(),
        "\"lessOrEqual\""
    );
}
