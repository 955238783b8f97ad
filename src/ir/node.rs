use crate::foundation::core::{ParamSpec, Value, ValueKind};
use crate::foundation::error::{FrameletError, FrameletResult};

/// One IR expression node.
///
/// The wire form is the contract between the authoring and execution sides
/// and is a JSON tree where every node carries a `type` discriminator, e.g.
/// `{"type": "binaryOp", "operator": "multiply", "left": …, "right": …}`.
///
/// Call targets are typed enums, so a call outside the allow-list is
/// unrepresentable in the IR rather than merely rejected: an unknown name
/// fails at compile time and again when parsing the wire form.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Node {
    /// Numeric, string, or boolean constant.
    Literal {
        /// The constant itself.
        value: LiteralValue,
        /// Declared kind of the constant.
        value_kind: ValueKind,
    },
    /// Reference to a bound parameter.
    Variable {
        /// Parameter name; must resolve against the declared parameter list.
        name: String,
    },
    /// Arithmetic, comparison, or logical operation.
    BinaryOp {
        /// Operation to apply.
        operator: BinaryOperator,
        /// Left operand.
        left: Box<Node>,
        /// Right operand.
        right: Box<Node>,
    },
    /// Numeric negation or logical not.
    UnaryOp {
        /// Operation to apply.
        operator: UnaryOperator,
        /// Operand.
        operand: Box<Node>,
    },
    /// Ternary; the only branching construct. Only the taken branch runs.
    Conditional {
        /// Boolean condition.
        condition: Box<Node>,
        /// Branch taken when the condition holds.
        then_branch: Box<Node>,
        /// Branch taken otherwise.
        else_branch: Box<Node>,
    },
    /// Allow-listed free math function call.
    Call {
        /// Function to invoke.
        function: MathFn,
        /// Argument expressions; arity is validated.
        args: Vec<Node>,
    },
    /// Allow-listed method-style call on a value.
    MethodCall {
        /// Receiver expression.
        target: Box<Node>,
        /// Method to invoke.
        method: MethodName,
        /// Argument expressions; arity is validated.
        args: Vec<Node>,
    },
    /// Allow-listed property read on a value.
    Property {
        /// Receiver expression.
        target: Box<Node>,
        /// Property to read.
        property: PropertyName,
    },
    /// List element or string character access.
    Index {
        /// List or string expression.
        collection: Box<Node>,
        /// Numeric index expression; floored before the range check.
        index: Box<Node>,
    },
}

/// Constant payload of a [`Node::Literal`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    /// Boolean constant.
    Bool(bool),
    /// Numeric constant.
    Number(f64),
    /// String constant.
    Str(String),
}

impl LiteralValue {
    /// Kind of this literal.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::Str(_) => ValueKind::Str,
        }
    }

    /// Convert to a runtime value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(*n),
            Self::Str(s) => Value::Str(s.clone()),
        }
    }
}

/// Binary operators available to worklets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/` (division by zero follows IEEE-754, producing `inf`/`nan`).
    Divide,
    /// `%` (remainder; sign follows the dividend).
    Modulo,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessOrEqual,
    /// `>=`
    GreaterOrEqual,
    /// `&&` (short-circuit).
    And,
    /// `||` (short-circuit).
    Or,
}

/// Unary operators available to worklets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnaryOperator {
    /// Numeric negation.
    Negate,
    /// Logical not.
    Not,
}

/// Allow-listed free math functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MathFn {
    /// `sin(x)`
    Sin,
    /// `cos(x)`
    Cos,
    /// `tan(x)`
    Tan,
    /// `asin(x)`
    Asin,
    /// `acos(x)`
    Acos,
    /// `atan(x)`
    Atan,
    /// `atan2(y, x)`
    Atan2,
    /// `exp(x)`
    Exp,
    /// `log(x)`, the natural logarithm.
    Log,
    /// `log10(x)`
    Log10,
    /// `sqrt(x)`
    Sqrt,
    /// `pow(x, y)`
    Pow,
    /// `abs(x)`
    Abs,
    /// `max(a, b)`
    Max,
    /// `min(a, b)`
    Min,
    /// `floor(x)`
    Floor,
    /// `ceil(x)`
    Ceil,
    /// `round(x)`, half away from zero.
    Round,
}

impl MathFn {
    /// Resolve a source-level name against the allow-list.
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "atan2" => Self::Atan2,
            "exp" => Self::Exp,
            "log" => Self::Log,
            "log10" => Self::Log10,
            "sqrt" => Self::Sqrt,
            "pow" => Self::Pow,
            "abs" => Self::Abs,
            "max" => Self::Max,
            "min" => Self::Min,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "round" => Self::Round,
            _ => return None,
        };
        Some(f)
    }

    /// Required argument count.
    pub fn arity(self) -> usize {
        match self {
            Self::Atan2 | Self::Pow | Self::Max | Self::Min => 2,
            _ => 1,
        }
    }

    /// Source-level name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Atan2 => "atan2",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Sqrt => "sqrt",
            Self::Pow => "pow",
            Self::Abs => "abs",
            Self::Max => "max",
            Self::Min => "min",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
        }
    }
}

/// Allow-listed method-style calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MethodName {
    /// `value.clamp(min, max)` on numbers. `min > max` yields `min`.
    Clamp,
    /// `value.floor()` on numbers.
    Floor,
    /// `value.ceil()` on numbers.
    Ceil,
    /// `value.round()` on numbers.
    Round,
    /// `value.abs()` on numbers.
    Abs,
    /// `value.substring(start[, end])` on strings; indices clamp into
    /// `[0, length]`.
    Substring,
}

impl MethodName {
    /// Resolve a source-level method name against the allow-list.
    pub fn from_name(name: &str) -> Option<Self> {
        let m = match name {
            "clamp" => Self::Clamp,
            "floor" => Self::Floor,
            "ceil" => Self::Ceil,
            "round" => Self::Round,
            "abs" => Self::Abs,
            "substring" => Self::Substring,
            _ => return None,
        };
        Some(m)
    }

    /// Allowed argument counts, inclusive.
    pub fn arity(self) -> (usize, usize) {
        match self {
            Self::Clamp => (2, 2),
            Self::Substring => (1, 2),
            _ => (0, 0),
        }
    }

    /// Source-level name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Clamp => "clamp",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Round => "round",
            Self::Abs => "abs",
            Self::Substring => "substring",
        }
    }
}

/// Allow-listed property reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyName {
    /// `value.length` on strings (characters) and lists (elements).
    Length,
}

/// An immutable compiled worklet program.
///
/// Produced once per registration, reused across every frame, and never
/// mutated mid-flight; a configuration change produces a fresh program and a
/// fresh envelope.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    /// Root expression.
    pub root: Node,
    /// Declared parameters, in order.
    pub params: Vec<ParamSpec>,
    /// Declared kind of the result value.
    pub return_kind: ValueKind,
}

impl Program {
    /// Serialize to the JSON wire form.
    pub fn to_wire_json(&self) -> FrameletResult<String> {
        serde_json::to_string(self).map_err(|e| FrameletError::serde(e.to_string()))
    }

    /// Parse the JSON wire form back into a program.
    pub fn from_wire_json(json: &str) -> FrameletResult<Self> {
        serde_json::from_str(json).map_err(|e| FrameletError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ir/node.rs"]
mod tests;
