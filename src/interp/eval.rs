use std::collections::BTreeMap;

use crate::foundation::core::Value;
use crate::foundation::error::{FrameletError, FrameletResult};
use crate::ir::node::{BinaryOperator, MathFn, MethodName, Node, Program, PropertyName, UnaryOperator};

/// Ephemeral per-frame parameter values.
///
/// Built fresh for every interpreter invocation (up to 60 times per second)
/// and discarded immediately after; it has no identity beyond one
/// evaluation. Continuity such as elapsed time is supplied by the caller as
/// a plain input value, never retained here.
#[derive(Clone, Debug, Default)]
pub struct FrameBinding {
    values: BTreeMap<String, Value>,
}

impl FrameBinding {
    /// Empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter value, replacing any previous value of the same name.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Look up a parameter value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters are bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for FrameBinding {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Stateless tree-walking evaluator for compiled worklet programs.
///
/// Each call is a pure function of the program and the frame binding: no
/// state persists between invocations, no I/O, no locks. A failure aborts
/// only the single evaluation; the caller holds the previous value or skips
/// the frame. Safe to invoke concurrently against the same immutable
/// program.
pub struct Interpreter;

impl Interpreter {
    /// Evaluate one frame, producing a single result value.
    pub fn evaluate(program: &Program, binding: &FrameBinding) -> FrameletResult<Value> {
        eval_node(&program.root, binding)
    }
}

fn eval_node(node: &Node, binding: &FrameBinding) -> FrameletResult<Value> {
    match node {
        Node::Literal { value, .. } => Ok(value.to_value()),
        Node::Variable { name } => binding.get(name).cloned().ok_or_else(|| {
            FrameletError::evaluation(format!("unresolved variable '{name}'"))
        }),
        Node::BinaryOp {
            operator,
            left,
            right,
        } => eval_binary(*operator, left, right, binding),
        Node::UnaryOp { operator, operand } => {
            let value = eval_node(operand, binding)?;
            match operator {
                UnaryOperator::Negate => Ok(Value::Number(-value.as_number()?)),
                UnaryOperator::Not => Ok(Value::Bool(!value.as_bool()?)),
            }
        }
        Node::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            // Only the taken branch is evaluated.
            if eval_node(condition, binding)?.as_bool()? {
                eval_node(then_branch, binding)
            } else {
                eval_node(else_branch, binding)
            }
        }
        Node::Call { function, args } => eval_call(*function, args, binding),
        Node::MethodCall {
            target,
            method,
            args,
        } => eval_method(target, *method, args, binding),
        Node::Property { target, property } => {
            let value = eval_node(target, binding)?;
            match property {
                PropertyName::Length => match &value {
                    Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
                    Value::List(items) => Ok(Value::Number(items.len() as f64)),
                    other => Err(FrameletError::evaluation(format!(
                        "'length' is not available on {}",
                        other.kind()
                    ))),
                },
            }
        }
        Node::Index { collection, index } => eval_index(collection, index, binding),
    }
}

fn eval_binary(
    operator: BinaryOperator,
    left: &Node,
    right: &Node,
    binding: &FrameBinding,
) -> FrameletResult<Value> {
    // Logical operators short-circuit: the right operand only runs when the
    // left does not decide the result.
    match operator {
        BinaryOperator::And => {
            if !eval_node(left, binding)?.as_bool()? {
                return Ok(Value::Bool(false));
            }
            return Ok(Value::Bool(eval_node(right, binding)?.as_bool()?));
        }
        BinaryOperator::Or => {
            if eval_node(left, binding)?.as_bool()? {
                return Ok(Value::Bool(true));
            }
            return Ok(Value::Bool(eval_node(right, binding)?.as_bool()?));
        }
        _ => {}
    }

    let lhs = eval_node(left, binding)?;
    let rhs = eval_node(right, binding)?;
    match operator {
        // Division by zero follows IEEE-754 (inf/nan), and `%` keeps the
        // dividend's sign; neither is an error.
        BinaryOperator::Add => Ok(Value::Number(lhs.as_number()? + rhs.as_number()?)),
        BinaryOperator::Subtract => Ok(Value::Number(lhs.as_number()? - rhs.as_number()?)),
        BinaryOperator::Multiply => Ok(Value::Number(lhs.as_number()? * rhs.as_number()?)),
        BinaryOperator::Divide => Ok(Value::Number(lhs.as_number()? / rhs.as_number()?)),
        BinaryOperator::Modulo => Ok(Value::Number(lhs.as_number()? % rhs.as_number()?)),
        BinaryOperator::Equal => Ok(Value::Bool(lhs.value_eq(&rhs))),
        BinaryOperator::NotEqual => Ok(Value::Bool(!lhs.value_eq(&rhs))),
        BinaryOperator::Less => Ok(Value::Bool(lhs.as_number()? < rhs.as_number()?)),
        BinaryOperator::Greater => Ok(Value::Bool(lhs.as_number()? > rhs.as_number()?)),
        BinaryOperator::LessOrEqual => Ok(Value::Bool(lhs.as_number()? <= rhs.as_number()?)),
        BinaryOperator::GreaterOrEqual => Ok(Value::Bool(lhs.as_number()? >= rhs.as_number()?)),
        BinaryOperator::And | BinaryOperator::Or => unreachable!("handled above"),
    }
}

fn eval_call(function: MathFn, args: &[Node], binding: &FrameBinding) -> FrameletResult<Value> {
    let mut nums = [0.0f64; 2];
    if args.len() != function.arity() {
        return Err(FrameletError::evaluation(format!(
            "{}() takes {} argument(s), found {}",
            function.name(),
            function.arity(),
            args.len()
        )));
    }
    for (slot, arg) in nums.iter_mut().zip(args) {
        *slot = eval_node(arg, binding)?.as_number()?;
    }
    let [a, b] = nums;
    let out = match function {
        MathFn::Sin => a.sin(),
        MathFn::Cos => a.cos(),
        MathFn::Tan => a.tan(),
        MathFn::Asin => a.asin(),
        MathFn::Acos => a.acos(),
        MathFn::Atan => a.atan(),
        MathFn::Atan2 => a.atan2(b),
        MathFn::Exp => a.exp(),
        MathFn::Log => a.ln(),
        MathFn::Log10 => a.log10(),
        MathFn::Sqrt => a.sqrt(),
        MathFn::Pow => a.powf(b),
        MathFn::Abs => a.abs(),
        MathFn::Max => a.max(b),
        MathFn::Min => a.min(b),
        MathFn::Floor => a.floor(),
        MathFn::Ceil => a.ceil(),
        MathFn::Round => a.round(),
    };
    Ok(Value::Number(out))
}

fn eval_method(
    target: &Node,
    method: MethodName,
    args: &[Node],
    binding: &FrameBinding,
) -> FrameletResult<Value> {
    let receiver = eval_node(target, binding)?;
    match method {
        MethodName::Clamp => {
            let v = receiver.as_number()?;
            let min = eval_arg(args, 0, binding)?;
            let max = eval_arg(args, 1, binding)?;
            // `min > max` yields `min`; f64::clamp would panic here.
            let out = if min > max {
                min
            } else if v < min {
                min
            } else if v > max {
                max
            } else {
                v
            };
            Ok(Value::Number(out))
        }
        MethodName::Floor => Ok(Value::Number(receiver.as_number()?.floor())),
        MethodName::Ceil => Ok(Value::Number(receiver.as_number()?.ceil())),
        MethodName::Round => Ok(Value::Number(receiver.as_number()?.round())),
        MethodName::Abs => Ok(Value::Number(receiver.as_number()?.abs())),
        MethodName::Substring => {
            let s = receiver.as_str()?;
            let len = s.chars().count();
            let start = clamp_index(eval_arg(args, 0, binding)?, len);
            let end = if args.len() > 1 {
                clamp_index(eval_arg(args, 1, binding)?, len)
            } else {
                len
            };
            if start >= end {
                return Ok(Value::Str(String::new()));
            }
            Ok(Value::Str(s.chars().skip(start).take(end - start).collect()))
        }
    }
}

fn eval_arg(args: &[Node], idx: usize, binding: &FrameBinding) -> FrameletResult<f64> {
    let Some(arg) = args.get(idx) else {
        return Err(FrameletError::evaluation(format!(
            "missing argument {idx}"
        )));
    };
    eval_node(arg, binding)?.as_number()
}

/// Clamp a substring index into `[0, len]` (char-based). NaN maps to 0.
fn clamp_index(raw: f64, len: usize) -> usize {
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    if raw >= len as f64 {
        return len;
    }
    raw.floor() as usize
}

fn eval_index(collection: &Node, index: &Node, binding: &FrameBinding) -> FrameletResult<Value> {
    let target = eval_node(collection, binding)?;
    let raw = eval_node(index, binding)?.as_number()?;
    if !raw.is_finite() {
        return Err(FrameletError::evaluation(format!(
            "index must be finite, got {raw}"
        )));
    }
    // Floored before the range check; authors pre-normalize with
    // `index.floor() % list.length`.
    let idx = raw.floor();
    let len = match &target {
        Value::List(items) => items.len(),
        Value::Str(s) => s.chars().count(),
        other => {
            return Err(FrameletError::evaluation(format!(
                "cannot index into {}",
                other.kind()
            )));
        }
    };
    if idx < 0.0 || idx >= len as f64 {
        return Err(FrameletError::evaluation(format!(
            "index {idx} out of range for length {len}"
        )));
    }
    let idx = idx as usize;
    match target {
        Value::List(mut items) => Ok(items.swap_remove(idx)),
        Value::Str(s) => {
            let ch = s.chars().nth(idx).ok_or_else(|| {
                FrameletError::evaluation(format!("index {idx} out of range for length {len}"))
            })?;
            Ok(Value::Str(ch.to_string()))
        }
        _ => unreachable!("kind checked above"),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/interp/eval.rs"]
mod tests;
