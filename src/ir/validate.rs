use std::collections::BTreeSet;

use crate::foundation::error::{FrameletError, FrameletResult};
use crate::ir::node::{Node, Program};

/// Semantic validation of a compiled program.
///
/// Runs once, after compilation and before the program is packed into a
/// transport envelope. The compiler's pass is structural (which shapes
/// exist); this pass is semantic: every `variable` must resolve against the
/// declared parameter list and every call site must carry a legal arity.
/// Fails closed: the first violation rejects the whole program.
#[tracing::instrument(skip(program), fields(params = program.params.len()))]
pub fn validate(program: &Program) -> FrameletResult<()> {
    let mut names = BTreeSet::new();
    for param in &program.params {
        if param.name.is_empty() {
            return Err(FrameletError::validation("parameter name must be non-empty"));
        }
        if !names.insert(param.name.as_str()) {
            return Err(FrameletError::validation(format!(
                "duplicate parameter '{}'",
                param.name
            )));
        }
    }
    check_node(&program.root, &names)
}

fn check_node(node: &Node, params: &BTreeSet<&str>) -> FrameletResult<()> {
    match node {
        Node::Literal { .. } => Ok(()),
        Node::Variable { name } => {
            if params.contains(name.as_str()) {
                Ok(())
            } else {
                Err(FrameletError::validation(format!(
                    "unresolved variable '{name}'"
                )))
            }
        }
        Node::BinaryOp { left, right, .. } => {
            check_node(left, params)?;
            check_node(right, params)
        }
        Node::UnaryOp { operand, .. } => check_node(operand, params),
        Node::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            check_node(condition, params)?;
            check_node(then_branch, params)?;
            check_node(else_branch, params)
        }
        Node::Call { function, args } => {
            if args.len() != function.arity() {
                return Err(FrameletError::validation(format!(
                    "{}() takes {} argument(s), found {}",
                    function.name(),
                    function.arity(),
                    args.len()
                )));
            }
            args.iter().try_for_each(|arg| check_node(arg, params))
        }
        Node::MethodCall {
            target,
            method,
            args,
        } => {
            let (min, max) = method.arity();
            if args.len() < min || args.len() > max {
                return Err(FrameletError::validation(format!(
                    ".{}() takes between {min} and {max} argument(s), found {}",
                    method.name(),
                    args.len()
                )));
            }
            check_node(target, params)?;
            args.iter().try_for_each(|arg| check_node(arg, params))
        }
        Node::Property { target, .. } => check_node(target, params),
        Node::Index { collection, index } => {
            check_node(collection, params)?;
            check_node(index, params)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ir/validate.rs"]
mod tests;
