use crate::compiler::lexer::{Token, TokenKind, lex};
use crate::foundation::core::{ParamSpec, ValueKind};
use crate::foundation::error::{FrameletError, FrameletResult};
use crate::ir::node::{BinaryOperator, MathFn, MethodName, Node, Program, PropertyName, UnaryOperator};

/// Authoring-side declaration of a worklet: declared parameters, declared
/// return kind, and the restricted expression body.
///
/// This is the sole input to compilation. The body grammar has no loops,
/// no async, no object construction, and no statements; anything outside
/// the expression grammar is a compile failure naming the construct.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkletSource {
    /// Declared parameters, in order.
    pub params: Vec<ParamSpec>,
    /// Declared kind of the result value.
    pub return_kind: ValueKind,
    /// Expression body.
    pub body: String,
}

/// Compile a worklet source into an immutable [`Program`].
///
/// Single-pass recursive descent; each supported construct maps 1:1 onto an
/// IR node. Pure and deterministic: the same source always yields a
/// structurally identical tree, and failure produces no partial program.
///
/// This pass is structural. Run [`crate::ir::validate::validate`] on the
/// result before packing it into an envelope.
#[tracing::instrument(skip(source), fields(params = source.params.len()))]
pub fn compile(source: &WorkletSource) -> FrameletResult<Program> {
    let tokens = lex(&source.body)?;
    let mut parser = Parser::new(&tokens);
    let root = parser.expression()?;
    if let Some(tok) = parser.peek() {
        return Err(unexpected(tok));
    }
    Ok(Program {
        root,
        params: source.params.clone(),
        return_kind: source.return_kind,
    })
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if matches!(self.peek(), Some(tok) if tok.kind == *kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> FrameletResult<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            match self.peek() {
                Some(tok) => Err(FrameletError::compile(format!(
                    "expected {what} at {}:{}",
                    tok.line, tok.column
                ))),
                None => Err(FrameletError::compile(format!(
                    "expected {what}, found end of input"
                ))),
            }
        }
    }

    /// Lowest precedence: right-associative ternary.
    fn expression(&mut self) -> FrameletResult<Node> {
        let condition = self.logical_or()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(condition);
        }
        let then_branch = self.expression()?;
        self.expect(&TokenKind::Colon, "':' in conditional")?;
        let else_branch = self.expression()?;
        Ok(Node::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn logical_or(&mut self) -> FrameletResult<Node> {
        let mut left = self.logical_and()?;
        while self.eat(&TokenKind::OrOr) {
            let right = self.logical_and()?;
            left = binary(BinaryOperator::Or, left, right);
        }
        Ok(left)
    }

    fn logical_and(&mut self) -> FrameletResult<Node> {
        let mut left = self.equality()?;
        while self.eat(&TokenKind::AndAnd) {
            let right = self.equality()?;
            left = binary(BinaryOperator::And, left, right);
        }
        Ok(left)
    }

    fn equality(&mut self) -> FrameletResult<Node> {
        let mut left = self.relational()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::EqEq) => BinaryOperator::Equal,
                Some(TokenKind::NotEq) => BinaryOperator::NotEqual,
                _ => break,
            };
            self.advance();
            let right = self.relational()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn relational(&mut self) -> FrameletResult<Node> {
        let mut left = self.additive()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Less) => BinaryOperator::Less,
                Some(TokenKind::Greater) => BinaryOperator::Greater,
                Some(TokenKind::LessEq) => BinaryOperator::LessOrEqual,
                Some(TokenKind::GreaterEq) => BinaryOperator::GreaterOrEqual,
                _ => break,
            };
            self.advance();
            let right = self.additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn additive(&mut self) -> FrameletResult<Node> {
        let mut left = self.multiplicative()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Plus) => BinaryOperator::Add,
                Some(TokenKind::Minus) => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> FrameletResult<Node> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Star) => BinaryOperator::Multiply,
                Some(TokenKind::Slash) => BinaryOperator::Divide,
                Some(TokenKind::Percent) => BinaryOperator::Modulo,
                _ => break,
            };
            self.advance();
            let right = self.unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn unary(&mut self) -> FrameletResult<Node> {
        let op = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Minus) => Some(UnaryOperator::Negate),
            Some(TokenKind::Bang) => Some(UnaryOperator::Not),
            _ => None,
        };
        if let Some(operator) = op {
            self.advance();
            let operand = self.unary()?;
            return Ok(Node::UnaryOp {
                operator,
                operand: Box::new(operand),
            });
        }
        self.postfix()
    }

    /// Indexing, method calls, and property reads bind tightest.
    fn postfix(&mut self) -> FrameletResult<Node> {
        let mut node = self.primary()?;
        loop {
            if self.eat(&TokenKind::LBracket) {
                let index = self.expression()?;
                self.expect(&TokenKind::RBracket, "']' after index")?;
                node = Node::Index {
                    collection: Box::new(node),
                    index: Box::new(index),
                };
            } else if self.eat(&TokenKind::Dot) {
                node = self.member(node)?;
            } else {
                break;
            }
        }
        Ok(node)
    }

    fn member(&mut self, target: Node) -> FrameletResult<Node> {
        let Some(tok) = self.advance() else {
            return Err(FrameletError::compile(
                "expected member name, found end of input",
            ));
        };
        let TokenKind::Ident(name) = &tok.kind else {
            return Err(unexpected(tok));
        };

        if self.eat(&TokenKind::LParen) {
            let Some(method) = MethodName::from_name(name) else {
                return Err(FrameletError::compile(format!(
                    "unknown method '{name}' at {}:{}",
                    tok.line, tok.column
                )));
            };
            let args = self.arguments()?;
            check_method_arity(method, args.len(), tok)?;
            return Ok(Node::MethodCall {
                target: Box::new(target),
                method,
                args,
            });
        }

        if name == "length" {
            return Ok(Node::Property {
                target: Box::new(target),
                property: PropertyName::Length,
            });
        }
        Err(FrameletError::compile(format!(
            "unknown property '{name}' at {}:{}",
            tok.line, tok.column
        )))
    }

    fn primary(&mut self) -> FrameletResult<Node> {
        let Some(tok) = self.advance() else {
            return Err(FrameletError::compile(
                "expected expression, found end of input",
            ));
        };
        match &tok.kind {
            TokenKind::Number(n) => Ok(literal_number(*n)),
            TokenKind::Str(s) => Ok(Node::Literal {
                value: crate::ir::node::LiteralValue::Str(s.clone()),
                value_kind: ValueKind::Str,
            }),
            TokenKind::True => Ok(literal_bool(true)),
            TokenKind::False => Ok(literal_bool(false)),
            TokenKind::LParen => {
                let inner = self.expression()?;
                self.expect(&TokenKind::RParen, "')' after expression")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if self.eat(&TokenKind::LParen) {
                    let Some(function) = MathFn::from_name(name) else {
                        return Err(FrameletError::compile(format!(
                            "unknown function '{name}' at {}:{}",
                            tok.line, tok.column
                        )));
                    };
                    let args = self.arguments()?;
                    if args.len() != function.arity() {
                        return Err(FrameletError::compile(format!(
                            "{}() takes {} argument(s), found {} at {}:{}",
                            function.name(),
                            function.arity(),
                            args.len(),
                            tok.line,
                            tok.column
                        )));
                    }
                    return Ok(Node::Call { function, args });
                }
                Ok(Node::Variable { name: name.clone() })
            }
            _ => Err(unexpected(tok)),
        }
    }

    /// Comma-separated arguments; opening paren already consumed.
    fn arguments(&mut self) -> FrameletResult<Vec<Node>> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::RParen, "')' after arguments")?;
            return Ok(args);
        }
    }
}

fn binary(operator: BinaryOperator, left: Node, right: Node) -> Node {
    Node::BinaryOp {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn literal_number(n: f64) -> Node {
    Node::Literal {
        value: crate::ir::node::LiteralValue::Number(n),
        value_kind: ValueKind::Number,
    }
}

fn literal_bool(b: bool) -> Node {
    Node::Literal {
        value: crate::ir::node::LiteralValue::Bool(b),
        value_kind: ValueKind::Boolean,
    }
}

fn check_method_arity(method: MethodName, found: usize, tok: &Token) -> FrameletResult<()> {
    let (min, max) = method.arity();
    if found < min || found > max {
        let expected = if min == max {
            format!("{min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(FrameletError::compile(format!(
            ".{}() takes {expected} argument(s), found {found} at {}:{}",
            method.name(),
            tok.line,
            tok.column
        )));
    }
    Ok(())
}

fn unexpected(tok: &Token) -> FrameletError {
    FrameletError::compile(format!(
        "unexpected token {:?} at {}:{}",
        tok.kind, tok.line, tok.column
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/compiler/parser.rs"]
mod tests;
