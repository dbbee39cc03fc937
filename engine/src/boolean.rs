use crate::error::QueryError;
use crate::index::{DocId, PositionalIndex};
use crate::normalize::TermNormalizer;
use std::collections::HashSet;

/// One element of a boolean expression in postfix order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostfixToken {
    Term(String),
    And,
    Or,
    Not,
}

enum StackOp {
    And,
    Or,
    Not,
    Open,
}

impl StackOp {
    fn emit(self) -> Option<PostfixToken> {
        match self {
            StackOp::And => Some(PostfixToken::And),
            StackOp::Or => Some(PostfixToken::Or),
            StackOp::Not => Some(PostfixToken::Not),
            StackOp::Open => None,
        }
    }
}

/// Rewrite an infix boolean query into postfix.
///
/// `AND`, `OR` and `NOT` are rewritten textually to `*`, `+` and `~` before
/// splitting, so they separate from adjacent parentheses without tokenizing
/// the query. `AND` and `OR` share one precedence level and associate left;
/// `~` is unary and binds tighter than both. Any other token is normalized
/// into a term.
pub fn parse_boolean(
    query: &str,
    normalizer: &dyn TermNormalizer,
) -> Result<Vec<PostfixToken>, QueryError> {
    let expression = query
        .replace('(', " ( ")
        .replace(')', " ) ")
        .replace("AND", " * ")
        .replace("OR", " + ")
        .replace("NOT", " ~ ");

    let mut output = Vec::new();
    let mut stack: Vec<StackOp> = Vec::new();
    for token in expression.split_whitespace() {
        match token {
            "(" => stack.push(StackOp::Open),
            ")" => loop {
                match stack.pop() {
                    Some(StackOp::Open) => break,
                    Some(op) => output.extend(op.emit()),
                    None => {
                        return Err(QueryError::MalformedExpression(
                            "closing parenthesis without a matching open",
                        ))
                    }
                }
            },
            "*" | "+" => {
                // Equal precedence, left-associative: everything already
                // pending in this group evaluates first.
                while matches!(stack.last(), Some(StackOp::And | StackOp::Or | StackOp::Not)) {
                    if let Some(op) = stack.pop() {
                        output.extend(op.emit());
                    }
                }
                stack.push(if token == "*" { StackOp::And } else { StackOp::Or });
            }
            "~" => stack.push(StackOp::Not),
            term => output.push(PostfixToken::Term(normalizer.normalize(term))),
        }
    }
    while let Some(op) = stack.pop() {
        match op {
            StackOp::Open => {
                return Err(QueryError::MalformedExpression("unclosed parenthesis"))
            }
            op => output.extend(op.emit()),
        }
    }
    Ok(output)
}

/// Evaluation stack entry. Terms stay raw until an operator forces them into
/// a document set, so a single-term query can answer straight off the index.
enum Operand {
    Raw(String),
    Docs(HashSet<DocId>),
}

impl Operand {
    fn materialize(self, index: &PositionalIndex) -> HashSet<DocId> {
        match self {
            Operand::Raw(term) => index.doc_set(&term),
            Operand::Docs(docs) => docs,
        }
    }
}

/// Evaluate a postfix boolean expression against the index. `universe` is
/// the full document-id set, which `NOT` complements against. Unindexed
/// terms evaluate to the empty set.
pub fn evaluate_postfix(
    postfix: &[PostfixToken],
    index: &PositionalIndex,
    universe: &HashSet<DocId>,
) -> Result<HashSet<DocId>, QueryError> {
    if postfix.is_empty() {
        return Err(QueryError::MalformedExpression("empty expression"));
    }
    if let [PostfixToken::Term(term)] = postfix {
        return Ok(index.doc_set(term));
    }

    let mut stack: Vec<Operand> = Vec::new();
    for token in postfix {
        match token {
            PostfixToken::Term(term) => stack.push(Operand::Raw(term.clone())),
            PostfixToken::And => {
                let right = pop_operand(&mut stack)?.materialize(index);
                let left = pop_operand(&mut stack)?.materialize(index);
                stack.push(Operand::Docs(&left & &right));
            }
            PostfixToken::Or => {
                let right = pop_operand(&mut stack)?.materialize(index);
                let left = pop_operand(&mut stack)?.materialize(index);
                stack.push(Operand::Docs(&left | &right));
            }
            PostfixToken::Not => {
                let operand = pop_operand(&mut stack)?.materialize(index);
                stack.push(Operand::Docs(universe - &operand));
            }
        }
    }
    let result = pop_operand(&mut stack)?.materialize(index);
    if !stack.is_empty() {
        return Err(QueryError::MalformedExpression(
            "operands left over after evaluation",
        ));
    }
    Ok(result)
}

fn pop_operand(stack: &mut Vec<Operand>) -> Result<Operand, QueryError> {
    stack
        .pop()
        .ok_or(QueryError::MalformedExpression("operator is missing an operand"))
}
