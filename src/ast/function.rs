use std::rc::Rc;

use crate::interpreter::{Context, FunctionValue, Value};
use crate::lexer::Range;

use super::{pad, Comment, Node, Statement};

/// A function literal `{ a, b | statements }`. Evaluating it captures deep
/// snapshots of the scope and comment-scope stacks, so later rebindings in
/// the enclosing scopes are not observable through the value.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub params: Vec<String>,
    pub body: Vec<Statement>,
    pub source_range: Range,
}

impl FunctionNode {
    pub fn body(&self) -> &[Statement] {
        &self.body
    }

    /// The comments retained as their own nodes in this body, in order.
    pub fn body_comments(&self) -> impl Iterator<Item = &Rc<Comment>> {
        self.body.iter().filter_map(|statement| {
            if let Node::Comment(comment) = &*statement.node {
                Some(comment)
            } else {
                None
            }
        })
    }

    pub fn dump(&self, indent: usize) -> String {
        let mut out = format!("{}Function ({})\n", pad(indent), self.params.join(", "));
        for statement in &self.body {
            out.push_str(&statement.dump(indent + 1));
        }
        out
    }
}

pub(crate) fn run_function_node(node: &Rc<FunctionNode>, context: &mut Context) -> Value {
    Value::Function(FunctionValue {
        node: node.clone(),
        scope: context.scope.clone(),
        comment_scope: context.comment_scope.clone(),
    })
}
