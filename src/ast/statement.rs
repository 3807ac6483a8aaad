use std::rc::Rc;

use crate::interpreter::{Context, Value};
use crate::lexer::Range;

use super::{Comment, Node};

/// One statement of a program or function body: an expression plus the
/// comments lexically attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub node: Rc<Node>,
    pub comments: Vec<Rc<Comment>>,
    pub source_range: Range,
}

impl Statement {
    pub fn new(node: Node) -> Statement {
        let source_range = node.source_range();
        Statement {
            node: Rc::new(node),
            comments: vec![],
            source_range,
        }
    }

    /// Attached comments go onto the unassigned queue first, so a binding
    /// performed by this very statement adopts them.
    pub fn run(&self, context: &mut Context) -> Value {
        for comment in &self.comments {
            context.unassigned_comments.push(comment.clone());
        }
        self.node.run(context)
    }

    pub fn dump(&self, indent: usize) -> String {
        self.node.dump(indent)
    }
}
