//! Internal representation of Remark programs.
//!
//! Every node knows how to evaluate itself against a [`Context`] and how to
//! dump itself for AST inspection. Nodes are shared via `Rc` since function
//! values keep their body alive past the parse unit it came from.
mod assignment;
mod call;
mod comment;
mod function;
mod ident;
mod integer;
mod member_access;
mod mention;
mod record;
mod statement;
mod str;
mod synthetic;

pub use self::assignment::*;
pub use self::call::*;
pub use self::comment::*;
pub use self::function::*;
pub use self::ident::*;
pub use self::integer::*;
pub use self::member_access::*;
pub use self::mention::*;
pub use self::record::*;
pub use self::statement::*;
pub use self::str::*;
pub use self::synthetic::*;

use std::rc::Rc;

use crate::interpreter::{Context, Value};
use crate::lexer::Range;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Integer(Integer),
    Str(Str),
    Ident(Ident),
    Mention(Mention),
    Comment(Rc<Comment>),
    Record(RecordLiteral),
    MemberAccess(MemberAccess),
    Call(Call),
    Function(Rc<FunctionNode>),
    Assignment(Assignment),
    Synthetic(Synthetic),
}

impl Node {
    pub fn run(&self, context: &mut Context) -> Value {
        match self {
            Node::Integer(integer) => integer.run(context),
            Node::Str(str) => str.run(context),
            Node::Ident(ident) => ident.run(context),
            Node::Mention(mention) => mention.run(context),
            Node::Comment(comment) => {
                // Hosted comments are replayed by their statement; a comment
                // without a host waits here for the next binding.
                if !comment.hosted.get() {
                    context.unassigned_comments.push(comment.clone());
                }
                Value::Empty
            }
            Node::Record(record) => record.run(context),
            Node::MemberAccess(member_access) => member_access.run(context),
            Node::Call(call) => call.run(context),
            Node::Function(function) => run_function_node(function, context),
            Node::Assignment(assignment) => assignment.run(context),
            Node::Synthetic(synthetic) => synthetic.run(context),
        }
    }

    pub fn dump(&self, indent: usize) -> String {
        match self {
            Node::Integer(integer) => integer.dump(indent),
            Node::Str(str) => str.dump(indent),
            Node::Ident(ident) => ident.dump(indent),
            Node::Mention(mention) => mention.dump(indent),
            Node::Comment(comment) => comment.dump(indent),
            Node::Record(record) => record.dump(indent),
            Node::MemberAccess(member_access) => member_access.dump(indent),
            Node::Call(call) => call.dump(indent),
            Node::Function(function) => function.dump(indent),
            Node::Assignment(assignment) => assignment.dump(indent),
            Node::Synthetic(synthetic) => synthetic.dump(indent),
        }
    }

    pub fn source_range(&self) -> Range {
        match self {
            Node::Integer(integer) => integer.source_range,
            Node::Str(str) => str.source_range,
            Node::Ident(ident) => ident.source_range,
            Node::Mention(mention) => mention.source_range,
            Node::Comment(comment) => comment.source_range,
            Node::Record(record) => record.source_range,
            Node::MemberAccess(member_access) => member_access.source_range,
            Node::Call(call) => call.source_range,
            Node::Function(function) => function.source_range,
            Node::Assignment(assignment) => assignment.source_range,
            Node::Synthetic(_) => Range::default(),
        }
    }
}

pub(crate) fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}
