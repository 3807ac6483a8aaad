use std::rc::Rc;

use crate::interpreter::{Context, TypeDecl, Value};
use crate::lexer::Range;

use super::{pad, Node, Synthetic};

/// `subject.field`. On records this selects the member with that field name;
/// on strings a numeric field name indexes into the characters. Anything
/// else degrades to `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberAccess {
    pub subject: Rc<Node>,
    pub field: String,
    pub source_range: Range,
}

impl MemberAccess {
    /// Used by built-ins (`get`) to re-enter member access on an already
    /// evaluated subject.
    pub fn synthetic(subject: Value, field: impl Into<String>) -> MemberAccess {
        MemberAccess {
            subject: Rc::new(Node::Synthetic(Synthetic::new(subject))),
            field: field.into(),
            source_range: Range::default(),
        }
    }

    pub fn run(&self, context: &mut Context) -> Value {
        let subject = self.subject.run(context);
        access_member(&subject, &self.field)
    }

    pub fn dump(&self, indent: usize) -> String {
        let mut out = format!("{}MemberAccess .{}\n", pad(indent), self.field);
        out.push_str(&self.subject.dump(indent + 1));
        out
    }
}

fn access_member(subject: &Value, field: &str) -> Value {
    match subject {
        Value::Record(record) => {
            let TypeDecl::Record(fields) = &record.ty.decl else {
                return Value::Empty;
            };
            fields
                .iter()
                .position(|entry| entry.name == field)
                .and_then(|index| record.members.get(index).cloned())
                .unwrap_or(Value::Empty)
        }
        Value::Str(subject) => field
            .parse::<usize>()
            .ok()
            .and_then(|index| subject.chars().nth(index))
            .map(|c| Value::Str(c.to_string()))
            .unwrap_or(Value::Empty),
        Value::ResolutionSet(set) => {
            Value::resolution_set(set.iter().map(|value| access_member(value, field)).collect())
        }
        _ => Value::Empty,
    }
}
