use std::rc::Rc;

use crate::interpreter::{type_of, Context, RecordValue, Type, TypeDecl, TypeName, Value};
use crate::lexer::Range;

use super::{pad, Node};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub name: Option<String>,
    pub value: Rc<Node>,
}

/// A record literal `(name: expr, expr, ...)`. Only a fully field-named
/// literal keeps its names; otherwise every field gets a synthetic `_N`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordLiteral {
    pub fields: Vec<RecordField>,
    pub source_range: Range,
}

impl RecordLiteral {
    pub fn run(&self, context: &mut Context) -> Value {
        let mut members = vec![];
        for field in &self.fields {
            members.push(field.value.run(context));
        }

        let all_named = self.fields.iter().all(|field| field.name.is_some());
        let entries = members
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let name = if all_named {
                    self.fields[index]
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("_{}", index + 1))
                } else {
                    format!("_{}", index + 1)
                };
                TypeName {
                    name,
                    ty: type_of(member),
                }
            })
            .collect();

        Value::Record(RecordValue {
            ty: Rc::new(Type {
                decl: TypeDecl::Record(entries),
            }),
            members,
        })
    }

    pub fn dump(&self, indent: usize) -> String {
        let mut out = format!("{}Record\n", pad(indent));
        for field in &self.fields {
            if let Some(name) = &field.name {
                out.push_str(&format!("{}{}:\n", pad(indent + 1), name));
                out.push_str(&field.value.dump(indent + 2));
            } else {
                out.push_str(&field.value.dump(indent + 1));
            }
        }
        out
    }
}
