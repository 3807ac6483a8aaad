use std::rc::Rc;

use crate::interpreter::{Context, Value};
use crate::lexer::Range;

use super::{pad, Node};

/// `name = expr`. Binding also adopts any comments still waiting on the
/// unassigned queue; see [`Context::bind`].
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub value: Rc<Node>,
    pub source_range: Range,
}

impl Assignment {
    pub fn run(&self, context: &mut Context) -> Value {
        let value = self.value.run(context);
        context.bind(&self.name, value.clone());
        value
    }

    pub fn dump(&self, indent: usize) -> String {
        let mut out = format!("{}Assignment {}\n", pad(indent), self.name);
        out.push_str(&self.value.dump(indent + 1));
        out
    }
}
