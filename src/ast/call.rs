use std::mem;
use std::rc::Rc;

use crate::interpreter::{CommentFrame, Context, Frame, FunctionValue, Value};
use crate::lexer::Range;

use super::{pad, Node, Synthetic};

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Rc<Node>,
    pub args: Vec<Rc<Node>>,
    pub source_range: Range,
}

impl Call {
    /// A call over already evaluated values, used by built-ins (`loop`) so
    /// that full call semantics apply to their re-entries.
    pub fn synthetic(callee: Value, args: Vec<Value>) -> Call {
        Call {
            callee: Rc::new(Node::Synthetic(Synthetic::new(callee))),
            args: args
                .into_iter()
                .map(|value| Rc::new(Node::Synthetic(Synthetic::new(value))))
                .collect(),
            source_range: Range::default(),
        }
    }

    pub fn run(&self, context: &mut Context) -> Value {
        let callee = self.callee.run(context);
        let mut args = vec![];
        for arg in &self.args {
            args.push(arg.run(context));
        }
        invoke(context, &callee, &args)
    }

    pub fn dump(&self, indent: usize) -> String {
        let mut out = format!("{}Call\n", pad(indent));
        out.push_str(&self.callee.dump(indent + 1));
        for arg in &self.args {
            out.push_str(&arg.dump(indent + 1));
        }
        out
    }
}

/// Calling a resolution set distributes over its members; calling a user
/// function distributes over the Cartesian product of resolution-set
/// arguments (leftmost argument outermost). Native functions see their
/// arguments raw and handle resolution sets through their own folding rules.
fn invoke(context: &mut Context, callee: &Value, args: &[Value]) -> Value {
    match callee {
        Value::ResolutionSet(set) => {
            let mut results = vec![];
            for candidate in set.iter() {
                results.push(invoke(context, candidate, args));
            }
            Value::resolution_set(results)
        }
        Value::NativeFunction(native) => (native.run)(context, args),
        Value::Function(function) => {
            for (index, arg) in args.iter().enumerate() {
                if let Value::ResolutionSet(set) = arg {
                    let set = set.clone();
                    let mut results = vec![];
                    for candidate in set.iter() {
                        let mut narrowed = args.to_vec();
                        narrowed[index] = candidate.clone();
                        results.push(invoke(context, callee, &narrowed));
                    }
                    return Value::resolution_set(results);
                }
            }
            call_function(context, function, args)
        }
        _ => Value::Empty,
    }
}

fn call_function(context: &mut Context, function: &FunctionValue, args: &[Value]) -> Value {
    let saved_scope = mem::replace(&mut context.scope, function.scope.clone());
    let saved_comments = mem::replace(&mut context.comment_scope, function.comment_scope.clone());
    let saved_call_start = context.last_call_scope_start;

    let mut frame = Frame::default();
    for (index, name) in function.node.params.iter().enumerate() {
        let value = args.get(index).cloned().unwrap_or(Value::Empty);
        frame.insert(name.clone(), vec![value]);
    }
    context.scope.push(frame);
    context.comment_scope.push(CommentFrame::default());
    context.last_call_scope_start = context.scope.len() - 1;

    let mut result = Value::Empty;
    for statement in function.node.body() {
        result = statement.run(context);
    }

    context.scope = saved_scope;
    context.comment_scope = saved_comments;
    context.last_call_scope_start = saved_call_start;

    result
}
