use std::fmt::Display;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::Zero;

use crate::ast::FunctionNode;

use super::context::{CommentFrame, Frame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeType {
    Int,
    String,
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    pub name: String,
    pub ty: Rc<Type>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDecl {
    Native(NativeType),
    Record(Vec<TypeName>),
}

/// A runtime type: a native tag or an ordered record shape. Equality is
/// structural all the way down.
#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub decl: TypeDecl,
}

impl Type {
    pub fn native(native: NativeType) -> Rc<Type> {
        Rc::new(Type {
            decl: TypeDecl::Native(native),
        })
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.decl {
            TypeDecl::Native(NativeType::Int) => f.write_str("int"),
            TypeDecl::Native(NativeType::String) => f.write_str("string"),
            TypeDecl::Native(NativeType::Any) => f.write_str("any"),
            TypeDecl::Record(fields) => {
                f.write_str("record {")?;
                for field in fields {
                    write!(f, " {}: {}", field.name, field.ty)?;
                }
                f.write_str(" }")
            }
        }
    }
}

pub type NativeFn = fn(&mut super::Context, &[Value]) -> Value;

/// A host-implemented operator. Its documentation comments take part in
/// comment resolution exactly like user comments do.
#[derive(Debug, Clone)]
pub struct NativeFunction {
    pub run: NativeFn,
    pub comments: Vec<&'static str>,
}

impl PartialEq for NativeFunction {
    fn eq(&self, other: &Self) -> bool {
        self.run as usize == other.run as usize
    }
}

/// A user function: the AST node plus by-value snapshots of both stacks at
/// the moment of creation.
#[derive(Debug, Clone)]
pub struct FunctionValue {
    pub node: Rc<FunctionNode>,
    pub scope: Vec<Frame>,
    pub comment_scope: Vec<CommentFrame>,
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node) && self.scope == other.scope
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    pub ty: Rc<Type>,
    pub members: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Empty,
    Number(BigInt),
    Str(String),
    Type(Rc<Type>),
    Function(FunctionValue),
    ResolutionSet(Rc<Vec<Value>>),
    NativeFunction(NativeFunction),
    Record(RecordValue),
}

impl Value {
    /// Build a resolution set, flattening any nested sets; resolution sets
    /// never contain resolution sets.
    pub fn resolution_set(values: Vec<Value>) -> Value {
        let mut flattened = vec![];
        for value in values {
            match value {
                Value::ResolutionSet(set) => flattened.extend(set.iter().cloned()),
                value => flattened.push(value),
            }
        }
        Value::ResolutionSet(Rc::new(flattened))
    }

    pub fn from_bool(value: bool) -> Value {
        Value::Number(BigInt::from(u8::from(value)))
    }

    pub fn truthy(&self) -> bool {
        match self {
            Value::Empty => false,
            Value::Number(number) => !number.is_zero(),
            Value::Str(text) => !text.is_empty(),
            Value::ResolutionSet(set) => set.iter().all(Value::truthy),
            _ => true,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Empty => f.write_str("<empty>"),
            Value::Number(number) => write!(f, "{number}"),
            Value::Str(text) => f.write_str(text),
            Value::Type(ty) => write!(f, "{ty}"),
            Value::Function(_) => f.write_str("<fn ref>"),
            Value::NativeFunction(native) => write!(f, "<fnptr at {:#x}>", native.run as usize),
            Value::Record(record) => {
                f.write_str("(")?;
                for (index, member) in record.members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str(")")
            }
            Value::ResolutionSet(set) => {
                f.write_str("<Comment resolution set: {")?;
                for (index, member) in set.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str("}>")
            }
        }
    }
}

/// A single-element resolution set is (recursively) just its element.
pub fn flatten(value: &Value) -> &Value {
    if let Value::ResolutionSet(set) = value {
        if let [single] = set.as_slice() {
            return flatten(single);
        }
    }
    value
}

pub fn type_of(value: &Value) -> Rc<Type> {
    match value {
        Value::Number(_) => Type::native(NativeType::Int),
        Value::Str(_) => Type::native(NativeType::String),
        Value::Record(record) => record.ty.clone(),
        _ => Type::native(NativeType::Any),
    }
}
