//! The native operators. Multi-argument operators follow a fold-with-flatten
//! protocol: the accumulator starts out `Empty`, resolution-set arguments
//! are recursed into in order, the first argument is adopted, and every
//! later one goes through the operator's binary rule. A type pair without a
//! rule leaves the accumulator alone.
use std::cmp;
use std::mem::discriminant;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::ast::{Call, MemberAccess};

use super::context::Context;
use super::value::{
    flatten, type_of, NativeFn, NativeFunction, NativeType, RecordValue, Type, TypeDecl, TypeName,
    Value,
};

/// Register every native operator and the native type values in the current
/// (base) scope frame.
pub fn register(context: &mut Context) {
    let mut set = |name: &str, run: NativeFn, comments: &[&'static str]| {
        context.set(
            name,
            Value::NativeFunction(NativeFunction {
                run,
                comments: comments.to_vec(),
            }),
        );
    };

    set("print", lang_print, &["print function", "native operation"]);
    set("add", lang_add, &["native arithmetic addition operation"]);
    set("sub", lang_sub, &["native arithmetic subtract operation"]);
    set("mul", lang_mul, &["native arithmetic multiply operation"]);
    set("div", lang_div, &["native arithmetic divide operation"]);
    set("mod", lang_mod, &["native arithmetic modulus operation"]);
    set("cond", lang_cond, &["native conditional selection operation"]);
    set("is", lang_is, &["native comment query operation"]);
    set("loop", lang_loop, &["native loop flow operation"]);
    set("gt", lang_gt, &["native comparison greater_than operation"]);
    set("eq", lang_eq, &["native comparison equality operation"]);
    set("max", lang_max, &["native comparison maximum operation"]);
    set("min", lang_min, &["native comparison minimum operation"]);
    set(
        "collapse",
        lang_collapse,
        &["native probability collapse flatten operation"],
    );
    set("get", lang_get, &["native indexing operation"]);
    set("slice", lang_slice, &["native string slicing operation"]);
    set("append", lang_append, &["native meta append operation"]);
    set("typeof", lang_typeof, &["native meta typeof operation"]);

    context.set("int", Value::Type(Type::native(NativeType::Int)));
    context.set("string", Value::Type(Type::native(NativeType::String)));
    context.set("any", Value::Type(Type::native(NativeType::Any)));
}

type BinaryRule = fn(&Value, &Value) -> Option<Value>;

fn fold(args: &[Value], rule: BinaryRule) -> Value {
    let mut accumulator = Value::Empty;
    for arg in args {
        fold_append(&mut accumulator, arg, rule);
    }
    accumulator
}

fn fold_append(accumulator: &mut Value, arg: &Value, rule: BinaryRule) {
    if let Value::ResolutionSet(set) = arg {
        for value in set.iter() {
            fold_append(accumulator, value, rule);
        }
        return;
    }

    if matches!(accumulator, Value::Empty) {
        *accumulator = arg.clone();
        return;
    }

    if let Some(next) = rule(accumulator, arg) {
        *accumulator = next;
    }
}

fn lang_print(_context: &mut Context, args: &[Value]) -> Value {
    let rendered: Vec<String> = args.iter().map(Value::to_string).collect();
    println!("{}", rendered.join(" "));
    Value::Empty
}

fn lang_add(_context: &mut Context, args: &[Value]) -> Value {
    let mut accumulator = Value::Empty;
    for arg in args {
        add_append(&mut accumulator, arg);
    }
    accumulator
}

/// `add` coerces non-scalar operands to their marker strings, so string
/// concatenation soaks up anything.
fn add_append(accumulator: &mut Value, arg: &Value) {
    let scalar = match arg {
        Value::ResolutionSet(set) => {
            for value in set.iter() {
                add_append(accumulator, value);
            }
            return;
        }
        Value::Empty => Value::Str("<empty>".to_owned()),
        Value::Function(_) => Value::Str("<function>".to_owned()),
        Value::Type(_) => Value::Str("<type>".to_owned()),
        Value::NativeFunction(_) => Value::Str("<fn>".to_owned()),
        Value::Record(_) => Value::Str("<record>".to_owned()),
        Value::Number(number) => Value::Number(number.clone()),
        Value::Str(text) => Value::Str(text.clone()),
    };

    let next = match (&*accumulator, &scalar) {
        (Value::Empty, _) => scalar,
        (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
        (Value::Number(a), Value::Str(b)) => Value::Str(format!("{a}{b}")),
        (Value::Str(a), Value::Number(b)) => Value::Str(format!("{a}{b}")),
        (Value::Str(a), Value::Str(b)) => Value::Str(format!("{a}{b}")),
        _ => return,
    };
    *accumulator = next;
}

fn lang_sub(_context: &mut Context, args: &[Value]) -> Value {
    fold(args, rule_sub)
}

fn rule_sub(a: &Value, b: &Value) -> Option<Value> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Some(Value::Number(a - b)),
        (Value::Str(_), Value::Str(_)) => Some(Value::Number(BigInt::zero())),
        _ => None,
    }
}

fn lang_mul(_context: &mut Context, args: &[Value]) -> Value {
    fold(args, rule_mul)
}

fn rule_mul(a: &Value, b: &Value) -> Option<Value> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Some(Value::Number(a * b)),
        (Value::Str(_), Value::Str(_)) => Some(Value::Number(BigInt::zero())),
        _ => None,
    }
}

fn lang_div(_context: &mut Context, args: &[Value]) -> Value {
    fold(args, rule_div)
}

fn rule_div(a: &Value, b: &Value) -> Option<Value> {
    match (a, b) {
        (Value::Number(_), Value::Number(b)) if b.is_zero() => None,
        (Value::Number(a), Value::Number(b)) => Some(Value::Number(a / b)),
        (Value::Str(_), Value::Str(_)) => Some(Value::Number(BigInt::zero())),
        _ => None,
    }
}

fn lang_mod(_context: &mut Context, args: &[Value]) -> Value {
    fold(args, rule_mod)
}

fn rule_mod(a: &Value, b: &Value) -> Option<Value> {
    match (a, b) {
        (Value::Number(_), Value::Number(b)) if b.is_zero() => None,
        (Value::Number(a), Value::Number(b)) => Some(Value::Number(a % b)),
        (Value::Str(_), Value::Str(_)) => Some(Value::Number(BigInt::zero())),
        _ => None,
    }
}

fn lang_gt(_context: &mut Context, args: &[Value]) -> Value {
    fold(args, rule_gt)
}

fn rule_gt(a: &Value, b: &Value) -> Option<Value> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Some(Value::from_bool(a > b)),
        (Value::Str(a), Value::Str(b)) => Some(Value::from_bool(a > b)),
        _ => None,
    }
}

fn lang_eq(_context: &mut Context, args: &[Value]) -> Value {
    fold(args, rule_eq)
}

fn rule_eq(a: &Value, b: &Value) -> Option<Value> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Some(Value::from_bool(a == b)),
        (Value::Str(a), Value::Str(b)) => Some(Value::from_bool(a == b)),
        (Value::Type(a), Value::Type(b)) => Some(Value::from_bool(a == b)),
        _ => None,
    }
}

fn lang_max(_context: &mut Context, args: &[Value]) -> Value {
    fold(args, rule_max)
}

fn rule_max(a: &Value, b: &Value) -> Option<Value> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Some(Value::Number(cmp::max(a, b).clone())),
        (Value::Str(a), Value::Str(b)) => Some(Value::Str(cmp::max(a, b).clone())),
        (Value::Number(a), Value::Str(b)) => Some(Value::Str(cmp::max(a.to_string(), b.clone()))),
        (Value::Str(a), Value::Number(b)) => Some(Value::Str(cmp::max(a.clone(), b.to_string()))),
        _ => None,
    }
}

fn lang_min(_context: &mut Context, args: &[Value]) -> Value {
    fold(args, rule_min)
}

fn rule_min(a: &Value, b: &Value) -> Option<Value> {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => Some(Value::Number(cmp::min(a, b).clone())),
        (Value::Str(a), Value::Str(b)) => Some(Value::Str(cmp::min(a, b).clone())),
        (Value::Number(a), Value::Str(b)) => Some(Value::Str(cmp::min(a.to_string(), b.clone()))),
        (Value::Str(a), Value::Number(b)) => Some(Value::Str(cmp::min(a.clone(), b.to_string()))),
        _ => None,
    }
}

fn lang_collapse(_context: &mut Context, args: &[Value]) -> Value {
    fold(args, rule_collapse)
}

/// The user-visible way to force a resolution set down to one value: equal
/// variants are collapsed by a fair coin toss.
fn rule_collapse(a: &Value, b: &Value) -> Option<Value> {
    if discriminant(a) != discriminant(b) {
        return None;
    }
    if rand::random::<bool>() {
        Some(a.clone())
    } else {
        Some(b.clone())
    }
}

fn lang_cond(_context: &mut Context, args: &[Value]) -> Value {
    let mut index = 0;
    while index + 1 < args.len() {
        if args[index].truthy() {
            return args[index + 1].clone();
        }
        index += 2;
    }
    if index < args.len() {
        return args[index].clone();
    }
    Value::Empty
}

fn lang_is(context: &mut Context, args: &[Value]) -> Value {
    if args.len() < 2 {
        return Value::Empty;
    }

    if let Value::ResolutionSet(set) = &args[0] {
        let set = set.clone();
        let mut results = vec![];
        for candidate in set.iter() {
            results.push(lang_is(context, &[candidate.clone(), args[1].clone()]));
        }
        return Value::resolution_set(results);
    }

    let Value::Function(_) = &args[0] else {
        return Value::Empty;
    };
    let Value::Str(query) = &args[1] else {
        return Value::Empty;
    };

    let texts = context.associated_comment_texts(&args[0]);
    let all_found = query
        .split(' ')
        .filter(|word| !word.is_empty())
        .all(|word| texts.iter().any(|text| text.contains(word)));

    Value::from_bool(all_found)
}

fn lang_loop(context: &mut Context, args: &[Value]) -> Value {
    if args.len() < 3 {
        return Value::Empty;
    }

    let mut value = args[0].clone();
    let step = args[1].clone();
    let stop = args[2].clone();

    loop {
        let done = Call::synthetic(stop.clone(), vec![value.clone()]).run(context);
        if done.truthy() {
            break;
        }
        value = Call::synthetic(step.clone(), vec![value.clone()]).run(context);
    }

    value
}

fn lang_get(context: &mut Context, args: &[Value]) -> Value {
    if args.len() < 2 {
        return Value::Empty;
    }

    let index = flatten(&args[0]).clone();
    let subject = flatten(&args[1]).clone();

    match index {
        Value::Number(number) => {
            let Value::Str(subject) = &subject else {
                return Value::Empty;
            };
            let Some(index) = number.to_usize() else {
                return Value::Empty;
            };
            subject
                .chars()
                .nth(index)
                .map(|c| Value::Str(c.to_string()))
                .unwrap_or(Value::Empty)
        }
        Value::Str(field) => MemberAccess::synthetic(subject, field).run(context),
        _ => Value::Empty,
    }
}

fn lang_slice(_context: &mut Context, args: &[Value]) -> Value {
    if args.len() < 3 {
        return Value::Empty;
    }

    let Value::Number(start) = flatten(&args[0]) else {
        return Value::Empty;
    };
    let Value::Number(length) = flatten(&args[1]) else {
        return Value::Empty;
    };
    let Value::Str(subject) = flatten(&args[2]) else {
        return Value::Empty;
    };
    let (Some(start), Some(length)) = (start.to_usize(), length.to_usize()) else {
        return Value::Empty;
    };

    let chars: Vec<char> = subject.chars().collect();
    if start + length > chars.len() {
        return Value::Empty;
    }
    Value::Str(chars[start..start + length].iter().collect())
}

fn lang_typeof(_context: &mut Context, args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Empty;
    }
    Value::Type(type_of(&args[0]))
}

fn lang_append(_context: &mut Context, args: &[Value]) -> Value {
    if args.len() < 2 {
        return Value::Empty;
    }

    let value = flatten(&args[0]).clone();
    let subject = flatten(&args[1]).clone();

    let Value::Record(record) = subject else {
        return subject;
    };
    let TypeDecl::Record(fields) = &record.ty.decl else {
        return Value::Record(record);
    };

    let mut fields = fields.clone();
    let mut members = record.members.clone();

    let last_name = fields.last().map(|f| f.name.as_str()).unwrap_or("_");
    let ordinal = last_name
        .strip_prefix('_')
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(fields.len());
    fields.push(TypeName {
        name: format!("_{}", ordinal + 1),
        ty: type_of(&value),
    });
    members.push(value);

    let counted = fields
        .first()
        .map(|f| f.name == "length" && matches!(f.ty.decl, TypeDecl::Native(_)))
        .unwrap_or(false);
    if counted {
        if let Some(Value::Number(length)) = members.first_mut() {
            *length += BigInt::from(1u8);
        }
    }

    Value::Record(RecordValue {
        ty: Rc::new(Type {
            decl: TypeDecl::Record(fields),
        }),
        members,
    })
}
