use std::collections::HashMap;
use std::mem;
use std::rc::Rc;

use log::debug;

use crate::ast::Comment;

use super::value::Value;

/// One scope frame. Each name keeps its full binding history, oldest first:
/// plain lookup takes the latest state, mentions see every binding as a
/// candidate.
pub type Frame = HashMap<String, Vec<Value>>;

/// A comment that has been adopted by a binding: the name it bound with and
/// every value it has seen bound to that name since.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentEntry {
    pub comment: Rc<Comment>,
    pub name: String,
    pub values: Vec<Value>,
}

pub type CommentFrame = HashMap<usize, CommentEntry>;

/// The evaluator's persistent state: the scope stack, the parallel
/// comment-scope stack, and the queue of comments still waiting for a
/// binding to adopt them.
#[derive(Debug, Default)]
pub struct Context {
    pub scope: Vec<Frame>,
    pub comment_scope: Vec<CommentFrame>,
    pub unassigned_comments: Vec<Rc<Comment>>,
    pub last_call_scope_start: usize,
}

impl Context {
    pub fn new() -> Self {
        Self {
            scope: vec![Frame::default()],
            comment_scope: vec![CommentFrame::default()],
            unassigned_comments: vec![],
            last_call_scope_start: 0,
        }
    }

    /// Insert a binding without any comment bookkeeping. Used to register
    /// built-ins.
    pub fn set(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.scope.last_mut() {
            frame.insert(name.to_owned(), vec![value]);
        }
    }

    /// Bind `name` in the current frame. Every comment entry already
    /// tracking `name` sees the new value appended to its history, and any
    /// comments on the unassigned queue are adopted, seeded with this value.
    pub fn bind(&mut self, name: &str, value: Value) {
        for frame in &mut self.comment_scope {
            for entry in frame.values_mut() {
                if entry.name == name {
                    entry.values.push(value.clone());
                }
            }
        }

        let pending = mem::take(&mut self.unassigned_comments);
        if let Some(frame) = self.comment_scope.last_mut() {
            for comment in pending {
                debug!("comment {:?} adopted by binding of {name}", comment.text);
                frame.insert(
                    comment.id,
                    CommentEntry {
                        name: name.to_owned(),
                        values: vec![value.clone()],
                        comment,
                    },
                );
            }
        }

        if let Some(frame) = self.scope.last_mut() {
            frame.entry(name.to_owned()).or_default().push(value);
        }
    }

    /// Plain identifier lookup, innermost frame first. A name bound several
    /// times in the winning frame yields the resolution set of its history.
    pub fn lookup(&self, name: &str) -> Value {
        for frame in self.scope.iter().rev() {
            if let Some(history) = frame.get(name) {
                return match history.as_slice() {
                    [value] => value.clone(),
                    values => Value::resolution_set(values.to_vec()),
                };
            }
        }
        Value::Empty
    }

    /// Resolve a mention of `name`, disambiguated by `words`. Candidates are
    /// every binding of the name in every frame (innermost frame first,
    /// oldest binding first); words keep only the candidates whose
    /// associated comments score highest. Direct mentions flatten a lone
    /// survivor, indirect ones never do.
    pub fn resolve_mention(&mut self, name: &str, words: &[String], direct: bool) -> Value {
        let mut candidates = vec![];
        for frame in self.scope.iter().rev() {
            if let Some(history) = frame.get(name) {
                for value in history {
                    match value {
                        Value::ResolutionSet(set) => candidates.extend(set.iter().cloned()),
                        value => candidates.push(value.clone()),
                    }
                }
            }
        }

        if candidates.is_empty() {
            return Value::Empty;
        }
        if direct && words.is_empty() && candidates.len() == 1 {
            return candidates.remove(0);
        }

        let survivors = if words.is_empty() {
            candidates
        } else {
            let scores: Vec<usize> = candidates
                .iter()
                .map(|candidate| {
                    let joined = self.associated_comment_texts(candidate).join(" ");
                    words
                        .iter()
                        .filter(|word| joined.contains(word.as_str()))
                        .count()
                })
                .collect();
            let best = scores.iter().copied().max().unwrap_or(0);
            candidates
                .into_iter()
                .zip(scores)
                .filter(|(_, score)| *score == best)
                .map(|(candidate, _)| candidate)
                .collect()
        };

        debug!(
            "mention of {name} with {} word(s) kept {} candidate(s)",
            words.len(),
            survivors.len()
        );

        if direct {
            if let [survivor] = survivors.as_slice() {
                return survivor.clone();
            }
        }
        Value::resolution_set(survivors)
    }

    /// The comment texts a value is known by: every adopted comment whose
    /// history contains the value, a function's own body comments, and a
    /// native function's built-in comments.
    pub fn associated_comment_texts(&self, value: &Value) -> Vec<String> {
        let mut texts = vec![];
        for frame in &self.comment_scope {
            for entry in frame.values() {
                if entry.values.contains(value) {
                    texts.push(entry.comment.text.clone());
                }
            }
        }

        match value {
            Value::Function(function) => {
                texts.extend(
                    function
                        .node
                        .body_comments()
                        .map(|comment| comment.text.clone()),
                );
            }
            Value::NativeFunction(native) => {
                texts.extend(native.comments.iter().map(|comment| (*comment).to_string()));
            }
            _ => {}
        }

        texts
    }
}
