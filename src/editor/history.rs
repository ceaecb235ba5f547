//! Bounded undo/redo history over a single buffer
//!
//! Every mutation carries an [`EditSource`]. Only user edits are undoable;
//! programmatic replacements (problem load, language switch) wipe both stacks
//! so history never crosses into another language's code.

use std::collections::VecDeque;

use crate::constants::HISTORY_CAPACITY;

/// Origin of a buffer change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditSource {
    /// Typed by the participant; undoable
    User,
    /// Language switch or problem load; resets history
    Programmatic,
    /// A view reflecting an undo/redo result back; never recorded
    Echo,
}

#[derive(Debug, Clone)]
pub struct EditHistory {
    buffer: String,
    undo: VecDeque<String>,
    redo: VecDeque<String>,
    capacity: usize,
}

impl EditHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self::with_capacity(initial, HISTORY_CAPACITY)
    }

    pub fn with_capacity(initial: impl Into<String>, capacity: usize) -> Self {
        Self {
            buffer: initial.into(),
            undo: VecDeque::with_capacity(capacity),
            redo: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Apply a change from `source`; returns whether the buffer changed
    pub fn apply(&mut self, text: impl Into<String>, source: EditSource) -> bool {
        match source {
            EditSource::User => self.apply_user_edit(text),
            EditSource::Programmatic => {
                self.replace_buffer(text);
                true
            }
            EditSource::Echo => {
                let text = text.into();
                let changed = text != self.buffer;
                if changed {
                    tracing::debug!("Echoed buffer differs from history; adopting it unrecorded");
                    self.buffer = text;
                }
                changed
            }
        }
    }

    /// Record a user edit; a no-op when the text is unchanged
    pub fn apply_user_edit(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.buffer {
            return false;
        }
        let previous = std::mem::replace(&mut self.buffer, text);
        push_bounded(&mut self.undo, previous, self.capacity);
        self.redo.clear();
        true
    }

    /// Replace the buffer without recording history
    pub fn replace_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.undo.clear();
        self.redo.clear();
    }

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.buffer, previous);
        push_bounded(&mut self.redo, current, self.capacity);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.buffer, next);
        push_bounded(&mut self.undo, current, self.capacity);
        true
    }
}

/// Push onto the top of `stack`, evicting from the bottom past `capacity`
fn push_bounded(stack: &mut VecDeque<String>, entry: String, capacity: usize) {
    if capacity == 0 {
        return;
    }
    if stack.len() == capacity {
        stack.pop_front();
    }
    stack.push_back(entry);
}
