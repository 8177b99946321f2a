//! Scope stack used to resolve tag keys during rendering.

use crate::types::Value;

/// An ordered stack of scope frames.
///
/// The root frame is the data passed to the top-level render call. A frame is
/// pushed for each iteration of a truthy section and popped once that
/// iteration's body has rendered, so the stack always mirrors the section
/// nesting at the current point in the template.
///
/// Frames are borrowed, so lookups return references that outlive any later
/// push or pop.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    frames: Vec<&'a Value>,
}

impl<'a> Context<'a> {
    /// Create a context whose only frame is `root`.
    pub fn new(root: &'a Value) -> Self {
        Self { frames: vec![root] }
    }

    /// Create a context from existing frames, innermost last.
    pub fn from_frames(frames: Vec<&'a Value>) -> Self {
        Self { frames }
    }

    pub fn push(&mut self, frame: &'a Value) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<&'a Value> {
        self.frames.pop()
    }

    /// Number of frames on the stack.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The innermost frame.
    pub fn top(&self) -> Option<&'a Value> {
        self.frames.last().copied()
    }

    pub fn frames(&self) -> &[&'a Value] {
        &self.frames
    }

    /// Resolve a possibly dotted key.
    ///
    /// `.` is the innermost frame. Otherwise the first segment is searched
    /// for from the innermost frame outwards; the first frame that has it
    /// wins even if the value is falsy. Remaining segments are resolved only
    /// inside that value, never by searching the stack again.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        if key == "." {
            return self.top();
        }

        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut value = self.frames.iter().rev().find_map(|frame| frame.get(first))?;

        for segment in segments {
            value = value.get(segment)?;
        }
        Some(value)
    }
}
