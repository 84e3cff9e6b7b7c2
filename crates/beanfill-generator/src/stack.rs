//! Type occurrence stack for cycle detection.
//!
//! The stack is persistent: [`TypeStack::push`] returns a new stack sharing
//! its tail with the old one, so every recursive branch carries its own
//! chain from the root without any restore step.

use beanfill_core::TypeRef;
use std::rc::Rc;

/// Number of occurrences at which a type is no longer entered.
const REENTRY_LIMIT: usize = 2;

#[derive(Debug)]
struct Frame {
    ty: TypeRef,
    parent: Option<Rc<Frame>>,
}

/// Chain of erased type identities from the root to the current position.
#[derive(Debug, Clone, Default)]
pub struct TypeStack {
    head: Option<Rc<Frame>>,
    len: usize,
}

impl TypeStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack holding only the root type.
    pub fn root(ty: &TypeRef) -> Self {
        Self::new().push(ty)
    }

    /// A new stack with `ty` on top.
    pub fn push(&self, ty: &TypeRef) -> Self {
        Self {
            head: Some(Rc::new(Frame {
                ty: ty.erasure(),
                parent: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// How often the erasure of `ty` occurs in the stack.
    pub fn occurrences(&self, ty: &TypeRef) -> usize {
        let erased = ty.erasure();
        self.iter().filter(|t| **t == erased).count()
    }

    /// Whether entering a position of type `ty` would re-enter a type that
    /// already occurs twice. Named types nested as generic arguments count.
    pub fn would_overflow(&self, ty: &TypeRef) -> bool {
        ty.walk()
            .into_iter()
            .filter(|t| matches!(t, TypeRef::Named { .. }))
            .any(|t| self.occurrences(t) >= REENTRY_LIMIT)
    }

    /// Entries from the top of the stack down to the root.
    pub fn iter(&self) -> impl Iterator<Item = &TypeRef> {
        std::iter::successors(self.head.as_deref(), |frame| frame.parent.as_deref())
            .map(|frame| &frame.ty)
    }
}
