use std::fmt::Display;

use crate::pdf::ObjectId;

/// Indirect reference `<index> 0 R`.
///
/// Only generation `0` is recognised, so the generation is not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Reference {
    pub(crate) index: ObjectId,
}

impl Reference {
    pub const fn new(index: ObjectId) -> Self {
        Self { index }
    }

    pub fn index(&self) -> ObjectId {
        self.index
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} 0 R", self.index)
    }
}
