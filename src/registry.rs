use std::collections::HashSet;

/// Tracks which inspectable-object ids have already been surfaced within one
/// rendering context. Membership only; an id enters once no matter how many
/// times the same item re-renders.
#[derive(Debug, Default)]
pub struct LogItemRegistry {
    seen: HashSet<String>,
}

impl LogItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, id: &str) -> bool {
        self.seen.contains(id)
    }

    pub fn mark_seen(&mut self, id: &str) {
        self.seen.insert(id.to_string());
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
