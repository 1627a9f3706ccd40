//! Deterministic id allocation
//!
//! Ids found in the input are kept on first use. Missing or duplicate ids
//! become `{prefix}-{k}` with the smallest `k` that collides with nothing in
//! the input and nothing handed out so far, so a normalized document keeps
//! all of its ids on the next pass.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    reserved: HashSet<String>,
    assigned: HashSet<String>,
}

impl IdAllocator {
    pub(crate) fn new(reserved: impl IntoIterator<Item = String>) -> Self {
        Self {
            reserved: reserved.into_iter().collect(),
            assigned: HashSet::new(),
        }
    }

    /// Claim `candidate` if it is free, otherwise generate one.
    /// Returns the id and whether it had to be generated.
    pub(crate) fn claim(&mut self, candidate: Option<String>, prefix: &str) -> (String, bool) {
        if let Some(id) = candidate
            && !self.assigned.contains(&id)
        {
            self.assigned.insert(id.clone());
            return (id, false);
        }
        (self.generate(prefix), true)
    }

    /// Use `preferred` verbatim when nobody uses it, else generate from it
    pub(crate) fn claim_preferred(&mut self, preferred: &str) -> String {
        if !self.reserved.contains(preferred) && !self.assigned.contains(preferred) {
            self.assigned.insert(preferred.to_string());
            return preferred.to_string();
        }
        self.generate(preferred)
    }

    pub(crate) fn generate(&mut self, prefix: &str) -> String {
        let id = next_free_id(prefix, |id| {
            self.reserved.contains(id) || self.assigned.contains(id)
        });
        self.assigned.insert(id.clone());
        id
    }

    /// Release an id that ended up unused (e.g. its block was dropped)
    pub(crate) fn release(&mut self, id: &str) {
        self.assigned.remove(id);
    }
}

/// Section 和 block 的 id 是两个独立的命名空间
#[derive(Debug, Default)]
pub(crate) struct LayoutIds {
    pub(crate) sections: IdAllocator,
    pub(crate) blocks: IdAllocator,
}

/// Smallest `{prefix}-{k}` (k >= 1) for which `taken` is false
pub(crate) fn next_free_id(prefix: &str, taken: impl Fn(&str) -> bool) -> String {
    (1u64..)
        .map(|k| format!("{}-{}", prefix, k))
        .find(|id| !taken(id))
        .unwrap_or_else(|| prefix.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_keeps_first_and_regenerates_duplicates() {
        let mut ids = IdAllocator::new(vec!["a".to_string(), "text-1".to_string()]);
        assert_eq!(ids.claim(Some("a".to_string()), "text"), ("a".to_string(), false));
        assert_eq!(ids.claim(Some("a".to_string()), "text"), ("text-2".to_string(), true));
        assert_eq!(ids.claim(None, "text"), ("text-3".to_string(), true));
    }

    #[test]
    fn test_claim_preferred() {
        let mut ids = IdAllocator::new(Vec::new());
        assert_eq!(ids.claim_preferred("hero"), "hero");
        assert_eq!(ids.claim_preferred("hero"), "hero-1");
    }

    #[test]
    fn test_release() {
        let mut ids = IdAllocator::new(Vec::new());
        let id = ids.generate("image");
        ids.release(&id);
        assert_eq!(ids.generate("image"), "image-1");
    }
}
