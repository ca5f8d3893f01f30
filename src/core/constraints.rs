/// Requirements carried forward to the next noun.

use rustc_hash::FxHashSet;

/// The words currently acceptable as the next noun, and a reserve copy kept
/// for nouns that continue a conjunction.
///
/// An empty `active` set means "unconstrained", not "nothing allowed".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintState {
    pub active: FxHashSet<String>,
    pub reserve: FxHashSet<String>,
}

/// Intersect when both sides constrain, otherwise keep whichever does.
fn merge(current: &mut FxHashSet<String>, incoming: &FxHashSet<String>) {
    if incoming.is_empty() {
        return;
    }
    if current.is_empty() {
        *current = incoming.clone();
    } else {
        current.retain(|name| incoming.contains(name));
    }
}

impl ConstraintState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the current word's own requirements into the active set.
    pub fn apply(&mut self, requirements: &FxHashSet<String>) {
        merge(&mut self.active, requirements);
    }

    /// Bring the previous noun's requirements back for a conjoined noun.
    pub fn resume_conjunction(&mut self) {
        let reserve = std::mem::take(&mut self.reserve);
        merge(&mut self.active, &reserve);
        self.reserve = reserve;
    }

    /// A noun has consumed the active requirements: keep them in reserve in
    /// case a conjunction follows, and clear them.
    pub fn consume(&mut self) {
        self.reserve = std::mem::take(&mut self.active);
    }

    /// Restore the reserve when nothing is active, ahead of matching a
    /// modifier against the pending noun.
    pub fn seed_from_reserve(&mut self) {
        if self.active.is_empty() {
            self.active = self.reserve.clone();
        }
    }

    pub fn is_constrained(&self) -> bool {
        !self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> FxHashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn apply_adopts_when_unconstrained() {
        let mut c = ConstraintState::new();
        c.apply(&set(&["apple", "bread"]));
        assert_eq!(c.active, set(&["apple", "bread"]));
    }

    #[test]
    fn apply_intersects_when_both_constrain() {
        let mut c = ConstraintState::new();
        c.apply(&set(&["apple", "bread", "rock"]));
        c.apply(&set(&["bread", "rock", "man"]));
        assert_eq!(c.active, set(&["bread", "rock"]));
    }

    #[test]
    fn apply_with_empty_requirements_is_noop() {
        let mut c = ConstraintState::new();
        c.apply(&set(&["apple"]));
        c.apply(&FxHashSet::default());
        assert_eq!(c.active, set(&["apple"]));
    }

    #[test]
    fn disjoint_requirements_empty_the_active_set() {
        let mut c = ConstraintState::new();
        c.apply(&set(&["apple"]));
        c.apply(&set(&["rock"]));
        assert!(!c.is_constrained());
    }

    #[test]
    fn consume_moves_active_to_reserve() {
        let mut c = ConstraintState::new();
        c.apply(&set(&["apple"]));
        c.consume();
        assert!(c.active.is_empty());
        assert_eq!(c.reserve, set(&["apple"]));
    }

    #[test]
    fn resume_conjunction_adopts_reserve() {
        let mut c = ConstraintState::new();
        c.apply(&set(&["apple", "bread"]));
        c.consume();
        c.resume_conjunction();
        assert_eq!(c.active, set(&["apple", "bread"]));
        assert_eq!(c.reserve, set(&["apple", "bread"]));
    }

    #[test]
    fn resume_conjunction_intersects_with_reserve() {
        let mut c = ConstraintState::new();
        c.apply(&set(&["apple", "bread"]));
        c.consume();
        c.apply(&set(&["bread", "rock"]));
        c.resume_conjunction();
        assert_eq!(c.active, set(&["bread"]));
    }

    #[test]
    fn resume_conjunction_with_empty_reserve_keeps_active() {
        let mut c = ConstraintState::new();
        c.apply(&set(&["apple"]));
        c.resume_conjunction();
        assert_eq!(c.active, set(&["apple"]));
    }

    #[test]
    fn seed_from_reserve_only_when_unconstrained() {
        let mut c = ConstraintState::new();
        c.apply(&set(&["apple"]));
        c.consume();
        c.seed_from_reserve();
        assert_eq!(c.active, set(&["apple"]));

        c.active = set(&["rock"]);
        c.seed_from_reserve();
        assert_eq!(c.active, set(&["rock"]));
    }
}
