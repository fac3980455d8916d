//! Membership reconciliation: diff a desired set against an observed set

use std::collections::HashSet;

/// The additions and removals needed to make an observed membership set
/// match a desired one. Appliers must execute removals before additions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl MembershipDiff {
    /// True when observed already matches desired.
    pub fn is_converged(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Compute `to_add = desired − observed` and `to_remove = observed − desired`.
///
/// GitHub login handles are case-insensitive, so comparison normalizes to
/// lowercase while the output keeps each handle's original spelling and
/// input order. Duplicate desired handles are collapsed to one addition.
pub fn diff(desired: &[String], observed: &[String]) -> MembershipDiff {
    let desired_keys: HashSet<String> = desired.iter().map(|h| h.to_lowercase()).collect();
    let observed_keys: HashSet<String> = observed.iter().map(|h| h.to_lowercase()).collect();

    let mut queued: HashSet<String> = HashSet::new();
    let to_add = desired
        .iter()
        .filter(|handle| {
            let key = handle.to_lowercase();
            !observed_keys.contains(&key) && queued.insert(key)
        })
        .cloned()
        .collect();

    let to_remove = observed
        .iter()
        .filter(|handle| !desired_keys.contains(&handle.to_lowercase()))
        .cloned()
        .collect();

    MembershipDiff { to_add, to_remove }
}
