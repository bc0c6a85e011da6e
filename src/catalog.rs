// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module defines the `ActionCatalog`: the deduplicated collection of
//! actions every solver works with.

use fxhash::FxHashSet;

use crate::Action;

/// Tells when two actions are to be considered the same opportunity.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DedupPolicy {
    /// Two actions are the same iff they bear the same name. This is the
    /// recommended policy: two distinct opportunities which happen to have
    /// the same price and profit are kept apart.
    #[default]
    ByName,
    /// Two actions are the same iff they have the same cost and benefit.
    ByValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DedupKey {
    Name(String),
    Value(u64, u64),
}
impl DedupPolicy {
    fn key(self, action: &Action) -> DedupKey {
        match self {
            DedupPolicy::ByName  => DedupKey::Name(action.name().to_string()),
            DedupPolicy::ByValue => DedupKey::Value(action.cost().to_bits(), action.benefit().to_bits()),
        }
    }
}

/// A collection of actions where no two members are equal under the
/// configured `DedupPolicy`. The catalog remembers the order in which the
/// actions were inserted so that any traversal of it is reproducible.
///
/// # Example
/// ```
/// # use profit_optimizer::*;
/// let mut catalog = ActionCatalog::new(DedupPolicy::ByName);
/// assert!(catalog.insert(Action::new("A", 10.0, 5.0).unwrap()));
/// assert!(catalog.insert(Action::new("B", 10.0, 5.0).unwrap()));
/// // same name as an action which is already known
/// assert!(!catalog.insert(Action::new("A", 20.0, 1.0).unwrap()));
/// assert_eq!(2, catalog.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    policy : DedupPolicy,
    keys   : FxHashSet<DedupKey>,
    actions: Vec<Action>,
}

impl ActionCatalog {
    /// Creates an empty catalog using the given dedup policy
    pub fn new(policy: DedupPolicy) -> Self {
        ActionCatalog { policy, keys: FxHashSet::default(), actions: vec![] }
    }
    /// Creates a catalog holding the given actions. Duplicates are silently
    /// dropped (the first occurrence wins).
    pub fn from_actions<I: IntoIterator<Item = Action>>(actions: I, policy: DedupPolicy) -> Self {
        let mut catalog = Self::new(policy);
        for action in actions {
            catalog.insert(action);
        }
        catalog
    }
    /// Adds the given action to the catalog unless an equal one is already
    /// present. Returns true iff the action was actually added.
    pub fn insert(&mut self, action: Action) -> bool {
        if self.keys.insert(self.policy.key(&action)) {
            self.actions.push(action);
            true
        } else {
            false
        }
    }
    /// The policy used to tell duplicates apart
    pub fn policy(&self) -> DedupPolicy {
        self.policy
    }
    /// All the actions, in insertion order
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }
    pub fn len(&self) -> usize {
        self.actions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl <'a> IntoIterator for &'a ActionCatalog {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod test_catalog {
    use crate::{Action, ActionCatalog, DedupPolicy};

    fn action(name: &str, cost: f64, benefit: f64) -> Action {
        Action::new(name, cost, benefit).unwrap()
    }

    #[test]
    fn by_default_it_is_empty() {
        let catalog = ActionCatalog::default();
        assert!(catalog.is_empty());
        assert_eq!(0, catalog.len());
        assert_eq!(DedupPolicy::ByName, catalog.policy());
    }
    #[test]
    fn by_name_keeps_distinct_actions_with_the_same_values() {
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 10.0, 5.0),
            action("B", 10.0, 5.0),
        ], DedupPolicy::ByName);
        assert_eq!(2, catalog.len());
    }
    #[test]
    fn by_name_drops_homonyms_and_keeps_the_first_one() {
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 10.0, 5.0),
            action("A", 20.0, 7.0),
        ], DedupPolicy::ByName);
        assert_eq!(1, catalog.len());
        assert_eq!(10.0, catalog.actions()[0].cost());
    }
    #[test]
    fn by_value_merges_actions_with_the_same_cost_and_benefit() {
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 10.0, 5.0),
            action("B", 10.0, 5.0),
            action("C", 10.0, 6.0),
        ], DedupPolicy::ByValue);
        let names = catalog.iter().map(|a| a.name()).collect::<Vec<_>>();
        assert_eq!(vec!["A", "C"], names);
    }
    #[test]
    fn by_value_keeps_homonyms_with_different_values() {
        let mut catalog = ActionCatalog::new(DedupPolicy::ByValue);
        assert!(catalog.insert(action("A", 10.0, 5.0)));
        assert!(catalog.insert(action("A", 11.0, 5.0)));
        assert!(!catalog.insert(action("Z", 10.0, 5.0)));
        assert_eq!(2, catalog.len());
    }
    #[test]
    fn insertion_order_is_preserved() {
        let catalog = ActionCatalog::from_actions(vec![
            action("C", 1.0, 1.0),
            action("A", 2.0, 1.0),
            action("B", 3.0, 1.0),
        ], DedupPolicy::ByName);
        let names = (&catalog).into_iter().map(|a| a.name()).collect::<Vec<_>>();
        assert_eq!(vec!["C", "A", "B"], names);
    }
}
