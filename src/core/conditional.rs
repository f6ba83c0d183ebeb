//! Values that may hold only under a named build condition.
//!
//! A [`ConditionalSet`] keeps an unconditioned set of values plus, per
//! condition key (a Bazel `config_setting` label), the values that only apply
//! under that condition. It renders to Starlark as a flat list followed by one
//! `select()` per condition.

use std::collections::{BTreeMap, BTreeSet};

/// The key Bazel uses for the fallback branch of a `select()`.
pub const DEFAULT_CONDITION: &str = "//conditions:default";

/// A set of values, some of them conditional.
///
/// A value is never stored both unconditioned and under a condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalSet<T: Ord> {
    unconditioned: BTreeSet<T>,
    conditional: BTreeMap<String, BTreeSet<T>>,
}

impl<T: Ord> Default for ConditionalSet<T> {
    fn default() -> Self {
        ConditionalSet {
            unconditioned: BTreeSet::new(),
            conditional: BTreeMap::new(),
        }
    }
}

impl<T: Ord + Clone> ConditionalSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value unconditionally, removing it from any conditional branch.
    pub fn append(&mut self, value: T) {
        self.conditional.retain(|_, values| {
            values.remove(&value);
            !values.is_empty()
        });
        self.unconditioned.insert(value);
    }

    /// Add a value under `condition`. An empty condition means unconditional.
    pub fn append_conditional(&mut self, condition: &str, value: T) {
        if condition.is_empty() {
            self.append(value);
            return;
        }
        if self.unconditioned.contains(&value) {
            return;
        }
        self.conditional
            .entry(condition.to_string())
            .or_default()
            .insert(value);
    }

    pub fn is_empty(&self) -> bool {
        self.unconditioned.is_empty() && self.conditional.is_empty()
    }

    /// Values that apply regardless of condition.
    pub fn unconditioned(&self) -> &BTreeSet<T> {
        &self.unconditioned
    }

    /// Values that apply only under some condition, keyed by condition.
    pub fn conditional(&self) -> &BTreeMap<String, BTreeSet<T>> {
        &self.conditional
    }

    /// All `(condition, value)` pairs; unconditioned values carry an empty key.
    pub fn items(&self) -> impl Iterator<Item = (&str, &T)> {
        self.unconditioned
            .iter()
            .map(|v| ("", v))
            .chain(
                self.conditional
                    .iter()
                    .flat_map(|(cond, values)| values.iter().map(move |v| (cond.as_str(), v))),
            )
    }

    /// Every value regardless of condition.
    pub fn values(&self) -> BTreeSet<T> {
        self.items().map(|(_, v)| v.clone()).collect()
    }

    /// The full set of values that hold when `condition` is active.
    pub fn resolve(&self, condition: &str) -> BTreeSet<T> {
        let mut out = self.unconditioned.clone();
        if let Some(delta) = self.conditional.get(condition) {
            out.extend(delta.iter().cloned());
        }
        out
    }

    /// Render with `formatter` producing a Starlark list literal for a slice.
    ///
    /// The result is the unconditioned list followed by
    /// `+ select({cond: [...], "//conditions:default": []})` per condition.
    pub fn render<F>(&self, formatter: F) -> String
    where
        F: Fn(&[T]) -> String,
    {
        let mut parts = Vec::new();
        if !self.unconditioned.is_empty() || self.conditional.is_empty() {
            let values: Vec<T> = self.unconditioned.iter().cloned().collect();
            parts.push(formatter(&values));
        }
        for (condition, delta) in &self.conditional {
            let values: Vec<T> = delta.iter().cloned().collect();
            parts.push(format!(
                "select({{\n{}: {},\n{}: {},\n}})",
                quote(condition),
                formatter(&values),
                quote(DEFAULT_CONDITION),
                formatter(&[]),
            ));
        }
        parts.join(" + ")
    }
}

/// Merge per-condition value lists into one set.
///
/// Values present in every input become unconditioned; what remains of each
/// input is stored under that input's condition. For every input `k`,
/// `unconditioned ∪ delta_k` is exactly the input set.
pub fn merge_conditional<T, I>(inputs: &BTreeMap<String, I>) -> ConditionalSet<T>
where
    T: Ord + Clone,
    for<'a> &'a I: IntoIterator<Item = &'a T>,
{
    let sets: BTreeMap<&str, BTreeSet<T>> = inputs
        .iter()
        .map(|(cond, values)| (cond.as_str(), values.into_iter().cloned().collect()))
        .collect();

    let mut merged = ConditionalSet::new();
    let mut iter = sets.values();
    let Some(first) = iter.next() else {
        return merged;
    };
    let intersection: BTreeSet<T> = iter.fold(first.clone(), |acc, set| {
        acc.intersection(set).cloned().collect()
    });

    for (cond, set) in &sets {
        let delta: BTreeSet<T> = set.difference(&intersection).cloned().collect();
        if !delta.is_empty() {
            merged.conditional.insert(cond.to_string(), delta);
        }
    }
    merged.unconditioned = intersection;
    merged
}

fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn inputs(pairs: Vec<(&str, Vec<u32>)>) -> BTreeMap<String, Vec<u32>> {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_append_keeps_values_disjoint() {
        let mut set = ConditionalSet::new();
        set.append_conditional("x", 1);
        set.append_conditional("y", 1);
        set.append_conditional("x", 2);
        set.append(1);

        assert_eq!(set.unconditioned().iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(set.conditional().len(), 1);
        assert!(set.conditional()["x"].contains(&2));

        set.append_conditional("y", 1);
        assert!(!set.conditional().contains_key("y"));
    }

    #[test]
    fn test_empty_condition_is_unconditional() {
        let mut set = ConditionalSet::new();
        set.append_conditional("", "a");
        assert!(set.unconditioned().contains("a"));
        assert!(set.conditional().is_empty());
    }

    #[test]
    fn test_items_carry_condition() {
        let mut set = ConditionalSet::new();
        set.append("a");
        set.append_conditional("//:neon_build", "b");
        let items: Vec<_> = set.items().collect();
        assert_eq!(items, vec![("", &"a"), ("//:neon_build", &"b")]);
    }

    #[test]
    fn test_merge_factors_common_values() {
        let merged = merge_conditional(&inputs(vec![("x", vec![1, 2]), ("y", vec![1, 3])]));
        assert_eq!(merged.unconditioned().iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(merged.conditional()["x"].iter().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(merged.conditional()["y"].iter().copied().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_merge_absent_input_is_empty_list() {
        let merged = merge_conditional(&inputs(vec![("x", vec![]), ("y", vec![4])]));
        assert!(merged.unconditioned().is_empty());
        assert!(!merged.conditional().contains_key("x"));
        assert_eq!(merged.resolve("y").len(), 1);
    }

    #[test]
    fn test_merge_no_inputs() {
        let merged: ConditionalSet<u32> = merge_conditional(&BTreeMap::<String, Vec<u32>>::new());
        assert!(merged.is_empty());
    }

    #[test]
    fn test_render_flat() {
        let mut set = ConditionalSet::new();
        set.append("b");
        set.append("a");
        let out = set.render(|v| format!("{:?}", v));
        assert_eq!(out, r#"["a", "b"]"#);
    }

    #[test]
    fn test_render_select() {
        let mut set = ConditionalSet::new();
        set.append("a");
        set.append_conditional("//:neon_build", "n");
        let out = set.render(|v| format!("{:?}", v));
        assert_eq!(
            out,
            "[\"a\"] + select({\n\"//:neon_build\": [\"n\"],\n\"//conditions:default\": [],\n})"
        );
    }

    #[test]
    fn test_render_only_conditional_omits_flat_list() {
        let mut set = ConditionalSet::new();
        set.append_conditional("c", "n");
        let out = set.render(|v| format!("{:?}", v));
        assert!(out.starts_with("select("));
    }

    proptest! {
        #[test]
        fn prop_merge_recovers_each_input(
            lists in prop::collection::vec(prop::collection::vec(0u8..16, 0..8), 1..5)
        ) {
            let input: BTreeMap<String, Vec<u8>> = lists
                .iter()
                .enumerate()
                .map(|(i, l)| (format!("cond{}", i), l.clone()))
                .collect();
            let merged = merge_conditional(&input);
            for (cond, list) in &input {
                let expected: BTreeSet<u8> = list.iter().copied().collect();
                prop_assert_eq!(merged.resolve(cond), expected);
                if let Some(delta) = merged.conditional().get(cond) {
                    prop_assert!(delta.is_disjoint(merged.unconditioned()));
                }
            }
        }

        #[test]
        fn prop_equal_inputs_have_no_branches(
            list in prop::collection::vec(0u8..16, 0..8),
            n in 1usize..5,
        ) {
            let input: BTreeMap<String, Vec<u8>> = (0..n)
                .map(|i| {
                    let mut l = list.clone();
                    l.reverse();
                    (format!("cond{}", i), if i % 2 == 0 { list.clone() } else { l })
                })
                .collect();
            let merged = merge_conditional(&input);
            prop_assert!(merged.conditional().is_empty());
        }

        #[test]
        fn prop_single_input_is_unconditioned(list in prop::collection::vec(0u8..16, 0..8)) {
            let input: BTreeMap<String, Vec<u8>> =
                [("only".to_string(), list.clone())].into_iter().collect();
            let merged = merge_conditional(&input);
            prop_assert!(merged.conditional().is_empty());
            let expected: BTreeSet<u8> = list.into_iter().collect();
            prop_assert_eq!(merged.unconditioned(), &expected);
        }
    }
}
