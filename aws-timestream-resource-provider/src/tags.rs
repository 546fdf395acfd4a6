//! Tag merging and diffing.
//!
//! Tags reach a resource from three sources: the resource's own `Tags`
//! property, stack-level tags, and system tags the orchestration caller
//! attaches. At create time they are merged with resource tags winning over
//! stack tags winning over system tags. At update time the previously
//! attached set is diffed against the newly desired set.
//!
//! All maps are [`TagMap`]s, so every list derived from them is sorted by
//! key and provider calls are built deterministically.
//!
//! A key whose value changed appears only in [`TagDiff::to_add`]: tagging
//! overwrites the value, so the key is never removed first.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::Tag;

/// Tags keyed by tag key, sorted.
pub type TagMap = BTreeMap<String, String>;

/// Converts resource tags to a map, dropping entries without a value.
///
/// When a key repeats, the last entry wins.
pub fn to_tag_map(tags: Option<&[Tag]>) -> TagMap {
    tags.unwrap_or_default()
        .iter()
        .filter_map(|tag| tag.value.as_ref().map(|value| (tag.key.clone(), value.clone())))
        .collect()
}

/// Converts a map back to resource tags, or `None` when it is empty.
pub fn to_model_tags(tags: &TagMap) -> Option<Vec<Tag>> {
    if tags.is_empty() {
        return None;
    }
    Some(tags.iter().map(|(key, value)| Tag::new(key, value)).collect())
}

/// Tags to attach when creating a resource.
///
/// Precedence is resource > stack > system.
pub fn merge_for_create(
    resource_tags: Option<&[Tag]>,
    stack_tags: Option<&TagMap>,
    system_tags: Option<&TagMap>,
) -> TagMap {
    let mut merged = system_tags.cloned().unwrap_or_default();
    merged.extend(stack_tags.cloned().unwrap_or_default());
    merged.extend(to_tag_map(resource_tags));
    merged
}

/// Tags that were attached before this update: previous stack tags plus
/// the previous model's tags, the model winning.
pub fn previously_attached(previous_stack_tags: Option<&TagMap>, previous_tags: Option<&[Tag]>) -> TagMap {
    let mut attached = previous_stack_tags.cloned().unwrap_or_default();
    attached.extend(to_tag_map(previous_tags));
    attached
}

/// Tags that should be attached after this update: desired stack tags plus
/// the desired model's tags, the model winning.
pub fn new_desired(desired_tags: Option<&[Tag]>, desired_stack_tags: Option<&TagMap>) -> TagMap {
    let mut desired = desired_stack_tags.cloned().unwrap_or_default();
    desired.extend(to_tag_map(desired_tags));
    desired
}

/// Returns true if the two tag sets differ.
pub fn should_update(previous: &TagMap, desired: &TagMap) -> bool {
    previous != desired
}

/// Changes needed to move a resource from one tag set to another.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagDiff {
    /// Keys that are new or whose value changed, with the desired value.
    pub to_add: TagMap,
    /// Keys present before and absent from the desired set.
    pub to_remove: BTreeSet<String>,
}

impl TagDiff {
    /// Computes the diff from `previous` to `desired`.
    pub fn between(previous: &TagMap, desired: &TagMap) -> Self {
        let to_add = desired
            .iter()
            .filter(|(key, value)| previous.get(*key) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let to_remove = previous
            .keys()
            .filter(|key| !desired.contains_key(*key))
            .cloned()
            .collect();
        Self { to_add, to_remove }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Sorted keys for an untag call.
    pub fn keys_to_remove(&self) -> Vec<String> {
        self.to_remove.iter().cloned().collect()
    }

    /// The tag set that results from removing then adding against `previous`.
    pub fn apply(&self, previous: &TagMap) -> TagMap {
        let mut result: TagMap = previous
            .iter()
            .filter(|(key, _)| !self.to_remove.contains(*key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        result.extend(self.to_add.clone());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> TagMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_merge_precedence() {
        let resource = vec![Tag::new("env", "prod")];
        let stack = map(&[("env", "stack"), ("team", "obs")]);
        let system = map(&[("aws:cloudformation:stack-name", "s1"), ("team", "system")]);

        let merged = merge_for_create(Some(&resource), Some(&stack), Some(&system));

        assert_eq!(
            merged,
            map(&[
                ("aws:cloudformation:stack-name", "s1"),
                ("env", "prod"),
                ("team", "obs"),
            ])
        );
    }

    #[test]
    fn test_merge_drops_null_values() {
        let resource = vec![
            Tag {
                key: "orphan".to_string(),
                value: None,
            },
            Tag::new("kept", "v"),
        ];
        let merged = merge_for_create(Some(&resource), None, None);
        assert_eq!(merged, map(&[("kept", "v")]));
    }

    #[test]
    fn test_merge_with_nothing_is_empty() {
        assert!(merge_for_create(None, None, None).is_empty());
    }

    #[test]
    fn test_diff_scenario() {
        let previous = map(&[("k1", "v1"), ("k2", "v2")]);
        let desired = map(&[("k2", "v2new"), ("k3", "v3")]);

        let diff = TagDiff::between(&previous, &desired);

        assert_eq!(diff.to_add, map(&[("k2", "v2new"), ("k3", "v3")]));
        assert_eq!(diff.keys_to_remove(), vec!["k1".to_string()]);
    }

    #[test]
    fn test_diff_identical_is_empty() {
        let tags = map(&[("a", "1"), ("b", "2")]);
        let diff = TagDiff::between(&tags, &tags);
        assert!(diff.is_empty());
        assert!(!should_update(&tags, &tags));
    }

    #[test]
    fn test_previously_attached_and_new_desired() {
        let previous_stack = map(&[("stack", "old"), ("shared", "stack")]);
        let previous_model = vec![Tag::new("shared", "model")];
        assert_eq!(
            previously_attached(Some(&previous_stack), Some(&previous_model)),
            map(&[("shared", "model"), ("stack", "old")])
        );

        let desired_stack = map(&[("stack", "new")]);
        let desired_model = vec![Tag::new("app", "api")];
        assert_eq!(
            new_desired(Some(&desired_model), Some(&desired_stack)),
            map(&[("app", "api"), ("stack", "new")])
        );
    }

    #[test]
    fn test_to_model_tags() {
        assert_eq!(to_model_tags(&TagMap::new()), None);
        assert_eq!(
            to_model_tags(&map(&[("b", "2"), ("a", "1")])),
            Some(vec![Tag::new("a", "1"), Tag::new("b", "2")])
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn tag_map_strategy() -> impl Strategy<Value = TagMap> {
            prop::collection::btree_map("[a-e]{1,2}", "[x-z]{0,2}", 0..8)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            #[test]
            fn prop_add_and_remove_are_disjoint(previous in tag_map_strategy(), desired in tag_map_strategy()) {
                let diff = TagDiff::between(&previous, &desired);
                for key in diff.to_add.keys() {
                    prop_assert!(!diff.to_remove.contains(key));
                }
            }

            /// With no key in common, everything desired is added and
            /// everything previous is removed.
            #[test]
            fn prop_disjoint_maps_add_all_and_remove_all(
                previous in prop::collection::btree_map("[a-e]{1,2}", "[x-z]{0,2}", 0..8),
                desired in prop::collection::btree_map("[f-j]{1,2}", "[x-z]{0,2}", 0..8),
            ) {
                let diff = TagDiff::between(&previous, &desired);
                prop_assert_eq!(&diff.to_add, &desired);
                prop_assert_eq!(diff.to_remove, previous.keys().cloned().collect::<BTreeSet<_>>());
            }

            #[test]
            fn prop_diff_of_identical_is_empty(tags in tag_map_strategy()) {
                prop_assert!(TagDiff::between(&tags, &tags).is_empty());
            }

            #[test]
            fn prop_apply_reaches_desired(previous in tag_map_strategy(), desired in tag_map_strategy()) {
                let diff = TagDiff::between(&previous, &desired);
                prop_assert_eq!(diff.apply(&previous), desired);
            }

            #[test]
            fn prop_removed_keys_are_sorted(previous in tag_map_strategy(), desired in tag_map_strategy()) {
                let keys = TagDiff::between(&previous, &desired).keys_to_remove();
                let mut sorted = keys.clone();
                sorted.sort();
                prop_assert_eq!(keys, sorted);
            }
        }
    }
}
