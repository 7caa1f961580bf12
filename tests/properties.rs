use ordered_map::{Direction, Map};
use proptest::prelude::*;

fn keys_and_values() -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((-500i32..500, any::<i32>()), 0..200)
}

proptest! {
    #[test]
    fn put_if_absent_is_idempotent(pairs in keys_and_values(), extra_key in -500i32..500, extra_value in any::<i32>()) {
        let mut map = Map::new();
        for (k, v) in pairs {
            map.insert(k, v).unwrap();
        }
        let already_present = map.contains_key(&extra_key);

        let first_attempt = map.put_if_absent(extra_key, extra_value).unwrap();
        prop_assert_eq!(first_attempt, !already_present);
        let value_after_first = map.get(&extra_key).copied();

        let second_attempt = map.put_if_absent(extra_key, extra_value.wrapping_add(1)).unwrap();
        prop_assert!(!second_attempt);
        prop_assert_eq!(map.get(&extra_key).copied(), value_after_first);
        prop_assert!(map.validate());
    }

    #[test]
    fn overwriting_insert_returns_previous_value(key in -500i32..500, v1 in any::<i32>(), v2 in any::<i32>()) {
        let mut map = Map::new();
        let first = map.insert(key, v1).unwrap();
        prop_assert_eq!(first, None);
        let second = map.insert(key, v2).unwrap();
        prop_assert_eq!(second, Some(v1));
        prop_assert_eq!(map.get(&key).copied(), Some(v2));
        prop_assert_eq!(map.len(), 1);
    }

    #[test]
    fn insert_remove_is_inverse(pairs in keys_and_values()) {
        let mut map = Map::new();
        let mut inserted_keys = Vec::new();
        for (k, v) in &pairs {
            map.insert(*k, *v).unwrap();
            inserted_keys.push(*k);
        }
        let len_before = map.len();
        for k in inserted_keys.iter().rev() {
            if map.contains_key(k) {
                map.remove(k).unwrap();
            }
        }
        prop_assert!(map.is_empty());
        prop_assert!(map.validate());
        let _ = len_before;
    }

    #[test]
    fn copy_is_independent_under_arbitrary_mutation(pairs in keys_and_values(), mutate_key in -500i32..500, mutate_value in any::<i32>()) {
        let mut map = Map::new();
        for (k, v) in &pairs {
            map.insert(*k, *v).unwrap();
        }
        let snapshot = map.copy().unwrap();
        let before = snapshot.get(&mutate_key).copied();

        map.insert(mutate_key, mutate_value).unwrap();
        map.remove(&mutate_key).ok();

        prop_assert_eq!(snapshot.get(&mutate_key).copied(), before);
        prop_assert!(snapshot.validate());
    }

    #[test]
    fn forward_and_backward_traversal_are_reverses(pairs in keys_and_values()) {
        let mut map = Map::new();
        for (k, v) in pairs {
            map.insert(k, v).unwrap();
        }
        let forward: Vec<i32> = map.cursor(Direction::Forward).map(|(k, _)| *k).collect();
        let mut backward: Vec<i32> = map.cursor(Direction::Backward).map(|(k, _)| *k).collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn min_and_max_agree_with_full_traversal(pairs in keys_and_values()) {
        let mut map = Map::new();
        for (k, v) in pairs {
            map.insert(k, v).unwrap();
        }
        let all: Vec<i32> = map.cursor(Direction::Forward).map(|(k, _)| *k).collect();
        prop_assert_eq!(map.min_key().copied(), all.first().copied());
        prop_assert_eq!(map.max_key().copied(), all.last().copied());
    }

    #[test]
    fn failed_insert_on_duplicate_key_with_error_leaves_map_untouched(key in -500i32..500, v1 in any::<i32>()) {
        let mut map = Map::new();
        map.insert(key, v1).unwrap();
        let len_before = map.len();
        let snapshot_value = map.get(&key).copied();

        // `replace` on a key that is NOT present must fail without mutating anything.
        let missing_key = key.wrapping_add(10_000);
        let result = map.replace(&missing_key, v1);
        prop_assert!(result.is_err());
        prop_assert_eq!(map.len(), len_before);
        prop_assert_eq!(map.get(&key).copied(), snapshot_value);
        prop_assert!(map.validate());
    }
}
