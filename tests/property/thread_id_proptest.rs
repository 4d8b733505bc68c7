//! Property-based tests for thread identity
//!
//! Uses proptest to generate random user ids and verify that the derived
//! thread id names the unordered pair and nothing else.

use proptest::prelude::*;
use schoolhub::shared::derive_thread_id;

fn user_id() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}"
}

proptest! {
    #[test]
    fn test_thread_id_is_commutative(a in user_id(), b in user_id()) {
        prop_assert_eq!(derive_thread_id(&a, &b), derive_thread_id(&b, &a));
    }

    #[test]
    fn test_thread_id_identifies_the_pair(
        a in user_id(),
        b in user_id(),
        c in user_id(),
        d in user_id(),
    ) {
        let same_pair = (a == c && b == d) || (a == d && b == c);
        prop_assert_eq!(derive_thread_id(&a, &b) == derive_thread_id(&c, &d), same_pair);
    }

    #[test]
    fn test_thread_id_contains_both_ids(a in user_id(), b in user_id()) {
        let id = derive_thread_id(&a, &b);
        let mut parts: Vec<&str> = id.split(':').collect();
        let mut expected = vec![a.as_str(), b.as_str()];
        parts.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(parts, expected);
    }
}
