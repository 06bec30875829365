use proptest::prelude::*;
use tierconf_fs::NormalizedPath;

proptest! {
    #[test]
    fn normalization_invariants(s in "\\PC*") {
        let path = NormalizedPath::new(&s);
        let as_str = path.as_str();

        prop_assert!(!as_str.contains('\\'));

        // Only a network prefix may start with a double slash
        let is_network = as_str.starts_with("//") && !as_str.starts_with("///");
        if is_network {
            prop_assert!(!as_str[2..].contains("//"));
        } else {
            prop_assert!(!as_str.contains("//"));
        }

        let roundtripped = NormalizedPath::new(path.to_native());
        prop_assert_eq!(&path, &roundtripped);
    }

    #[test]
    fn normalization_is_idempotent(s in "[a-z./\\\\]{0,24}") {
        let once = NormalizedPath::new(&s);
        let twice = NormalizedPath::new(once.as_str());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn joined_child_is_within_parent(a in "/[a-z]{1,8}(/[a-z]{1,8}){0,3}", b in "[a-z]{1,8}") {
        let parent = NormalizedPath::new(&a);
        let child = parent.join(&b);
        prop_assert!(child.is_within(&parent));
        prop_assert!(!parent.is_within(&child));
    }
}
