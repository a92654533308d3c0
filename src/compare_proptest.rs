//! Property-based tests for directory comparison.
//!
//! These tests generate random trees on disk and verify that the
//! comparison invariants hold regardless of tree shape.

#[cfg(test)]
mod proptest_tests {
    use crate::compare::{clone_directory, compare_directories, DifferenceKind};
    use proptest::prelude::*;
    use std::collections::{BTreeMap, HashSet};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Relative file paths like `ab/cd/ef.txt`. Directory segments never end
    /// in `.txt`, so a generated file can never collide with a directory.
    fn tree_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
        let path = ("([a-z]{1,4}/){0,3}", "[a-z]{1,4}")
            .prop_map(|(dirs, file)| format!("{}{}.txt", dirs, file));
        prop::collection::btree_map(path, prop::collection::vec(any::<u8>(), 0..64), 1..12)
    }

    fn materialize(root: &Path, tree: &BTreeMap<String, Vec<u8>>) {
        fs::create_dir_all(root).unwrap();
        for (relative, content) in tree {
            let path = root.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: a tree compared with its clone has no differences
        #[test]
        fn identical_trees_compare_empty(tree in tree_strategy()) {
            let temp = TempDir::new().unwrap();
            let left = temp.path().join("left");
            let right = temp.path().join("right");
            materialize(&left, &tree);
            clone_directory(&left, &right).unwrap();

            let differences = compare_directories(&left, &right, &HashSet::new()).unwrap();
            prop_assert!(differences.is_empty(), "unexpected: {:?}", differences);
        }

        /// Property: every reported pair shares the same suffix under each root
        #[test]
        fn pairs_share_relative_suffix(
            left_tree in tree_strategy(),
            right_tree in tree_strategy(),
        ) {
            let temp = TempDir::new().unwrap();
            let left = temp.path().join("left");
            let right = temp.path().join("right");
            materialize(&left, &left_tree);
            materialize(&right, &right_tree);

            for difference in compare_directories(&left, &right, &HashSet::new()).unwrap() {
                let left_suffix = difference.left.strip_prefix(&left).unwrap();
                let right_suffix = difference.right.strip_prefix(&right).unwrap();
                prop_assert_eq!(left_suffix, right_suffix);
            }
        }

        /// Property: changing one file yields exactly one content difference
        /// plus one subdirectory record per enclosing directory
        #[test]
        fn one_changed_file_is_reported_once(
            tree in tree_strategy(),
            pick in any::<prop::sample::Index>(),
        ) {
            let temp = TempDir::new().unwrap();
            let left = temp.path().join("left");
            let right = temp.path().join("right");
            materialize(&left, &tree);
            clone_directory(&left, &right).unwrap();

            let (relative, content) = tree.iter().nth(pick.index(tree.len())).unwrap();
            let mut changed = content.clone();
            changed.push(b'!');
            fs::write(right.join(relative), changed).unwrap();

            let differences = compare_directories(&left, &right, &HashSet::new()).unwrap();
            let content_diffs: Vec<_> = differences
                .iter()
                .filter(|d| d.kind == DifferenceKind::ContentDiffers)
                .collect();
            prop_assert_eq!(content_diffs.len(), 1);
            prop_assert_eq!(&content_diffs[0].left, &left.join(relative));

            let depth = Path::new(relative).components().count() - 1;
            prop_assert_eq!(differences.len(), depth + 1);
        }
    }
}
