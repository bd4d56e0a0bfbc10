//! Property tests for side-effect idempotence.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use keel::application::SideEffectExecutor;
use keel::domain::entities::{OverwritePolicy, SideEffectDescriptor};
use keel::domain::ports::FileSystem;
use keel::infrastructure::MemoryFs;

// Directory and file paths never collide, so every list applies cleanly
const DIRS: &[&str] = &["/w/a", "/w/a/b", "/w/c"];
const FILES: &[&str] = &["/w/a/one.txt", "/w/a/b/two.txt", "/w/three.txt"];

fn effect() -> impl Strategy<Value = SideEffectDescriptor> {
    let contents = proptest::string::string_regex("[a-z]{0,6}").unwrap();
    prop_oneof![
        proptest::sample::select(DIRS).prop_map(SideEffectDescriptor::create_directory),
        (proptest::sample::select(FILES), proptest::string::string_regex("[a-z]{0,6}").unwrap())
            .prop_map(|(path, body)| SideEffectDescriptor::create_file(path, body)),
        (proptest::sample::select(FILES), contents)
            .prop_map(|(path, body)| SideEffectDescriptor::create_file_if_missing(path, body)),
        proptest::sample::select(DIRS).prop_map(SideEffectDescriptor::delete),
        proptest::sample::select(FILES).prop_map(SideEffectDescriptor::delete),
    ]
}

type Tree = (Vec<PathBuf>, Vec<(PathBuf, Vec<u8>)>);

fn snapshot(fs: &MemoryFs) -> Tree {
    let files = fs
        .files()
        .into_iter()
        .map(|path| {
            let content = fs.read(Path::new(&path)).unwrap();
            (path, content)
        })
        .collect();
    (fs.dirs(), files)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Applying a list twice leaves the same tree as applying it once.
    #[test]
    fn property_side_effects_are_idempotent(
        effects in proptest::collection::vec(effect(), 0..=12),
    ) {
        let fs = MemoryFs::new();

        SideEffectExecutor::new(&fs).execute(&effects).unwrap();
        let once = snapshot(&fs);

        SideEffectExecutor::new(&fs).execute(&effects).unwrap();
        prop_assert_eq!(snapshot(&fs), once);
    }

    /// PROPERTY: Directories and create-if-missing files apply only once.
    #[test]
    fn property_second_run_of_additive_effects_is_a_no_op(
        effects in proptest::collection::vec(effect(), 0..=12),
    ) {
        let effects: Vec<SideEffectDescriptor> = effects
            .into_iter()
            .filter(|e| {
                matches!(
                    e,
                    SideEffectDescriptor::CreateDirectory { .. }
                        | SideEffectDescriptor::CreateFile {
                            overwrite: OverwritePolicy::Skip,
                            ..
                        }
                )
            })
            .collect();
        let fs = MemoryFs::new();

        SideEffectExecutor::new(&fs).execute(&effects).unwrap();
        let second = SideEffectExecutor::new(&fs).execute(&effects).unwrap();

        prop_assert_eq!(second.applied_count(), 0);
    }
}
