use std::fs;
use std::path::Path;

use jsondiff_core::{DiffOptions, Node};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Fixture {
    original: Node,
    new: Node,
    #[serde(default)]
    options: DiffOptions,
    diff: serde_json::Value,
}

fn load_fixture(path: &Path) -> Fixture {
    let data = fs::read_to_string(path).expect("fixture should be readable");
    serde_json::from_str(&data).expect("fixture should deserialize")
}

#[test]
fn diff_golden_parity() {
    let fixtures_root = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/diff");
    let mut entries: Vec<_> = fs::read_dir(&fixtures_root)
        .expect("fixtures directory must exist")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    entries.sort();

    assert!(!entries.is_empty(), "expected at least one diff fixture under tests/fixtures/diff");

    for path in entries {
        let fixture = load_fixture(&path);
        let diff = fixture.original.diff(&fixture.new, &fixture.options);
        let actual = serde_json::to_value(&diff).expect("diff serializes");
        assert_eq!(actual, fixture.diff, "fixture {path:?}");

        if let Some(patch) = diff.patch() {
            let patched = fixture.original.apply_patch(patch).expect("patch applies");
            assert_eq!(&patched, diff.rearranged(), "patch round trip for {path:?}");
        }
    }
}
