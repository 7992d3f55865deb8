//! Fuzzing harnesses for `jsondiff-core`.
//!
//! Each public function accepts raw bytes so it can be driven from
//! `cargo fuzz` targets and from plain tests. Decoding failures are ignored;
//! broken diff or patch invariants panic.
//!
//! # Examples
//!
//! ```
//! jsondiff_fuzz::fuzz_canonicalization(b"{\"a\":1}");
//! jsondiff_fuzz::fuzz_diff(&[1, 2, 3, 4]);
//! jsondiff_fuzz::fuzz_patch(b"[{\"op\":\"remove\",\"path\":\"/0\"}]");
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use arbitrary::Unstructured;
use jsondiff_core::{DiffOptions, Node, Patch};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

const MAX_DEPTH: usize = 4;
const MAX_ARRAY_LEN: u8 = 6;
const MAX_OBJECT_LEN: u8 = 6;
const MAX_STRING_LEN: u8 = 8;

/// Feeds arbitrary bytes through the JSON and YAML decoders.
///
/// ```
/// jsondiff_fuzz::fuzz_canonicalization(b"{\"key\":\"value\"}");
/// ```
pub fn fuzz_canonicalization(data: &[u8]) {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(node) = Node::from_json_str(text) {
            let reparsed = Node::from_json_str(&node.to_json_string());
            assert_eq!(reparsed.ok().as_ref(), Some(&node), "JSON text must round-trip");
        }
        let _ = Node::from_yaml_str(text);
    }
}

/// Diffs two generated documents under generated options and checks that
/// the emitted patch reproduces the target. The merge patch is checked too
/// when both documents are null-free objects, the only inputs a merge patch
/// can round-trip.
///
/// ```
/// jsondiff_fuzz::fuzz_diff(b"seed");
/// ```
pub fn fuzz_diff(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let Ok(flags) = unstructured.arbitrary::<u8>() else {
        return;
    };
    let Some(lhs) = random_node(&mut unstructured) else {
        return;
    };
    let Some(rhs) = random_node(&mut unstructured) else {
        return;
    };

    let options = DiffOptions::default()
        .with_rearrange_arrays(flags & 0b0001 != 0)
        .with_uri_fragment_id(flags & 0b0010 != 0);
    let diff = lhs.diff(&rhs, &options);
    assert_eq!(
        diff.diff_count(),
        diff.removed_paths().len() + diff.added_paths().len() + diff.modified_paths().len()
    );

    if let Some(patch) = diff.patch() {
        let patched = lhs.apply_patch(patch).expect("generated patch applies");
        assert_eq!(&patched, diff.rearranged(), "patch must reproduce the target");

        let reimported = Patch::import(&patch.export()).expect("exported patch imports");
        assert_eq!(&reimported, patch);
    }

    if let Some(merge) = diff.merge_patch() {
        if lhs.is_object() && rhs.is_object() && !contains_null(&lhs) && !contains_null(&rhs) {
            assert_eq!(&lhs.apply_merge_patch(merge), diff.rearranged(), "merge patch must reproduce the target");
        }
    }

    let quick = lhs.diff(&rhs, &options.with_stop_on_diff(true));
    assert_eq!(quick.is_empty(), diff.is_empty());
}

/// Imports the bytes as a patch document and applies it to a generated node,
/// then runs a generated diff's patch against the same node.
///
/// ```
/// jsondiff_fuzz::fuzz_patch(b"patch fuzz");
/// ```
pub fn fuzz_patch(data: &[u8]) {
    let mut unstructured = Unstructured::new(data);
    let seed = random_node(&mut unstructured);

    if let Ok(patch) = serde_json::from_slice::<JsonValue>(data)
        .map(Node::from_json_value)
        .map_err(drop)
        .and_then(|node| Patch::import(&node).map_err(drop))
    {
        let mut doc = seed.clone().unwrap_or(Node::Null);
        let _ = patch.apply(&mut doc);
    }

    if let (Some(base), Some(target)) = (seed, random_node(&mut unstructured)) {
        let diff = base.diff(&target, &DiffOptions::default().with_skip_json_merge_patch(true));
        if let Some(patch) = diff.patch() {
            let _ = target.apply_patch(patch);
        }
    }
}

fn contains_null(node: &Node) -> bool {
    match node {
        Node::Null => true,
        Node::Array(items) => items.iter().any(contains_null),
        Node::Object(map) => map.values().any(contains_null),
        _ => false,
    }
}

fn random_node(unstructured: &mut Unstructured<'_>) -> Option<Node> {
    json_value_from_unstructured(unstructured, 0).ok().map(Node::from_json_value)
}

fn json_value_from_unstructured(
    unstructured: &mut Unstructured<'_>,
    depth: usize,
) -> Result<JsonValue, arbitrary::Error> {
    if depth >= MAX_DEPTH {
        return json_leaf(unstructured);
    }

    let choice = unstructured.int_in_range::<u8>(0..=5)?;
    match choice {
        0..=3 => json_leaf_of(unstructured, choice),
        4 => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_ARRAY_LEN)?);
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(json_value_from_unstructured(unstructured, depth + 1)?);
            }
            Ok(JsonValue::Array(items))
        }
        _ => {
            let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_OBJECT_LEN)?);
            let mut map = JsonMap::new();
            for _ in 0..len {
                let key = random_string(unstructured)?;
                let value = json_value_from_unstructured(unstructured, depth + 1)?;
                map.insert(key, value);
            }
            Ok(JsonValue::Object(map))
        }
    }
}

fn json_leaf(unstructured: &mut Unstructured<'_>) -> Result<JsonValue, arbitrary::Error> {
    let choice = unstructured.int_in_range::<u8>(0..=3)?;
    json_leaf_of(unstructured, choice)
}

fn json_leaf_of(unstructured: &mut Unstructured<'_>, choice: u8) -> Result<JsonValue, arbitrary::Error> {
    match choice {
        0 => Ok(JsonValue::Null),
        1 => Ok(JsonValue::Bool(unstructured.arbitrary()?)),
        2 => Ok(JsonValue::Number(random_number(unstructured)?)),
        _ => Ok(JsonValue::String(random_string(unstructured)?)),
    }
}

fn random_number(unstructured: &mut Unstructured<'_>) -> Result<JsonNumber, arbitrary::Error> {
    if unstructured.arbitrary()? {
        let int = unstructured.int_in_range::<i64>(-16..=16)?;
        Ok(JsonNumber::from(int))
    } else {
        let numerator = f64::from(unstructured.arbitrary::<i32>()?);
        let denominator = f64::from(unstructured.int_in_range::<u16>(1..=1024)?);
        JsonNumber::from_f64(numerator / denominator).ok_or(arbitrary::Error::IncorrectFormat)
    }
}

/// Short strings over a small alphabet so keys collide and escapes appear.
fn random_string(unstructured: &mut Unstructured<'_>) -> Result<String, arbitrary::Error> {
    const ALPHABET: &[u8] = b"ab01~/ %";
    let len = usize::from(unstructured.int_in_range::<u8>(0..=MAX_STRING_LEN)?);
    let mut string = String::with_capacity(len);
    for _ in 0..len {
        string.push(char::from(*unstructured.choose(ALPHABET)?));
    }
    Ok(string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalization_handles_utf8() {
        fuzz_canonicalization(br#"{"a":[1,2.5,"x"]}"#);
        fuzz_canonicalization(&[0xff, 0xfe]);
    }

    #[test]
    fn diff_harness_runs() {
        fuzz_diff(b"diff");
        fuzz_diff(&(0..=255).collect::<Vec<u8>>());
    }

    #[test]
    fn diff_harness_survives_deterministic_inputs() {
        let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
        let mut next = || {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            (state >> 56) as u8
        };
        for _ in 0..2_000 {
            let data: Vec<u8> = (0..64).map(|_| next()).collect();
            fuzz_diff(&data);
        }
    }

    #[test]
    fn null_detection_descends_into_containers() {
        let node = Node::from_json_str(r#"{"a":[1,{"b":null}]}"#).unwrap();
        assert!(contains_null(&node));
        assert!(!contains_null(&Node::from_json_str(r#"{"a":[1,{"b":2}]}"#).unwrap()));
    }

    #[test]
    fn patch_harness_runs() {
        fuzz_patch(b"patch");
        fuzz_patch(br#"[{"op":"add","path":"/-","value":1}]"#);
    }
}
