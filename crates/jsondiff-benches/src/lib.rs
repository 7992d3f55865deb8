//! Synthetic corpora for benchmarking `jsondiff-core`.
//!
//! Every corpus is generated deterministically, so runs are comparable
//! without checked-in fixtures.
//!
//! # Examples
//!
//! ```
//! use jsondiff_benches::available_corpora;
//! use jsondiff_core::DiffOptions;
//!
//! let corpus = available_corpora().iter().find(|c| c.name() == "flat-object").unwrap();
//! let dataset = corpus.load();
//! assert!(!dataset.diff(&DiffOptions::default()).is_empty());
//! ```
#![forbid(unsafe_code)]
#![warn(missing_docs)]

use jsondiff_core::{Diff, DiffOptions, Node, Number, Object};

/// A named generator for a before/after document pair.
#[derive(Debug)]
pub struct Corpus {
    name: &'static str,
    size: usize,
    build: fn(usize) -> Dataset,
}

impl Corpus {
    /// Short identifier used as the benchmark id.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Generates the document pair.
    pub fn load(&self) -> Dataset {
        (self.build)(self.size)
    }

    /// Combined size of both documents serialized as compact JSON.
    pub fn fixture_bytes(&self) -> usize {
        let dataset = self.load();
        dataset.before.to_json_string().len() + dataset.after.to_json_string().len()
    }
}

/// Two documents to diff.
#[derive(Clone, Debug)]
pub struct Dataset {
    before: Node,
    after: Node,
}

impl Dataset {
    /// The original document.
    pub fn before(&self) -> &Node {
        &self.before
    }

    /// The new document.
    pub fn after(&self) -> &Node {
        &self.after
    }

    /// Diffs `before` against `after`.
    pub fn diff(&self, options: &DiffOptions) -> Diff {
        self.before.diff(&self.after, options)
    }
}

static CORPORA: [Corpus; 3] = [
    Corpus { name: "flat-object", size: 2_000, build: flat_object },
    Corpus { name: "nested-records", size: 300, build: nested_records },
    Corpus { name: "shuffled-records", size: 300, build: shuffled_records },
];

/// All registered corpora.
pub fn available_corpora() -> &'static [Corpus] {
    &CORPORA
}

fn int(value: usize) -> Node {
    Node::Number(Number::from(value as u64))
}

fn flat_object(size: usize) -> Dataset {
    let mut before = Object::new();
    let mut after = Object::new();
    for i in 0..size {
        before.insert(format!("key{i}"), int(i));
        match i % 10 {
            0 => {}
            1 => {
                after.insert(format!("key{i}"), Node::String(format!("value{i}")));
            }
            _ => {
                after.insert(format!("key{i}"), int(i));
            }
        }
    }
    for i in 0..size / 20 {
        after.insert(format!("extra{i}"), Node::Bool(i % 2 == 0));
    }
    Dataset { before: Node::Object(before), after: Node::Object(after) }
}

fn record(id: usize, revision: usize) -> Node {
    let mut tags = vec![Node::String("base".to_string())];
    if revision > 0 && id % 3 == 0 {
        tags.push(Node::String(format!("rev{revision}")));
    }
    let mut meta = Object::new();
    meta.insert("owner".to_string(), Node::String(format!("user{}", id % 17)));
    meta.insert("score".to_string(), int(id * 7 % 101 + revision * (id % 5)));
    let mut object = Object::new();
    object.insert("id".to_string(), int(id));
    object.insert("name".to_string(), Node::String(format!("item-{id}")));
    object.insert("tags".to_string(), Node::Array(tags));
    object.insert("meta".to_string(), Node::Object(meta));
    Node::Object(object)
}

fn records(ids: impl Iterator<Item = usize>, revision: usize) -> Node {
    let mut object = Object::new();
    object.insert("items".to_string(), Node::Array(ids.map(|id| record(id, revision)).collect()));
    Node::Object(object)
}

fn nested_records(size: usize) -> Dataset {
    Dataset {
        before: records(0..size, 0),
        after: records((0..size).filter(|id| id % 11 != 0).chain(size..size + size / 10), 1),
    }
}

fn shuffled_records(size: usize) -> Dataset {
    // stride must be coprime to size for this to be a permutation
    let stride = if size % 7 == 0 { 11 } else { 7 };
    Dataset { before: records(0..size, 0), after: records((0..size).map(|i| i * stride % size), 1) }
}
