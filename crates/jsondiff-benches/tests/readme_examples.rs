use jsondiff_benches::available_corpora;
use jsondiff_core::DiffOptions;

#[test]
fn jsondiff_benches_readme_example() {
    let corpus = available_corpora().iter().find(|c| c.name() == "nested-records").expect("registered corpus");
    let dataset = corpus.load();
    let diff = dataset.diff(&DiffOptions::default());
    assert!(!diff.is_empty());

    let patched = dataset.before().apply_patch(diff.patch().expect("patch output enabled")).expect("patch applies");
    assert_eq!(&patched, dataset.after());
}

#[test]
fn rearranging_shuffled_records_shrinks_the_diff() {
    let corpus = available_corpora().iter().find(|c| c.name() == "shuffled-records").expect("registered corpus");
    let dataset = corpus.load();
    let plain = dataset.diff(&DiffOptions::default());
    let rearranged = dataset.diff(&DiffOptions::default().with_rearrange_arrays(true));
    assert!(rearranged.diff_count() < plain.diff_count());
}
