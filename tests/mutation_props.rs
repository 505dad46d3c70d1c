mod common;

use common::{assert_reopen_matches, canonical, config, fasta_file};
use fastadb::{FastaStore, OpenMode};
use proptest::prelude::*;

fn sequence_strategy(max: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            4 => Just('A'), 4 => Just('C'), 4 => Just('G'), 4 => Just('T'),
            3 => Just('N'), 2 => Just('X'), 1 => Just('R'),
        ],
        0..max,
    )
    .prop_map(|bases| bases.into_iter().collect())
}

fn model_stats(sequence: &str) -> (u64, u64, u64, u64) {
    let length = sequence.len() as u64;
    let gc = sequence.chars().filter(|c| matches!(c, 'G' | 'C')).count() as u64;
    let ambiguous = sequence
        .chars()
        .filter(|c| matches!(c, 'X' | 'N' | 'R' | 'Y' | 'M' | 'K'))
        .count() as u64;
    let mut excluded = 0;
    let mut run = 0;
    for c in sequence.chars().chain(std::iter::once('A')) {
        if matches!(c, 'X' | 'N') {
            run += 1;
        } else {
            if run >= 20 {
                excluded += run;
            }
            run = 0;
        }
    }
    (length, gc, length - ambiguous, length - excluded)
}

fn open_store(records: &[(&str, &str)], width: usize, distance: u64) -> (tempfile::NamedTempFile, FastaStore) {
    let file = fasta_file(&canonical(records, width));
    let store = FastaStore::open(
        config(&file, OpenMode::ReadWrite)
            .with_line_width(width)
            .with_index_distance(distance),
    )
    .expect("open fixture");
    (file, store)
}

#[derive(Debug, Clone)]
struct Edit {
    record: usize,
    // Fractions of the current length, resolved when the edit is applied.
    start: f64,
    span: f64,
    replacement: String,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    (0usize..3, 0.0f64..=1.0, 0.0f64..=1.0, sequence_strategy(40)).prop_map(
        |(record, start, span, replacement)| Edit {
            record,
            start,
            span,
            replacement,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn edits_match_in_memory_model(
        initial in proptest::collection::vec(sequence_strategy(120), 3),
        edits in proptest::collection::vec(edit_strategy(), 1..12),
        width in 1usize..16,
        distance in 1u64..40,
    ) {
        let ids = ["a", "b", "c"];
        let records: Vec<(&str, &str)> = ids.iter().copied().zip(initial.iter().map(String::as_str)).collect();
        let (_file, mut store) = open_store(&records, width, distance);
        let mut model = initial.clone();

        for edit in &edits {
            let current = &mut model[edit.record];
            let length = current.len() as u64;
            let offset = (edit.start * length as f64) as u64;
            let span = ((edit.span * (length - offset) as f64) as u64).min(length - offset);

            let old = store
                .set_substr(ids[edit.record], offset, Some(span), &edit.replacement)
                .expect("edit succeeds");
            let range = offset as usize..(offset + span) as usize;
            prop_assert_eq!(&old, &current[range.clone()]);
            current.replace_range(range, &edit.replacement);

            for (id, expected) in ids.iter().zip(&model) {
                prop_assert_eq!(&store.get_sequence(id).unwrap(), expected);
                let (length, gc, subt, xn) = model_stats(expected);
                prop_assert_eq!(store.get_seq_length(Some(*id)).unwrap(), length);
                prop_assert_eq!(store.get_gc_length(Some(*id)).unwrap(), gc);
                prop_assert_eq!(store.get_subt_length(Some(*id)).unwrap(), subt);
                prop_assert_eq!(store.get_xn_length(Some(*id)).unwrap(), xn);
            }
        }
        assert_reopen_matches(&store);
    }

    #[test]
    fn set_substr_round_trips(
        sequence in sequence_strategy(200),
        start in 0.0f64..=1.0,
        span in 0.0f64..=1.0,
        replacement in sequence_strategy(60),
        width in 1usize..20,
    ) {
        let (_file, mut store) = open_store(&[("s", sequence.as_str()), ("t", "ACGT")], width, 16);
        let length = sequence.len() as u64;
        let offset = (start * length as f64) as u64;
        let span = ((span * (length - offset) as f64) as u64).min(length - offset);

        let old = store.set_substr("s", offset, Some(span), &replacement).unwrap();
        store
            .set_substr("s", offset, Some(replacement.len() as u64), &old)
            .unwrap();
        prop_assert_eq!(store.get_sequence("s").unwrap(), sequence.clone());
        prop_assert_eq!(store.get_xn_length(Some("s")).unwrap(), model_stats(&sequence).3);
        prop_assert_eq!(store.get_sequence("t").unwrap(), "ACGT");
    }

    #[test]
    fn extract_and_reinsert_chunks_in_any_order(
        sequence in sequence_strategy(150),
        cuts in proptest::collection::vec(0.0f64..=1.0, 0..6),
        order in any::<u64>(),
        width in 1usize..12,
    ) {
        let length = sequence.len();
        let mut bounds: Vec<usize> = cuts.iter().map(|f| (f * length as f64) as usize).collect();
        bounds.push(0);
        bounds.push(length);
        bounds.sort_unstable();
        bounds.dedup();
        let chunks: Vec<(u64, u64)> = bounds
            .windows(2)
            .map(|pair| (pair[0] as u64, (pair[1] - pair[0]) as u64))
            .collect();

        let mut permutation: Vec<usize> = (0..chunks.len()).collect();
        let mut seed = order;
        for i in (1..permutation.len()).rev() {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
            permutation.swap(i, (seed >> 33) as usize % (i + 1));
        }

        let (_file, mut store) = open_store(&[("s", sequence.as_str())], width, 8);
        for &chunk in &permutation {
            let (offset, size) = chunks[chunk];
            let extracted = store.set_substr("s", offset, Some(size), "").unwrap();
            prop_assert_eq!(extracted.len() as u64, size);
            store.set_substr("s", offset, Some(0), &extracted).unwrap();
        }
        prop_assert_eq!(store.get_sequence("s").unwrap(), sequence.clone());

        // Rotate every chunk from the front to the back.
        for &(_, size) in &chunks {
            let moved = store.set_substr("s", 0, Some(size), "").unwrap();
            let end = store.get_seq_length(Some("s")).unwrap();
            store.set_substr("s", end, Some(0), &moved).unwrap();
        }
        prop_assert_eq!(store.get_sequence("s").unwrap(), sequence);
        assert_reopen_matches(&store);
    }
}
