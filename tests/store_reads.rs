mod common;

use common::{bases, config, fasta_file, open_ro, open_rw};
use fastadb::{FastaStore, OpenMode, StoreError};

const REFERENCE: &str = "ACCGTGTGTAGCTGTCGATGA";

#[test]
fn reference_record_reads_and_statistics() {
    let file = fasta_file(&format!(">ref sample\n{REFERENCE}\n"));
    let store = open_rw(&file);
    assert_eq!(store.get_substr("ref", 0, Some(3)).unwrap(), "ACC");
    assert_eq!(store.get_substr("ref", 18, None).unwrap(), "TGA");
    assert_eq!(store.get_gc_length(Some("ref")).unwrap(), 11);
    assert_eq!(store.get_subt_length(Some("ref")).unwrap(), 21);
    assert_eq!(store.get_xn_length(Some("ref")).unwrap(), 21);
    assert_eq!(store.get_sequence("ref").unwrap(), REFERENCE);
}

#[test]
fn substrings_match_in_memory_sequence_across_uneven_lines() {
    // Irregular line lengths force the reader to walk from checkpoints.
    let sequences = [bases(173, 10), bases(64, 11), bases(9, 12)];
    let mut input = String::new();
    for (n, sequence) in sequences.iter().enumerate() {
        input.push_str(&format!(">r{n}\n"));
        let mut rest = sequence.as_str();
        let mut width = 3;
        while !rest.is_empty() {
            let take = width.min(rest.len());
            input.push_str(&rest[..take]);
            input.push('\n');
            rest = &rest[take..];
            width = width % 17 + 4;
        }
    }
    let file = fasta_file(&input);
    let store = FastaStore::open(config(&file, OpenMode::ReadOnly).with_index_distance(7)).unwrap();

    for (n, sequence) in sequences.iter().enumerate() {
        let id = format!("r{n}");
        let total = sequence.len() as u64;
        assert_eq!(store.get_seq_length(Some(id.as_str())).unwrap(), total);
        for offset in (0..=total).step_by(5) {
            for length in [0, 1, 6, 25, 80] {
                if offset + length > total {
                    continue;
                }
                let expected = &sequence[offset as usize..(offset + length) as usize];
                assert_eq!(
                    store.get_substr(&id, offset, Some(length)).unwrap(),
                    expected,
                    "{id} at {offset}+{length}"
                );
            }
            assert_eq!(
                store.get_substr(&id, offset, None).unwrap(),
                &sequence[offset as usize..]
            );
        }
    }
}

#[test]
fn read_consistency_holds_for_every_record() {
    let file = fasta_file(">a\nACGTN\nNNX\n>b\n>c\nGGGGCCCC\nTT\n");
    let store = open_ro(&file);
    for id in store.get_ids() {
        let length = store.get_seq_length(Some(id.as_str())).unwrap();
        assert_eq!(
            store.get_sequence(&id).unwrap(),
            store.get_substr(&id, 0, Some(length)).unwrap()
        );
        let record = store.record(&id).unwrap();
        assert!(record.gc_length <= record.length);
        assert!(record.subt_length <= record.length);
        assert!(record.xn_length <= record.length);
    }
    assert_eq!(store.get_sequence("b").unwrap(), "");
}

#[test]
fn out_of_range_reads_are_rejected() {
    let file = fasta_file(&format!(">ref\n{REFERENCE}\n"));
    let store = open_ro(&file);
    assert!(matches!(
        store.get_substr("ref", 20, Some(2)),
        Err(StoreError::OutOfRange {
            offset: 20,
            length: 2,
            record_length: 21,
            ..
        })
    ));
    assert!(store.get_substr("ref", 22, None).is_err());
    assert_eq!(store.get_substr("ref", 21, None).unwrap(), "");
}

#[test]
fn unknown_identifiers_are_rejected() {
    let file = fasta_file(&format!(">ref\n{REFERENCE}\n"));
    let store = open_ro(&file);
    assert!(matches!(
        store.get_sequence("missing"),
        Err(StoreError::UnknownId(id)) if id == "missing"
    ));
    assert!(store.get_seq_length(Some("missing")).is_err());
    assert!(store.get_description("missing").is_err());
    assert!(!store.exists("missing"));
    assert!(store.exists("ref"));
}

#[test]
fn catalog_queries_preserve_file_order() {
    let file = fasta_file(">z last\nA\n>a first\nC\n>m\nG\n");
    let store = open_ro(&file);
    let count: u64 = store.get_seq_count();
    assert_eq!(count, 3);
    assert_eq!(store.get_ids(), vec!["z", "a", "m"]);
    assert_eq!(store.get_descriptors(), vec!["z last", "a first", "m"]);
    let ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
    assert_eq!(store.config().mode, OpenMode::ReadOnly);
}
