mod common;

use common::{quote, sample_quotes, work};
use highlight_export_core::aggregate::{aggregate, dedup_works, group_by_work};
use highlight_export_core::error::{ExportError, MalformedReason};

#[test]
fn works_are_unique_in_first_occurrence_order() {
    let works = dedup_works(&sample_quotes()).expect("aggregation should succeed");
    let ids: Vec<_> = works.iter().map(|w| w.uuid.as_str()).collect();
    assert_eq!(ids, vec!["W1", "W2"]);
}

#[test]
fn first_embedded_copy_of_a_work_wins() {
    let original = work("W1", "Original title");
    let mut renamed = original.clone();
    renamed.title = "Renamed later".to_string();
    renamed.state = None;

    let quotes = vec![
        quote("q1", Some(&original), 0, None),
        quote("q2", Some(&renamed), 1, None),
    ];
    let works = dedup_works(&quotes).unwrap();
    assert_eq!(works, vec![original], "later metadata must not be merged in");
}

#[test]
fn groups_keep_fetch_order_within_each_work() {
    let quotes = sample_quotes();
    let grouped = group_by_work(&quotes).unwrap();

    assert_eq!(grouped.len(), 2);
    for (work_id, group) in &grouped {
        let expected: Vec<_> = quotes
            .iter()
            .filter(|q| q.book.as_ref().map(|b| &b.uuid) == Some(work_id))
            .cloned()
            .collect();
        assert_eq!(group, &expected, "group for {work_id} must be the input subsequence");
    }
    let foo_ids: Vec<_> = grouped["W1"].iter().map(|q| q.uuid.as_str()).collect();
    assert_eq!(foo_ids, vec!["q1", "q2"]);
}

#[test]
fn aggregation_is_idempotent() {
    let quotes = sample_quotes();
    let first = aggregate(&quotes).unwrap();
    let second = aggregate(&quotes).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_work_in_the_list_has_quotes() {
    let aggregation = aggregate(&sample_quotes()).unwrap();
    for work in &aggregation.works {
        assert!(
            !aggregation.quotes_for(work).is_empty(),
            "{} should have quotes",
            work.uuid
        );
    }
}

#[test]
fn quote_without_work_is_a_malformed_record() {
    let foo = work("W1", "Foo");
    let quotes = vec![quote("q1", Some(&foo), 0, None), quote("orphan", None, 0, None)];

    for result in [
        dedup_works(&quotes).map(|_| ()),
        group_by_work(&quotes).map(|_| ()),
        aggregate(&quotes).map(|_| ()),
    ] {
        match result {
            Err(ExportError::MalformedRecord { quote_id, reason }) => {
                assert_eq!(quote_id, "orphan");
                assert_eq!(reason, MalformedReason::MissingWork);
            }
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }
}

#[test]
fn empty_input_yields_empty_aggregation() {
    let aggregation = aggregate(&[]).unwrap();
    assert!(aggregation.works.is_empty());
    assert!(aggregation.grouped.is_empty());
}
