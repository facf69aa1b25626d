use super::*;

fn sample(id: &str, w: f64, h: f64) -> DiscoveredSample {
    DiscoveredSample::Ready(Sample {
        id: SampleId::new(id).unwrap(),
        size: RenderSize::new(w, h).unwrap(),
        handle: SampleHandle::new(id.to_string()),
    })
}

fn reference(name: &str) -> DiscoveredReference {
    DiscoveredReference::Ready(ReferenceImage {
        id: ReferenceId::parse(name).unwrap(),
        image: FrameRGBA::solid(1, 1, [0, 0, 0, 255]),
    })
}

#[test]
fn reference_id_splits_on_last_dash() {
    let id = ReferenceId::parse("Issues-issue_1169-75%").unwrap();
    assert_eq!(id.sample.as_str(), "Issues-issue_1169");
    assert_eq!(id.checkpoint, Checkpoint::ThreeQuarters);
    assert_eq!(id.to_string(), "Issues-issue_1169-75%");
}

#[test]
fn reference_id_rejects_bad_names() {
    assert!(ReferenceId::parse("Spin").is_err());
    assert!(ReferenceId::parse("Spin-33%").is_err());
    assert!(ReferenceId::parse("-50%").is_err());
}

#[test]
fn listings_are_sorted_and_stable() {
    let idx = CorpusIndex::from_parts(
        vec![sample("b", 1.0, 1.0), sample("a", 1.0, 1.0)],
        vec![reference("b-0%"), reference("a-100%"), reference("a-0%")],
    )
    .unwrap();

    let ids: Vec<&str> = idx.list_samples().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    let refs: Vec<String> = idx
        .list_reference_images()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(refs, vec!["a-0%", "a-100%", "b-0%"]);

    let again: Vec<String> = idx
        .list_reference_images()
        .map(|r| r.id.to_string())
        .collect();
    assert_eq!(refs, again);
}

#[test]
fn unparsable_samples_still_count_as_corpus_members() {
    let idx = CorpusIndex::from_parts(
        vec![
            sample("ok", 1.0, 1.0),
            DiscoveredSample::Unparsable {
                id: SampleId::new("broken").unwrap(),
                reason: "expected value".to_string(),
            },
        ],
        vec![],
    )
    .unwrap();

    assert!(idx.contains_sample("broken"));
    assert!(idx.sample("broken").is_none());
    assert_eq!(idx.unparsable_reason("broken"), Some("expected value"));
    assert_eq!(idx.sample_count(), 2);
    let ids: Vec<&str> = idx.sample_ids().iter().map(|s| s.as_str()).collect();
    assert_eq!(ids, vec!["broken", "ok"]);
}

#[test]
fn duplicate_ids_keep_the_first_entry() {
    let idx = CorpusIndex::from_parts(
        vec![
            sample("a", 1.0, 1.0),
            sample("a", 2.0, 2.0),
            sample("b", 1.0, 1.0),
        ],
        vec![reference("a-0%"), reference("a-0%")],
    )
    .unwrap();

    assert_eq!(idx.sample_count(), 2);
    assert_eq!(
        idx.sample("a").unwrap().size,
        RenderSize::new(1.0, 1.0).unwrap()
    );
    let rejected: Vec<(&str, &str)> = idx.rejected_samples().collect();
    assert_eq!(rejected, vec![("a", "duplicate sample id 'a'")]);

    assert_eq!(idx.reference_count(), 1);
    let malformed: Vec<&str> = idx.malformed_references().map(|(n, _)| n).collect();
    assert_eq!(malformed, vec!["a-0%"]);
}

#[test]
fn rejected_samples_are_not_corpus_members() {
    let idx = CorpusIndex::from_parts(
        vec![
            sample("ok", 1.0, 1.0),
            DiscoveredSample::Rejected {
                name: "bad\\name.json".to_string(),
                reason: "path separator".to_string(),
            },
        ],
        vec![],
    )
    .unwrap();
    assert_eq!(idx.sample_count(), 1);
    assert_eq!(idx.rejected_samples().count(), 1);
}

#[test]
fn load_propagates_provider_failure() {
    struct Down;
    impl SampleProvider for Down {
        fn discover_samples(&self) -> SnapshotResult<Vec<DiscoveredSample>> {
            Err(SnapshotError::corpus_unavailable("disk gone"))
        }
    }

    let err = CorpusIndex::load(&Down, &Vec::<DiscoveredReference>::new()).unwrap_err();
    assert!(matches!(err, SnapshotError::CorpusUnavailable(_)));
}

#[test]
fn handle_downcasts_to_stored_type() {
    let h = SampleHandle::new(42u32);
    assert_eq!(h.downcast_ref::<u32>(), Some(&42));
    assert!(h.downcast_ref::<String>().is_none());
}
