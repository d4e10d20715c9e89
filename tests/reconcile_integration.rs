mod common;

use common::{FlakyStore, notes};
use futures::executor::block_on;
use proptest::prelude::*;
use scratch_core::domain::{Note, NoteCollection};
use scratch_core::reconcile::{WriteOutcome, commit, commit_with};
use scratch_core::search::{ReplaceSpec, find, replace};
use scratch_core::store::{MemoryStore, NoteStore, StoreError};
use std::collections::HashSet;
use std::time::Duration;

#[tokio::test]
async fn one_failure_keeps_the_rest() -> Result<(), scratch_core::ScratchError> {
    let seed = notes(&["milk one", "milk two", "milk three"]);
    let ids: Vec<_> = seed.iter().map(Note::id).collect();
    let canonical = NoteCollection::new(seed.clone())?;
    let store = FlakyStore::with_notes(seed).fail_on(ids[1]);

    let matches = find(&canonical, "milk");
    let candidates = replace::apply(&matches, &ReplaceSpec::new("milk", "tea")?);
    let result = commit(&canonical, candidates, &store).await;

    let confirmed: Vec<_> = result.outcomes.iter().map(WriteOutcome::is_confirmed).collect();
    assert_eq!(confirmed, vec![true, false, true]);
    assert_eq!(result.outcomes.failed_ids(), vec![ids[1]]);
    assert_eq!(result.outcomes.confirmed_count(), 2);
    assert_eq!(result.outcomes.failed_count(), 1);

    let contents: Vec<_> = result.collection.iter().map(Note::content).collect();
    assert_eq!(contents, vec!["tea one", "milk two", "tea three"]);
    assert_eq!(result.collection.ids(), ids);

    let stored = store.inner.get(ids[1]).await.unwrap();
    assert_eq!(stored.content(), "milk two");

    Ok(())
}

#[tokio::test]
async fn failed_outcome_carries_original_and_cause() -> Result<(), scratch_core::ScratchError> {
    let seed = notes(&["milk"]);
    let canonical = NoteCollection::new(seed.clone())?;
    let store = FlakyStore::with_notes(seed.clone()).fail_on(seed[0].id());

    let candidates = replace::apply(&find(&canonical, "milk"), &ReplaceSpec::new("milk", "tea")?);
    let result = commit(&canonical, candidates, &store).await;

    match &result.outcomes[0] {
        WriteOutcome::Failed { original, error } => {
            assert_eq!(original, &seed[0]);
            assert_eq!(error.id, seed[0].id());
            assert!(matches!(error.source, StoreError::Unavailable(_)));
            assert!(error.to_string().contains(&seed[0].id().to_string()));
        }
        WriteOutcome::Confirmed(_) => panic!("write should have failed"),
    }
    assert_eq!(result.collection, canonical);

    Ok(())
}

#[tokio::test]
async fn unmatched_notes_are_left_alone() -> Result<(), scratch_core::ScratchError> {
    let seed = notes(&["milk", "water", "more milk"]);
    let canonical = NoteCollection::new(seed.clone())?;
    let store = MemoryStore::with_notes(seed.clone());

    let candidates = replace::apply(&find(&canonical, "milk"), &ReplaceSpec::new("milk", "tea")?);
    let result = commit(&canonical, candidates, &store).await;

    assert_eq!(result.outcomes.len(), 2);
    assert_eq!(result.collection.as_slice()[1], seed[1]);
    assert_eq!(result.collection.as_slice()[2].content(), "more tea");
    Ok(())
}

#[tokio::test]
async fn writes_are_in_flight_together() -> Result<(), scratch_core::ScratchError> {
    let seed = notes(&["a milk", "b milk", "c milk", "d milk"]);
    let canonical = NoteCollection::new(seed.clone())?;
    let store = FlakyStore::with_notes(seed).rendezvous(4);

    let candidates = replace::apply(&find(&canonical, "milk"), &ReplaceSpec::new("milk", "tea")?);
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        commit(&canonical, candidates, &store),
    )
    .await
    .expect("writes were serialized");

    assert_eq!(result.outcomes.confirmed_count(), 4);
    Ok(())
}

#[tokio::test]
async fn merge_ignores_settle_order() -> Result<(), scratch_core::ScratchError> {
    let seed = notes(&["slow milk", "fast milk", "failing milk"]);
    let ids: Vec<_> = seed.iter().map(Note::id).collect();
    let canonical = NoteCollection::new(seed.clone())?;
    let store = FlakyStore::with_notes(seed)
        .delay(ids[0], Duration::from_millis(50))
        .delay(ids[2], Duration::from_millis(20))
        .fail_on(ids[2]);

    let candidates = replace::apply(&find(&canonical, "milk"), &ReplaceSpec::new("milk", "tea")?);
    let result = commit(&canonical, candidates, &store).await;

    let outcome_ids: Vec<_> = result.outcomes.iter().map(WriteOutcome::id).collect();
    assert_eq!(outcome_ids, ids);

    let contents: Vec<_> = result.collection.iter().map(Note::content).collect();
    assert_eq!(contents, vec!["slow tea", "fast tea", "failing milk"]);
    Ok(())
}

#[tokio::test]
async fn unchanged_candidates_are_still_written() -> Result<(), scratch_core::ScratchError> {
    let seed = notes(&["milk"]);
    let canonical = NoteCollection::new(seed)?;
    let store = MemoryStore::new();

    let candidates = replace::apply(&find(&canonical, "milk"), &ReplaceSpec::new("milk", "milk")?);
    let result = commit(&canonical, candidates, &store).await;

    assert_eq!(result.outcomes.confirmed_count(), 1);
    assert_eq!(store.list().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_candidate_list_is_a_valid_commit() -> Result<(), scratch_core::ScratchError> {
    let canonical = NoteCollection::new(notes(&["milk"]))?;
    let store = MemoryStore::new();

    let result = commit(&canonical, Vec::new(), &store).await;

    assert!(result.outcomes.is_empty());
    assert_eq!(result.collection, canonical);
    assert!(store.is_empty().await);
    Ok(())
}

proptest! {
    #[test]
    fn only_confirmed_positions_change(
        failing in prop::collection::vec(any::<bool>(), 1..10)
    ) {
        let seed: Vec<Note> = (0..failing.len()).map(|i| Note::new(format!("note {i} milk"))).collect();
        let canonical = NoteCollection::new(seed.clone()).unwrap();
        let rejected: HashSet<_> = seed
            .iter()
            .zip(&failing)
            .filter(|(_, fail)| **fail)
            .map(|(n, _)| n.id())
            .collect();

        let candidates = replace::apply(&find(&canonical, "milk"), &ReplaceSpec::new("milk", "tea").unwrap());
        let result = block_on(commit_with(&canonical, candidates, |note: Note| {
            let rejected = rejected.contains(&note.id());
            async move {
                if rejected {
                    Err(StoreError::Unavailable("down".to_string()))
                } else {
                    Ok(())
                }
            }
        }));

        prop_assert_eq!(result.outcomes.failed_count(), rejected.len());
        for (before, after) in canonical.iter().zip(result.collection.iter()) {
            prop_assert_eq!(before.id(), after.id());
            if rejected.contains(&before.id()) {
                prop_assert_eq!(before, after);
            } else {
                prop_assert_ne!(before.content(), after.content());
                prop_assert!(after.content().ends_with("tea"));
            }
        }
    }
}
