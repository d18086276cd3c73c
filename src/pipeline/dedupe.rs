//! Dedup filter: suppress postings already notified in earlier runs.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::JobPosting;
use crate::store::SeenStore;

/// Filter postings down to those never surfaced before, preserving input
/// order, and mark every survivor as seen.
///
/// Intra-run duplicates (the same id fetched twice in one run, e.g. from
/// overlapping searches) are collapsed to their first occurrence. A storage
/// error aborts immediately: dedup correctness cannot be guaranteed without
/// the store.
pub async fn filter_new(
    postings: Vec<JobPosting>,
    store: &dyn SeenStore,
) -> Result<Vec<JobPosting>> {
    let mut new_postings = Vec::new();
    let mut run_ids = HashSet::new();

    for posting in postings {
        let id = posting.id();

        if store.has_seen(&id).await? {
            continue;
        }
        if !run_ids.insert(id.clone()) {
            continue;
        }

        store.mark_seen(&id, posting.first_seen).await?;
        new_postings.push(posting);
    }

    Ok(new_postings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonSeenStore;
    use chrono::Utc;
    use tempfile::TempDir;

    fn posting(title: &str, link: &str) -> JobPosting {
        JobPosting::new("Naukri", title, "Acme", "Pune", link)
    }

    async fn empty_store(dir: &TempDir) -> JsonSeenStore {
        JsonSeenStore::open(dir.path().join("seen_jobs.json"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_store_passes_everything() {
        let tmp = TempDir::new().unwrap();
        let store = empty_store(&tmp).await;

        let postings = vec![
            posting("A", "https://n.example/view?jobId=A1"),
            posting("B", "https://n.example/view?jobId=B1"),
            posting("C", "https://n.example/view?jobId=C1"),
        ];

        let new = filter_new(postings.clone(), &store).await.unwrap();
        assert_eq!(new.len(), 3);
        // Input order preserved.
        assert_eq!(new[0].title, "A");
        assert_eq!(new[2].title, "C");

        for p in &postings {
            assert!(store.has_seen(&p.id()).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_previously_seen_ids_are_suppressed() {
        let tmp = TempDir::new().unwrap();
        let store = empty_store(&tmp).await;

        let a = posting("A", "https://n.example/view?jobId=A1");
        let b = posting("B", "https://n.example/view?jobId=B1");
        store.mark_seen(&a.id(), Utc::now()).await.unwrap();

        let new = filter_new(vec![a.clone(), b.clone()], &store).await.unwrap();
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].title, "B");

        assert!(store.has_seen(&a.id()).await.unwrap());
        assert!(store.has_seen(&b.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_second_run_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = empty_store(&tmp).await;

        let postings = vec![
            posting("A", "https://n.example/view?jobId=A1"),
            posting("B", "https://n.example/view?jobId=B1"),
        ];

        let first = filter_new(postings.clone(), &store).await.unwrap();
        assert_eq!(first.len(), 2);

        let second = filter_new(postings, &store).await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_intra_run_duplicates_collapse() {
        let tmp = TempDir::new().unwrap();
        let store = empty_store(&tmp).await;

        let a = posting("A", "https://n.example/view?jobId=A1");
        let new = filter_new(vec![a.clone(), a.clone()], &store).await.unwrap();
        assert_eq!(new.len(), 1);
    }

    #[tokio::test]
    async fn test_input_order_does_not_change_marked_set() {
        let tmp1 = TempDir::new().unwrap();
        let tmp2 = TempDir::new().unwrap();
        let store1 = empty_store(&tmp1).await;
        let store2 = empty_store(&tmp2).await;

        let a = posting("A", "https://n.example/view?jobId=A1");
        let b = posting("B", "https://n.example/view?jobId=B1");

        filter_new(vec![a.clone(), b.clone()], &store1).await.unwrap();
        filter_new(vec![b.clone(), a.clone()], &store2).await.unwrap();

        for p in [&a, &b] {
            assert!(store1.has_seen(&p.id()).await.unwrap());
            assert!(store2.has_seen(&p.id()).await.unwrap());
        }
        assert_eq!(
            store1.record_count().await.unwrap(),
            store2.record_count().await.unwrap()
        );
    }
}
