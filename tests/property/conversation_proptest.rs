//! Property-based tests for conversations
//!
//! Random exchanges between a student and a teacher, replayed through the
//! messaging service over the in-memory store.

use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

use schoolhub::backend::messaging::{MessagingService, MessagingSettings};
use schoolhub::backend::store::{Collection, MemoryStore, RecordStore};

fn exchange() -> impl Strategy<Value = Vec<(bool, String)>> {
    prop::collection::vec((any::<bool>(), "[a-z ]{0,8}[a-z]"), 1..12)
}

async fn replay(turns: &[(bool, String)]) -> (MessagingService, String, String) {
    let store = Arc::new(MemoryStore::new());
    let student = store
        .insert(Collection::Students, json!({"name": "Sam"}).as_object().cloned().unwrap_or_default())
        .await
        .unwrap();
    let teacher = store
        .insert(Collection::Teachers, json!({"name": "Tess"}).as_object().cloned().unwrap_or_default())
        .await
        .unwrap();
    let service = MessagingService::new(store.clone(), store, MessagingSettings::default());

    for (from_student, content) in turns {
        let (sender, receiver) = if *from_student {
            (&student.id, &teacher.id)
        } else {
            (&teacher.id, &student.id)
        };
        service.send_message(sender, None, receiver, content).await.unwrap();
    }
    (service, student.id, teacher.id)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_conversation_is_symmetric_and_complete(turns in exchange()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let (service, student, teacher) = replay(&turns).await;

            let forward = service.get_conversation(&student, &teacher).await.unwrap();
            let backward = service.get_conversation(&teacher, &student).await.unwrap();
            prop_assert_eq!(&forward, &backward);

            let contents: Vec<String> = forward.iter().map(|m| m.content.clone()).collect();
            let sent: Vec<String> = turns.iter().map(|(_, c)| c.clone()).collect();
            prop_assert_eq!(contents, sent);
            prop_assert!(forward.windows(2).all(|w| w[0].created_at <= w[1].created_at));
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn test_summary_matches_newest_message(turns in exchange()) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let (service, student, teacher) = replay(&turns).await;

            let threads = service.list_threads(&teacher).await.unwrap();
            prop_assert_eq!(threads.len(), 1);
            let last = threads[0].last_message.clone().unwrap();
            let newest = service
                .get_conversation(&student, &teacher)
                .await
                .unwrap()
                .pop()
                .unwrap();
            prop_assert_eq!(last.content, newest.content);
            prop_assert_eq!(last.sent_at, newest.created_at);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
