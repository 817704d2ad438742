//! # Overlapping Writers
//!
//! Duplicate submissions, an admin acting on a request the client has open,
//! and two sessions racing for the same signature.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use portal_runtime::{ErrorKind, GateAction, PortalError};
    use shared_types::{FolderRef, RequestId};
    use sp_02_client_records::ClientDocument;
    use sp_05_signature_capture::CommitOutcome;

    use crate::fixtures::*;

    fn primary_only() -> ClientDocument {
        ClientDocument {
            folder_id: FolderRef::new("F1"),
            ..ClientDocument::default()
        }
    }

    // =========================================================================
    // SUBMISSION GATE
    // =========================================================================

    #[tokio::test]
    async fn test_sign_in_flight_rejects_second_submission() {
        let (portal, store) = memory_portal([(smith(), primary_only())]);
        let request = portal
            .container
            .admin()
            .add_request(&smith(), "Deck Quote", None)
            .await
            .unwrap();
        let writes_before = store.write_calls();

        let mut session = portal.session(&smith()).await;
        session.open_request(&request.id).unwrap();
        scribble(session.begin_signing().unwrap());

        let held = portal
            .container
            .gate
            .try_acquire(&smith(), GateAction::Sign)
            .unwrap();
        let err = session.sign().await.unwrap_err();
        assert!(matches!(err, PortalError::Busy { .. }));
        assert_eq!(err.kind(), ErrorKind::Busy);
        assert_eq!(store.write_calls(), writes_before);
        assert!(session.capture().is_some());

        drop(held);
        let outcome = session.sign().await.unwrap();
        assert!(matches!(outcome, CommitOutcome::Committed(_)));
        assert!(!portal.container.gate.is_busy(&smith(), GateAction::Sign));
    }

    #[tokio::test]
    async fn test_admin_write_busy_only_for_same_action() {
        let (portal, _) = memory_portal([(smith(), primary_only())]);
        let admin = portal.container.admin();

        let _held = portal
            .container
            .gate
            .try_acquire(&smith(), GateAction::AddRequest)
            .unwrap();
        let err = admin
            .add_request(&smith(), "Deck Quote", None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Busy);

        // Other actions on the same client go through.
        assert!(admin.toggle_legacy_signature(&smith()).await.is_ok());
    }

    // =========================================================================
    // RECONCILIATION
    // =========================================================================

    #[tokio::test]
    async fn test_admin_cancel_while_viewing_returns_to_main() {
        let (portal, _) = memory_portal([(smith(), primary_only())]);
        let admin = portal.container.admin();
        let request = admin
            .add_request(&smith(), "Kitchen Quote", Some(FolderRef::new("F2")))
            .await
            .unwrap();

        let mut session = portal.session(&smith()).await;
        session.open_request(&request.id).unwrap();
        scribble(session.begin_signing().unwrap());

        assert!(admin.cancel_request(&smith(), &request.id).await.unwrap());
        assert!(session.refresh().await.unwrap());
        assert!(session.view_state().is_main());
        assert!(session.capture().is_none());
        assert!(session.pending().is_empty());
        assert_eq!(session.active_folder().as_str(), "F1");
    }

    #[tokio::test]
    async fn test_refresh_without_changes_keeps_drawing() {
        let (portal, _) = memory_portal([(smith(), primary_only())]);
        let admin = portal.container.admin();
        let first = admin.add_request(&smith(), "Deck Quote", None).await.unwrap();

        let mut session = portal.session(&smith()).await;
        session.open_request(&first.id).unwrap();
        scribble(session.begin_signing().unwrap());

        admin.add_request(&smith(), "Invoice", None).await.unwrap();
        assert!(!session.refresh().await.unwrap());
        assert!(session.capture().is_some());
        assert_eq!(session.pending().len(), 2);
    }

    #[tokio::test]
    async fn test_two_sessions_sign_same_request() {
        let (portal, store) = memory_portal([(smith(), primary_only())]);
        let request = portal
            .container
            .admin()
            .add_request(&smith(), "Deck Quote", None)
            .await
            .unwrap();

        let mut phone = portal.session(&smith()).await;
        let mut laptop = portal.session(&smith()).await;
        for session in [&mut phone, &mut laptop] {
            session.open_request(&request.id).unwrap();
            scribble(session.begin_signing().unwrap());
        }

        let first = phone.sign().await.unwrap();
        assert!(matches!(first, CommitOutcome::Committed(_)));
        let second = laptop.sign().await.unwrap();
        assert_eq!(second, CommitOutcome::AlreadyResolved);
        assert!(laptop.view_state().is_main());
        assert_eq!(laptop.history().len(), 1);

        let doc = store.snapshot(&smith()).unwrap();
        assert_eq!(doc.signatures.len(), 1);
        assert!(doc.signature_requests.is_empty());
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add,
            Cancel(prop::sample::Index),
            Sign(prop::sample::Index),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                2 => Just(Op::Add),
                1 => any::<prop::sample::Index>().prop_map(Op::Cancel),
                1 => any::<prop::sample::Index>().prop_map(Op::Sign),
            ]
        }

        proptest! {
            #[test]
            fn prop_pending_and_signed_stay_disjoint(ops in prop::collection::vec(op(), 1..24)) {
                tokio_test::block_on(async {
                    let (portal, _) = memory_portal([(smith(), primary_only())]);
                    let admin = portal.container.admin();
                    let mut session = portal.session(&smith()).await;

                    for (i, op) in ops.into_iter().enumerate() {
                        let pending: Vec<RequestId> =
                            session.pending().iter().map(|r| r.id.clone()).collect();
                        match op {
                            Op::Add => {
                                admin.add_request(&smith(), &format!("Doc {i}"), None).await.unwrap();
                            }
                            Op::Cancel(pick) if !pending.is_empty() => {
                                let id = &pending[pick.index(pending.len())];
                                assert!(admin.cancel_request(&smith(), id).await.unwrap());
                            }
                            Op::Sign(pick) if !pending.is_empty() => {
                                let id = &pending[pick.index(pending.len())];
                                session.open_request(id).unwrap();
                                scribble(session.begin_signing().unwrap());
                                session.sign().await.unwrap();
                            }
                            _ => {}
                        }
                        session.refresh().await.unwrap();
                    }

                    let record = admin.client(&smith()).await.unwrap();
                    let signed: HashSet<&RequestId> =
                        record.history.iter().filter_map(|s| s.doc_id.as_ref()).collect();
                    assert_eq!(signed.len(), record.history.len());
                    assert!(record.pending.iter().all(|r| !signed.contains(&r.id)));
                });
            }
        }
    }
}
