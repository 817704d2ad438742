//! # Request Lifecycle Flows
//!
//! Admin adds requests (sp-03), the client views (sp-04) and signs (sp-05),
//! every write lands in one record (sp-02).

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};
    use portal_runtime::{ErrorKind, PortalError};
    use serde_json::json;
    use shared_types::{
        ClientId, ClientRecord, FolderRef, RequestId, SignatureRecord, SignatureRequest,
    };
    use sp_01_identity::{normalize_identifier, IdentityConfig};
    use sp_02_client_records::{ClientDocument, NewClient};
    use sp_04_view_router::ViewState;
    use sp_05_signature_capture::{render_certificate, CertificateConfig, CommitOutcome};

    use crate::fixtures::*;

    fn primary_only() -> ClientDocument {
        ClientDocument {
            folder_id: FolderRef::new("F1"),
            ..ClientDocument::default()
        }
    }

    fn deck_quote() -> SignatureRequest {
        SignatureRequest {
            id: RequestId::new("X"),
            name: "Deck Quote".into(),
            folder_id: FolderRef::new("F2"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap(),
        }
    }

    fn assert_disjoint(record: &ClientRecord) {
        let signed: HashSet<&RequestId> =
            record.history.iter().filter_map(|s| s.doc_id.as_ref()).collect();
        for request in &record.pending {
            assert!(
                !signed.contains(&request.id),
                "{} is both pending and signed",
                request.id
            );
        }
    }

    // =========================================================================
    // IDENTITY
    // =========================================================================

    #[test]
    fn test_username_resolution() {
        let config = IdentityConfig::default();
        assert_eq!(
            normalize_identifier("smith", &config).unwrap().as_str(),
            "smith@evans-portal.com"
        );
        assert_eq!(
            normalize_identifier("smith@other.com", &config).unwrap().as_str(),
            "smith@other.com"
        );
    }

    // =========================================================================
    // CANCEL
    // =========================================================================

    #[tokio::test]
    async fn test_cancel_kitchen_quote_from_stored_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.json");
        write_collection(
            &path,
            json!({
                "smith@evans-portal.com": {
                    "folderId": "F1",
                    "signatureRequests": [
                        {"id": "1700000000000", "name": "Kitchen Quote", "folderId": "F1"}
                    ]
                }
            }),
        );
        let portal = file_portal(&path);
        let admin = portal.container.admin();

        let cancelled = admin
            .cancel_request(&smith(), &RequestId::new("1700000000000"))
            .await
            .unwrap();
        assert!(cancelled);

        let stored = read_collection(&path);
        let doc = &stored["clients"]["smith@evans-portal.com"];
        assert_eq!(doc["signatureRequests"], json!([]));
        assert_eq!(doc["signatures"], json!([]));
        assert_eq!(doc["folderId"], json!("F1"));
    }

    #[tokio::test]
    async fn test_add_five_cancel_one() {
        for victim in 0..5 {
            let (portal, _) = memory_portal([(smith(), primary_only())]);
            let admin = portal.container.admin();
            let mut ids = Vec::new();
            for n in 0..5 {
                let request = admin
                    .add_request(&smith(), &format!("Document {n}"), None)
                    .await
                    .unwrap();
                ids.push(request.id);
            }
            let unique: HashSet<&RequestId> = ids.iter().collect();
            assert_eq!(unique.len(), 5);

            admin.cancel_request(&smith(), &ids[victim]).await.unwrap();

            let remaining: Vec<RequestId> = admin
                .client(&smith())
                .await
                .unwrap()
                .pending
                .into_iter()
                .map(|r| r.id)
                .collect();
            let expected: Vec<RequestId> = ids
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != victim)
                .map(|(_, id)| id.clone())
                .collect();
            assert_eq!(remaining, expected);
        }
    }

    // =========================================================================
    // VIEW + SIGN
    // =========================================================================

    #[tokio::test]
    async fn test_sign_deck_quote() {
        let (portal, store) = memory_portal([(
            smith(),
            ClientDocument {
                folder_id: FolderRef::new("F1"),
                signature_requests: vec![deck_quote()],
                ..ClientDocument::default()
            },
        )]);
        let mut session = portal.session(&smith()).await;

        session.open_request(&RequestId::new("X")).unwrap();
        assert_eq!(session.view_state(), &ViewState::Request(deck_quote()));
        scribble(session.begin_signing().unwrap());

        let outcome = session.sign().await.unwrap();
        let record = outcome.record().unwrap();
        assert_eq!(record.doc_id, Some(RequestId::new("X")));
        assert_eq!(record.doc_name.as_deref(), Some("Deck Quote"));
        assert_eq!(record.signer, smith());

        let doc = store.snapshot(&smith()).unwrap();
        assert!(doc.signature_requests.iter().all(|r| r.id.as_str() != "X"));
        assert_eq!(doc.signatures.len(), 1);
        assert_eq!(doc.signatures[0].doc_id, Some(RequestId::new("X")));
        assert_eq!(doc.signatures[0].doc_name.as_deref(), Some("Deck Quote"));

        assert!(session.view_state().is_main());
        assert_eq!(session.active_folder().as_str(), "F1");
    }

    #[tokio::test]
    async fn test_open_then_back_restores_folder() {
        let (portal, _) = memory_portal([(
            smith(),
            ClientDocument {
                folder_id: FolderRef::new("F1"),
                signature_requests: vec![deck_quote()],
                ..ClientDocument::default()
            },
        )]);
        let mut session = portal.session(&smith()).await;
        let before = session.viewer_url();

        session.open_request(&RequestId::new("X")).unwrap();
        assert_ne!(session.viewer_url(), before);
        assert_eq!(session.back_to_main(), before);
        assert_eq!(session.active_folder().as_str(), "F1");
    }

    #[tokio::test]
    async fn test_full_cycle_keeps_pending_and_history_disjoint() {
        let (portal, _) = memory_portal([(smith(), primary_only())]);
        let admin = portal.container.admin();
        let a = admin.add_request(&smith(), "Kitchen Quote", None).await.unwrap();
        portal.clock.advance_millis(1_000);
        let b = admin
            .add_request(&smith(), "Deck Quote", Some(FolderRef::new("F2")))
            .await
            .unwrap();
        portal.clock.advance_millis(1_000);
        let c = admin.add_request(&smith(), "Invoice", None).await.unwrap();

        let mut session = portal.session(&smith()).await;
        for id in [&b.id, &a.id] {
            session.open_request(id).unwrap();
            scribble(session.begin_signing().unwrap());
            session.sign().await.unwrap();
            assert_disjoint(session.record());
        }

        // Cancelled while open: signing it records nothing.
        session.open_request(&c.id).unwrap();
        admin.cancel_request(&smith(), &c.id).await.unwrap();
        scribble(session.begin_signing().unwrap());
        assert_eq!(session.sign().await.unwrap(), CommitOutcome::AlreadyResolved);

        let record = admin.client(&smith()).await.unwrap();
        assert_disjoint(&record);
        assert!(record.pending.is_empty());
        let signed: Vec<_> = record.history.iter().map(|s| s.doc_id.clone()).collect();
        assert_eq!(signed, vec![Some(b.id.clone()), Some(a.id.clone())]);
        assert!(session.view_state().is_main());
    }

    // =========================================================================
    // FAILURES
    // =========================================================================

    #[tokio::test]
    async fn test_outage_then_retry() {
        let (portal, store) = memory_portal([(
            smith(),
            ClientDocument {
                folder_id: FolderRef::new("F1"),
                signature_requests: vec![deck_quote()],
                ..ClientDocument::default()
            },
        )]);
        let mut session = portal.session(&smith()).await;
        session.open_request(&RequestId::new("X")).unwrap();
        scribble(session.begin_signing().unwrap());
        let strokes_before = session.capture().unwrap().strokes().to_vec();

        store.set_writes_failing(true);
        let err = session.sign().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteWrite);
        assert!(err.is_retryable());

        let doc = store.snapshot(&smith()).unwrap();
        assert_eq!(doc.signature_requests, vec![deck_quote()]);
        assert!(doc.signatures.is_empty());
        assert_eq!(session.view_state(), &ViewState::Request(deck_quote()));
        assert_eq!(session.capture().unwrap().strokes(), strokes_before.as_slice());

        store.set_writes_failing(false);
        assert!(matches!(
            session.sign().await.unwrap(),
            CommitOutcome::Committed(_)
        ));
        assert_eq!(store.snapshot(&smith()).unwrap().signatures.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_drawing_never_reaches_store() {
        let (portal, store) = memory_portal([(
            smith(),
            ClientDocument {
                folder_id: FolderRef::new("F1"),
                signature_requests: vec![deck_quote()],
                ..ClientDocument::default()
            },
        )]);
        let mut session = portal.session(&smith()).await;
        session.open_request(&RequestId::new("X")).unwrap();
        session.begin_signing().unwrap();

        let err = session.sign().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
        assert_eq!(store.write_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_client_is_access_denied() {
        let (portal, _) = memory_portal([(smith(), primary_only())]);
        let stranger = ClientId::new("jones@evans-portal.com").unwrap();
        let err = portal
            .container
            .open_session(identity(&stranger))
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("access denied"));
    }

    #[tokio::test]
    async fn test_add_request_validation() {
        let (portal, store) = memory_portal([(smith(), primary_only())]);
        let admin = portal.container.admin();
        let err = admin.add_request(&smith(), "   ", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.write_calls(), 0);

        let ghost = ClientId::new("ghost@evans-portal.com").unwrap();
        let err = admin.add_request(&ghost, "Quote", None).await.unwrap_err();
        assert!(matches!(err, PortalError::Queue(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    // =========================================================================
    // CERTIFICATES
    // =========================================================================

    #[tokio::test]
    async fn test_certificate_is_deterministic() {
        let (portal, _) = memory_portal([(
            smith(),
            ClientDocument {
                folder_id: FolderRef::new("F1"),
                signature_requests: vec![deck_quote()],
                ..ClientDocument::default()
            },
        )]);
        let mut session = portal.session(&smith()).await;
        session.open_request(&RequestId::new("X")).unwrap();
        scribble(session.begin_signing().unwrap());
        session.sign().await.unwrap();

        let admin = portal.container.admin();
        let first = admin.certificate(&smith(), 0).await.unwrap();
        let second = admin.certificate(&smith(), 0).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.file_name, "Receipt_smith_Deck_Quote.pdf");
        assert_eq!(session.certificate(0).unwrap(), first);
    }

    #[test]
    fn test_certificate_local_time() {
        let record = SignatureRecord::for_request(
            smith(),
            &deck_quote(),
            shared_types::RasterImage::from_data_url(PNG).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 2, 23, 30, 0).unwrap(),
        );
        let utc = render_certificate(&smith(), &record, &CertificateConfig::default()).unwrap();
        let paris = render_certificate(
            &smith(),
            &record,
            &CertificateConfig {
                utc_offset_minutes: 120,
                ..CertificateConfig::default()
            },
        )
        .unwrap();
        assert_ne!(utc.bytes, paris.bytes);
        assert_eq!(utc.file_name, paris.file_name);
    }

    // =========================================================================
    // ONBOARDING
    // =========================================================================

    #[tokio::test]
    async fn test_onboard_then_first_login() {
        let (portal, _) = memory_portal(Vec::<(ClientId, ClientDocument)>::new());
        let admin = portal.container.admin();
        let record = admin
            .create_client(
                "smith",
                NewClient {
                    quote_folder_id: Some(FolderRef::new("Q1")),
                    ..NewClient::with_folder("F1")
                },
            )
            .await
            .unwrap();
        assert_eq!(
            record.created_at.map(|t| t.timestamp_millis()),
            Some(START_MILLIS)
        );
        assert!(admin.invite_message(&record.id).contains("Username: smith"));

        let session = portal.session(&smith()).await;
        assert!(session.view_state().is_main());
        assert!(session.pending().is_empty());
    }
}
