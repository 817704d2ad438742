//! # Legacy Documents
//!
//! Records written before request queues: a single `signature` value, a
//! `signatureNeeded` flag pointing at `quoteFolderId`, and missing fields.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shared_types::{ClientStatus, RequestId, SignatureOrigin};
    use sp_04_view_router::ViewState;
    use sp_05_signature_capture::CommitOutcome;

    use crate::fixtures::*;

    #[tokio::test]
    async fn test_legacy_and_history_merge() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.json");
        write_collection(
            &path,
            json!({
                "smith@evans-portal.com": {
                    "folderId": "F1",
                    "signature": {"signedAt": "2023-06-01T10:00:00Z", "image": PNG},
                    "signatures": [{
                        "signedAt": "2024-02-01T10:00:00Z",
                        "image": PNG,
                        "signer": "smith@evans-portal.com",
                        "docName": "Deck Quote",
                        "docId": "X"
                    }]
                }
            }),
        );
        let portal = file_portal(&path);
        let session = portal.session(&smith()).await;

        let history = session.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].origin, SignatureOrigin::Legacy);
        assert_eq!(history[0].signer, smith());
        assert_eq!(history[0].doc_id, None);
        assert_eq!(history[1].doc_id, Some(RequestId::new("X")));

        // The legacy entry has a certificate like any other.
        let cert = session.certificate(0).unwrap();
        assert_eq!(cert.file_name, "Receipt_smith.pdf");
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.json");
        write_collection(
            &path,
            json!({ "smith@evans-portal.com": { "folderId": "F1", "projectValue": 4200 } }),
        );
        let portal = file_portal(&path);
        let record = portal.container.admin().client(&smith()).await.unwrap();
        assert_eq!(record.status, ClientStatus::Lead);
        assert_eq!(record.project_value.to_string(), "4200");
        assert!(record.pending.is_empty());
        assert!(record.history.is_empty());
        assert!(record.created_at.is_none());
    }

    #[tokio::test]
    async fn test_legacy_quote_signing_clears_flag_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.json");
        write_collection(
            &path,
            json!({
                "smith@evans-portal.com": {
                    "folderId": "F1",
                    "quoteFolderId": "Q1",
                    "signatureNeeded": true
                }
            }),
        );
        let portal = file_portal(&path);
        let mut session = portal.session(&smith()).await;
        assert_eq!(session.view_state(), &ViewState::QuoteFolder);
        assert!(session.viewer_url().contains("id=Q1"));

        scribble(session.begin_signing().unwrap());
        let outcome = session.sign().await.unwrap();
        assert!(matches!(outcome, CommitOutcome::Committed(_)));
        assert!(session.view_state().is_main());

        let stored = read_collection(&path);
        let doc = &stored["clients"]["smith@evans-portal.com"];
        assert!(doc.get("signatureNeeded").is_none());
        assert_eq!(doc["signatures"][0]["docName"], json!("Quote"));
        assert!(doc["signatures"][0].get("docId").is_none());
        assert_eq!(doc["quoteFolderId"], json!("Q1"));

        // A fresh session starts on the primary folder.
        let session = portal.session(&smith()).await;
        assert!(session.view_state().is_main());
    }

    #[tokio::test]
    async fn test_admin_toggle_reopens_quote_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.json");
        write_collection(
            &path,
            json!({ "smith@evans-portal.com": { "folderId": "F1", "quoteFolderId": "Q1" } }),
        );
        let portal = file_portal(&path);
        assert!(portal.session(&smith()).await.view_state().is_main());

        let needed = portal
            .container
            .admin()
            .toggle_legacy_signature(&smith())
            .await
            .unwrap();
        assert!(needed);
        assert_eq!(
            portal.session(&smith()).await.view_state(),
            &ViewState::QuoteFolder
        );
    }

    #[tokio::test]
    async fn test_flag_without_quote_folder_stays_on_main() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.json");
        write_collection(
            &path,
            json!({ "smith@evans-portal.com": { "folderId": "F1", "signatureNeeded": true } }),
        );
        let portal = file_portal(&path);
        let mut session = portal.session(&smith()).await;
        assert!(session.view_state().is_main());
        assert!(session.begin_signing().is_err());
    }
}
