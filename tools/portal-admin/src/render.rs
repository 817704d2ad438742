//! Plain-text rendering of client records.

use std::fmt::Write;

use shared_types::ClientRecord;

const DATE: &str = "%Y-%m-%d %H:%M";

/// One line per client.
pub fn client_line(record: &ClientRecord) -> String {
    let mut flags = Vec::new();
    if !record.pending.is_empty() {
        flags.push(format!("{} pending", record.pending.len()));
    }
    if record.legacy_quote_pending().is_some() {
        flags.push("quote to sign".to_string());
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", flags.join(", "))
    };
    format!(
        "{:<40} {:<12} {:>12}{}",
        record.id.as_str(),
        record.status.as_str(),
        record.project_value.to_string(),
        flags
    )
}

/// Full client view, history entries numbered for `certificate`.
pub fn client_detail(record: &ClientRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Client:   {}", record.id);
    let _ = writeln!(out, "Status:   {}", record.status);
    let _ = writeln!(out, "Value:    {}", record.project_value);
    let _ = writeln!(out, "Folder:   {}", record.folder_id);
    if let Some(quote) = &record.quote_folder_id {
        let needed = if record.signature_needed {
            " (signature needed)"
        } else {
            ""
        };
        let _ = writeln!(out, "Quote:    {}{}", quote, needed);
    }
    if let Some(created) = record.created_at {
        let _ = writeln!(out, "Created:  {}", created.format(DATE));
    }
    if !record.notes.is_empty() {
        let _ = writeln!(out, "Notes:    {}", record.notes);
    }

    let _ = writeln!(out, "\nPending requests ({}):", record.pending.len());
    for request in &record.pending {
        let _ = writeln!(
            out,
            "  {}  {}  folder {}",
            request.id, request.name, request.folder_id
        );
    }

    let _ = writeln!(out, "\nSignatures ({}):", record.history.len());
    for (index, signature) in record.history.iter().enumerate() {
        let _ = writeln!(
            out,
            "  #{}  {}  {}  by {}",
            index,
            signature.signed_at.format(DATE),
            signature.doc_name.as_deref().unwrap_or("Quote"),
            signature.signer
        );
    }
    out
}
