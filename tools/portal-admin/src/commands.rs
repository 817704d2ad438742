//! Command execution against an `AdminConsole`.

use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use portal_runtime::AdminConsole;
use rust_decimal::Decimal;
use shared_types::{ClientStatus, FolderRef, RequestId};
use sp_02_client_records::{FieldPatch, NewClient};
use tracing::info;

use crate::cli::{ClientFields, Command, RequestCommand};
use crate::render::{client_detail, client_line};

fn parse_value(value: Option<&str>) -> Result<Option<Decimal>> {
    value
        .map(|v| Decimal::from_str(v.trim()).with_context(|| format!("invalid project value {v:?}")))
        .transpose()
}

fn new_client(fields: &ClientFields) -> Result<NewClient> {
    Ok(NewClient {
        folder_id: FolderRef::new(fields.folder.clone().unwrap_or_default()),
        quote_folder_id: fields.quote_folder.clone().map(FolderRef::new),
        notes: fields.notes.clone().unwrap_or_default(),
        status: fields.status.clone().map(ClientStatus::from),
        project_value: parse_value(fields.value.as_deref())?,
    })
}

fn field_patch(fields: &ClientFields, clear_quote_folder: bool) -> Result<FieldPatch> {
    let quote_folder_id = if clear_quote_folder {
        Some(None)
    } else {
        fields.quote_folder.clone().map(|q| Some(FolderRef::new(q)))
    };
    Ok(FieldPatch {
        folder_id: fields.folder.clone().map(FolderRef::new),
        quote_folder_id,
        notes: fields.notes.clone(),
        status: fields.status.clone().map(ClientStatus::from),
        project_value: parse_value(fields.value.as_deref())?,
        signature_needed: None,
    })
}

/// Run one command. Returns the text to print.
pub async fn execute(admin: &AdminConsole, command: Command) -> Result<String> {
    match command {
        Command::List { search } => {
            let clients = admin.list_clients(search.as_deref()).await?;
            if clients.is_empty() {
                return Ok("No clients found.".to_string());
            }
            Ok(clients
                .iter()
                .map(client_line)
                .collect::<Vec<_>>()
                .join("\n"))
        }

        Command::Show { client } => {
            let id = admin.client_id(&client)?;
            Ok(client_detail(&admin.client(&id).await?))
        }

        Command::Create { client, fields } => {
            let record = admin.create_client(&client, new_client(&fields)?).await?;
            Ok(format!(
                "Created {}\n\n{}",
                record.id,
                admin.invite_message(&record.id)
            ))
        }

        Command::Edit {
            client,
            fields,
            clear_quote_folder,
        } => {
            let id = admin.client_id(&client)?;
            let patch = field_patch(&fields, clear_quote_folder)?;
            if patch.is_empty() {
                bail!("nothing to change");
            }
            Ok(client_detail(&admin.update_client(&id, patch).await?))
        }

        Command::Delete { client, yes } => {
            let id = admin.client_id(&client)?;
            if !yes {
                bail!("refusing to delete {id} without --yes");
            }
            admin.delete_client(&id).await?;
            Ok(format!("Deleted {id}"))
        }

        Command::Request(RequestCommand::Add {
            client,
            name,
            folder,
        }) => {
            let id = admin.client_id(&client)?;
            let request = admin
                .add_request(&id, &name, folder.map(FolderRef::new))
                .await?;
            Ok(format!(
                "Requested {} from {} (id {}, folder {})",
                request.name, id, request.id, request.folder_id
            ))
        }

        Command::Request(RequestCommand::Cancel { client, id: request }) => {
            let id = admin.client_id(&client)?;
            let request = RequestId::new(request);
            if admin.cancel_request(&id, &request).await? {
                Ok(format!("Cancelled request {request}"))
            } else {
                Ok(format!("Request {request} was not pending"))
            }
        }

        Command::ToggleSignature { client } => {
            let id = admin.client_id(&client)?;
            let needed = admin.toggle_legacy_signature(&id).await?;
            Ok(format!(
                "Legacy signature {} for {id}",
                if needed { "requested" } else { "cleared" }
            ))
        }

        Command::Certificate { client, index, out } => {
            let id = admin.client_id(&client)?;
            let certificate = admin.certificate(&id, index).await?;
            let path = write_file(&out, &certificate.file_name, &certificate.bytes)?;
            info!(client = %id, path = %path, "[admin] Certificate written");
            Ok(format!("Wrote {path}"))
        }

        Command::Invite { client } => {
            let id = admin.client_id(&client)?;
            admin.client(&id).await?;
            Ok(admin.invite_message(&id))
        }

        Command::Links { client } => {
            let id = admin.client_id(&client)?;
            let links = admin.folder_links(&admin.client(&id).await?);
            let mut lines = vec![format!("Folder: {}", links.primary)];
            if let Some(quote) = links.quote {
                lines.push(format!("Quote:  {quote}"));
            }
            for (request, url) in links.requests {
                lines.push(format!("{request}: {url}"));
            }
            Ok(lines.join("\n"))
        }
    }
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<String> {
    std::fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, bytes).with_context(|| format!("cannot write {}", path.display()))?;
    Ok(path.display().to_string())
}
