//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Portal-Admin: manage signing-portal clients
#[derive(Parser, Debug)]
#[command(name = "portal-admin")]
#[command(about = "Manage client records, signature requests and certificates")]
pub struct Cli {
    /// Portal configuration file (defaults to $PORTAL_CONFIG)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON record store, overrides the configured backend
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List clients, optionally filtered by a case-insensitive id fragment
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one client
    Show { client: String },
    /// Onboard a client (status Lead, value 0 unless given)
    Create {
        /// Username or full email
        client: String,
        #[command(flatten)]
        fields: ClientFields,
    },
    /// Edit a client's fields
    Edit {
        client: String,
        #[command(flatten)]
        fields: ClientFields,
        /// Remove the legacy quote folder
        #[arg(long, conflicts_with = "quote_folder")]
        clear_quote_folder: bool,
    },
    /// Delete a client record
    Delete {
        client: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Signature request queue
    #[command(subcommand)]
    Request(RequestCommand),
    /// Flip the legacy "signature needed" flag
    ToggleSignature { client: String },
    /// Write the certificate for one signature history entry
    Certificate {
        client: String,
        /// Position in the history, as shown by `show`
        index: usize,
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the onboarding invite message
    Invite { client: String },
    /// Print folder links
    Links { client: String },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum RequestCommand {
    /// Ask a client to sign a document
    Add {
        client: String,
        name: String,
        /// Folder to show while signing (defaults to the primary folder)
        #[arg(long)]
        folder: Option<String>,
    },
    /// Withdraw a pending request
    Cancel { client: String, id: String },
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ClientFields {
    /// Primary document folder
    #[arg(long)]
    pub folder: Option<String>,
    /// Legacy quote folder
    #[arg(long)]
    pub quote_folder: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Lead, Quoted, In Progress, Completed
    #[arg(long)]
    pub status: Option<String>,
    /// Project value, e.g. 12500.50
    #[arg(long)]
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_create() {
        let cli = Cli::parse_from([
            "portal-admin",
            "--store",
            "/tmp/clients.json",
            "create",
            "smith",
            "--folder",
            "F1",
            "--value",
            "1500",
        ]);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/clients.json")));
        let Command::Create { client, fields } = cli.command else {
            panic!("expected create");
        };
        assert_eq!(client, "smith");
        assert_eq!(fields.folder.as_deref(), Some("F1"));
        assert_eq!(fields.value.as_deref(), Some("1500"));
    }

    #[test]
    fn test_parse_request_add() {
        let cli = Cli::parse_from([
            "portal-admin",
            "request",
            "add",
            "smith",
            "Deck Quote",
            "--folder",
            "F2",
        ]);
        assert_eq!(
            cli.command,
            Command::Request(RequestCommand::Add {
                client: "smith".into(),
                name: "Deck Quote".into(),
                folder: Some("F2".into()),
            })
        );
    }

    #[test]
    fn test_clear_conflicts_with_quote_folder() {
        let result = Cli::try_parse_from([
            "portal-admin",
            "edit",
            "smith",
            "--quote-folder",
            "Q1",
            "--clear-quote-folder",
        ]);
        assert!(result.is_err());
    }
}
