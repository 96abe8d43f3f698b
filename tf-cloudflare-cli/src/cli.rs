//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tf-cloudflare")]
#[command(about = "Run tf-cloudflare resource and data source callbacks over JSON")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Request file (stdin if not specified)
    #[arg(long, short, global = true)]
    pub input: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the provider, resource and data source schemas
    Schema,

    /// Check the request's `config` against a schema without calling the API
    Validate {
        /// Resource or data source type, e.g. cloudflare_zone_cache_variants
        type_name: String,

        /// Validate against the data source of that name
        #[arg(long)]
        data_source: bool,
    },

    /// Create a resource from the request's `config`
    Create { type_name: String },

    /// Refresh the request's `state`
    Read { type_name: String },

    /// Apply the request's `config` on top of its prior `state`
    Update { type_name: String },

    /// Delete the resource recorded in the request's `state`
    Delete { type_name: String },

    /// Import an existing object into state
    Import {
        type_name: String,

        /// Import ID, e.g. a zone ID or `<account_id>/<project_name>/<domain>`
        id: String,
    },

    /// Read a data source from the request's `config`
    ReadData { type_name: String },

    /// Check that the configured credentials are accepted
    Verify,
}

impl Command {
    /// Whether the command needs a request document on input.
    pub fn reads_request(&self) -> bool {
        !matches!(self, Self::Schema)
    }

    /// Whether the command talks to the API.
    pub fn needs_client(&self) -> bool {
        !matches!(self, Self::Schema | Self::Validate { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_read_data_with_global_flags() {
        let cli = Cli::try_parse_from([
            "tf-cloudflare",
            "read-data",
            "cloudflare_waf_groups",
            "--input",
            "request.json",
            "--pretty",
        ])
        .unwrap();

        assert!(cli.pretty);
        assert_eq!(cli.input, Some(PathBuf::from("request.json")));
        assert!(matches!(
            cli.command,
            Command::ReadData { ref type_name } if type_name == "cloudflare_waf_groups"
        ));
        assert!(cli.command.needs_client());
    }

    #[test]
    fn import_takes_id() {
        let cli = Cli::try_parse_from([
            "tf-cloudflare",
            "import",
            "cloudflare_pages_domain",
            "acc/site/example.com",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Import { ref id, .. } if id == "acc/site/example.com"
        ));
    }

    #[test]
    fn schema_and_validate_are_offline() {
        let cli = Cli::try_parse_from(["tf-cloudflare", "schema"]).unwrap();
        assert!(!cli.command.reads_request());
        assert!(!cli.command.needs_client());

        let cli = Cli::try_parse_from([
            "tf-cloudflare",
            "validate",
            "cloudflare_waf_groups",
            "--data-source",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Validate { data_source: true, .. }));
        assert!(!cli.command.needs_client());
    }

    #[test]
    fn unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["tf-cloudflare", "plan"]).is_err());
    }
}
