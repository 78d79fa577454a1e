//! `mgs` — message gateway channel command-line interface.
//!
//! Creates and deletes the control and data channels of the message
//! gateway, printing the gateway's answer as JSON:
//!
//! - **`create-control-channel`** / **`delete-control-channel`** — keyed by instance id.
//! - **`create-data-channel`** / **`delete-data-channel`** — keyed by session id.
//! - **`endpoint`** — print the channel URL for a region without calling it.
//!
//! Region and credentials come from flags or the usual `AWS_*` environment
//! variables; see [`config::CliConfig`]. Exits 2 on configuration or request
//! errors and 3 when the gateway could not be reached or understood.

mod config;

use std::process;

use clap::{Parser, Subcommand};
use mgs_channel_client::api::ChannelKind;
use mgs_channel_client::{resolve_url, ChannelGatewayClient, GatewayError};
use serde::Serialize;
use uuid::Uuid;

use config::CliConfig;

/// mgs — message gateway channel CLI
///
/// Open and close control and data channels on the message gateway.
#[derive(Parser)]
#[command(name = "mgs", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: CliConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the control channel of a managed instance and print its token.
    CreateControlChannel {
        /// Managed instance id, e.g. i-0123456789abcdef0.
        #[arg(long, value_name = "ID")]
        instance_id: String,
    },

    /// Create the data channel of a session and print its token.
    CreateDataChannel {
        /// Session id the data channel belongs to.
        #[arg(long, value_name = "ID")]
        session_id: String,

        /// Client id (UUID). A fresh one is generated when omitted.
        #[arg(long, value_name = "UUID")]
        client_id: Option<String>,
    },

    /// Delete the control channel of a managed instance.
    DeleteControlChannel {
        #[arg(long, value_name = "ID")]
        instance_id: String,
    },

    /// Delete the data channel of a session.
    DeleteDataChannel {
        #[arg(long, value_name = "ID")]
        session_id: String,
    },

    /// Print the gateway URL for a channel without sending anything.
    ///
    /// Examples:
    ///   mgs --region us-east-1 endpoint --kind control --id i-12345678
    ///   mgs --region cn-north-1 endpoint --kind data --id s-12345678
    Endpoint {
        /// Channel kind: control | data
        #[arg(long, value_name = "KIND")]
        kind: ChannelKind,

        /// Instance id (control) or session id (data).
        #[arg(long, value_name = "ID")]
        id: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mgs_channel_client=info,mgs=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = &cli.config;

    match cli.command {
        Command::CreateControlChannel { instance_id } => {
            let client = connect(config);
            let input = client.control_channel_input();
            tracing::info!(
                "creating control channel for {instance_id} (request {})",
                input.request_id
            );
            print_result(client.create_control_channel(&input, &instance_id));
        }

        Command::CreateDataChannel {
            session_id,
            client_id,
        } => {
            let client = connect(config);
            let client_id = client_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            let input = client.data_channel_input(client_id);
            tracing::info!(
                "creating data channel for {session_id} (request {}, client {})",
                input.request_id,
                input.client_id
            );
            print_result(client.create_data_channel(&input, &session_id));
        }

        Command::DeleteControlChannel { instance_id } => {
            let client = connect(config);
            let input = client.delete_channel_input();
            tracing::info!(
                "deleting control channel for {instance_id} (request {})",
                input.request_id
            );
            print_result(client.delete_control_channel(&input, &instance_id));
        }

        Command::DeleteDataChannel { session_id } => {
            let client = connect(config);
            let input = client.delete_channel_input();
            tracing::info!(
                "deleting data channel for {session_id} (request {})",
                input.request_id
            );
            print_result(client.delete_data_channel(&input, &session_id));
        }

        Command::Endpoint { kind, id } => {
            let region = config.region().unwrap_or_else(|e| fatal(&e.to_string()));
            let resolver = config
                .host_resolver()
                .unwrap_or_else(|e| fatal(&e.to_string()));
            match resolve_url(&resolver, kind, &id, region) {
                Ok(url) => println!("{url}"),
                Err(e) => fatal(&e.to_string()),
            }
        }
    }
}

/// Build the gateway client, or exit when credentials or region are missing.
fn connect(config: &CliConfig) -> ChannelGatewayClient {
    config
        .build_client()
        .unwrap_or_else(|e| fatal(&e.to_string()))
}

/// Print a successful gateway answer as pretty JSON, or exit with the error.
fn print_result<T: Serialize>(result: Result<T, GatewayError>) {
    match result {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(e) => fatal(&format!("failed to render output: {e}")),
        },
        Err(e) => {
            let code = if e.is_transient() { 3 } else { 2 };
            eprintln!("mgs: {e}");
            process::exit(code);
        }
    }
}

/// Print an error message to stderr and exit with code 2.
fn fatal(msg: &str) -> ! {
    eprintln!("mgs: {}", msg);
    process::exit(2);
}
