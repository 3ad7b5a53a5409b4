//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs the log subscriber
//! - builds the client from the environment
//! - dispatches the subcommand and prints the result

use clap::Parser;

use crate::cli::{AttributeArgs, Cli, Command};
use crate::client::VehicleProfileClient;
use crate::domain::{ErrorPolicy, ResolvedAttributes};
use crate::error::AppError;
use crate::partner::PartnerResolver;
use crate::registry::descriptors_for;
use crate::report::{self, OutputFormat};

/// Entry point for the `vpc` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    crate::logging::init(cli.verbose)?;

    let client = VehicleProfileClient::from_env()?;
    let policy = ErrorPolicy::from_ignore_flag(cli.ignore_errors);
    let format = OutputFormat::from_json_flag(cli.json);

    let output = dispatch(&client, cli.command, policy, format)?;
    print!("{output}");
    Ok(())
}

/// Run one subcommand and return what should be printed.
pub fn dispatch(
    client: &VehicleProfileClient,
    command: Command,
    policy: ErrorPolicy,
    format: OutputFormat,
) -> Result<String, AppError> {
    match command {
        Command::Get(args) => lookup(&args, format, |descriptors| {
            client.resolve_many(&args.id, policy, descriptors)
        }),
        Command::GetByVin(args) => lookup(&args, format, |descriptors| {
            client.resolve_by_vin(&args.id, policy, descriptors)
        }),
        Command::GetByClientId(args) => lookup(&args, format, |descriptors| {
            client.resolve_by_client_id(&args.id, policy, descriptors)
        }),
        Command::Profile { vehicle_id } => {
            let profile = client
                .vehicle_profile(&vehicle_id)?
                .ok_or_else(|| AppError::new(4, format!("no profile data for vehicle {vehicle_id}")))?;
            Ok(with_newline(report::to_json(&profile)?))
        }
        Command::Associated { user_id } => {
            let vehicles = client.associated_vehicles(&user_id)?;
            match format {
                OutputFormat::Json => Ok(with_newline(report::to_json(&vehicles)?)),
                OutputFormat::Text => Ok(report::format_associated(&vehicles)),
            }
        }
        Command::Associate {
            user_id,
            vehicle_id,
            status,
        } => {
            client.associate(&user_id, &vehicle_id, status.as_deref())?;
            Ok(format!("Associated {vehicle_id} with {user_id}\n"))
        }
        Command::Disassociate { user_id, vehicle_id } => {
            client.disassociate(&user_id, &vehicle_id)?;
            Ok(format!("Disassociated {vehicle_id} from {user_id}\n"))
        }
        Command::Partners {
            vehicle_id,
            event_id,
            services,
        } => {
            let detail = PartnerResolver::new(client).resolve_partner_detail(&vehicle_id, &event_id, &services)?;
            match format {
                OutputFormat::Json => Ok(with_newline(report::to_json(&detail)?)),
                OutputFormat::Text => Ok(report::format_partner_detail(&detail)),
            }
        }
        Command::UserContext { vehicle_id } => {
            let contexts = client.user_context(&vehicle_id)?;
            match format {
                OutputFormat::Json => Ok(with_newline(report::to_json(&contexts)?)),
                OutputFormat::Text => Ok(report::format_user_contexts(&contexts)),
            }
        }
    }
}

fn lookup<F>(args: &AttributeArgs, format: OutputFormat, resolve: F) -> Result<String, AppError>
where
    F: FnOnce(&[crate::domain::AttributeDescriptor]) -> crate::error::ProfileResult<ResolvedAttributes>,
{
    let attributes = args.selected();
    let descriptors = descriptors_for(&attributes);
    let resolved = resolve(&descriptors)?;

    let names: Vec<&str> = attributes.iter().map(|a| a.name()).collect();
    match format {
        OutputFormat::Json => Ok(with_newline(report::to_json(&report::attributes_json(&names, &resolved))?)),
        OutputFormat::Text => Ok(report::format_attributes(&names, &resolved)),
    }
}

fn with_newline(mut text: String) -> String {
    text.push('\n');
    text
}
