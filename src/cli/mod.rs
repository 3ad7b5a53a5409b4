//! Command-line parsing for the vehicle profile client.
//!
//! Parsing only; dispatch lives in `app`.

use clap::{Args, Parser, Subcommand};

use crate::registry::VehicleAttribute;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "vpc", version, about = "Vehicle profile attribute client")]
pub struct Cli {
    /// Degrade remote and attribute failures to absent values instead of failing.
    #[arg(long, global = true)]
    pub ignore_errors: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve attributes for a vehicle id.
    Get(AttributeArgs),
    /// Resolve attributes for a VIN.
    GetByVin(AttributeArgs),
    /// Resolve attributes for an ECU client id.
    GetByClientId(AttributeArgs),
    /// Print the full vehicle profile.
    Profile {
        vehicle_id: String,
    },
    /// List vehicles associated with a user.
    Associated {
        user_id: String,
    },
    /// Associate a vehicle with a user.
    Associate {
        user_id: String,
        vehicle_id: String,
        /// Association status sent along with the request.
        #[arg(long)]
        status: Option<String>,
    },
    /// Remove a user/vehicle association.
    Disassociate {
        user_id: String,
        vehicle_id: String,
    },
    /// Partners qualified to receive an event for the given services.
    Partners {
        vehicle_id: String,
        event_id: String,
        /// Service ids carried by the event.
        #[arg(long = "service", short = 's', required = true)]
        services: Vec<String>,
    },
    /// The profile owner as a user context.
    UserContext {
        vehicle_id: String,
    },
}

#[derive(Debug, Args, Clone)]
pub struct AttributeArgs {
    /// Vehicle id, VIN, or client id depending on the subcommand.
    pub id: String,

    /// Attribute names (e.g. make, model, soldRegion). All registered attributes when omitted.
    pub attributes: Vec<VehicleAttribute>,
}

impl AttributeArgs {
    pub fn selected(&self) -> Vec<VehicleAttribute> {
        if self.attributes.is_empty() {
            VehicleAttribute::ALL.to_vec()
        } else {
            self.attributes.clone()
        }
    }
}
