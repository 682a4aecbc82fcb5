//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod config_cmd;
pub mod controllers;
pub mod suspensions;
pub mod user;
pub mod util;
pub mod zones;

use hydrawise_api::Hydrawise;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, client: &Hydrawise, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::User => user::handle(client, global).await,
        Command::Controllers(args) => controllers::handle(client, args, global).await,
        Command::Zones(args) => zones::handle(client, args, global).await,
        Command::Suspensions(args) => suspensions::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
