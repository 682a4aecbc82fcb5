//! Suspension command handlers.

use hydrawise_api::Hydrawise;

use crate::cli::{GlobalOpts, SuspensionsArgs, SuspensionsCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    client: &Hydrawise,
    args: SuspensionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SuspensionsCommand::Delete { id, zone } => {
            let zone = client.get_zone(zone).await?;
            let suspension = zone
                .suspensions
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "suspension".into(),
                    identifier: id.to_string(),
                    list_command: format!("zones get {}", zone.id),
                })?;
            client.delete_zone_suspension(suspension).await?;
            output::notice(
                &format!("Deleted suspension {id} from zone '{}'", zone.name),
                global.quiet,
            );
            Ok(())
        }
    }
}
