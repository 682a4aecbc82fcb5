//! Controller command handlers.

use std::fmt::Write;

use tabled::Tabled;

use hydrawise_api::{Controller, Hydrawise};

use crate::cli::{ControllersArgs, ControllersCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ControllerRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Online")]
    online: &'static str,
    #[tabled(rename = "Software")]
    software: String,
    #[tabled(rename = "Last Contact")]
    last_contact: String,
}

impl From<&Controller> for ControllerRow {
    fn from(c: &Controller) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            online: if c.online { "yes" } else { "no" },
            software: c.software_version.clone(),
            last_contact: c
                .last_contact_time
                .as_ref()
                .map(output::format_time)
                .unwrap_or_default(),
        }
    }
}

fn detail(c: &Controller) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:           {}", c.id);
    let _ = writeln!(out, "Name:         {}", c.name);
    let _ = writeln!(out, "Online:       {}", c.online);
    let _ = writeln!(out, "Software:     {}", c.software_version);
    if let Some(ref t) = c.last_contact_time {
        let _ = writeln!(out, "Last contact: {}", output::format_time(t));
    }
    if let Some(ref serial) = c.hardware.serial_number {
        let _ = writeln!(out, "Serial:       {serial}");
    }
    if let Some(ref version) = c.hardware.version {
        let _ = writeln!(out, "Hardware:     {version}");
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &Hydrawise,
    args: ControllersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ControllersCommand::List => {
            let controllers = client.get_controllers().await?;
            let out = output::render_list(
                &global.output,
                &controllers,
                |c| ControllerRow::from(c),
                |c| c.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ControllersCommand::Get { id } => {
            let controller = client.get_controller(id).await?;
            let out =
                output::render_single(&global.output, &controller, detail, |c| c.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ControllersCommand::StartAll { id, run } => {
            let duration = util::run_seconds(&run)?;
            let controller = client.get_controller(id).await?;
            client
                .start_all_zones(&controller, run.scheduled, duration)
                .await?;
            output::notice(&format!("Started all zones on '{}'", controller.name), global.quiet);
            Ok(())
        }

        ControllersCommand::StopAll { id } => {
            let controller = client.get_controller(id).await?;
            client.stop_all_zones(&controller).await?;
            output::notice(&format!("Stopped all zones on '{}'", controller.name), global.quiet);
            Ok(())
        }

        ControllersCommand::SuspendAll { id, when } => {
            let until = util::suspend_until(&when)?;
            let controller = client.get_controller(id).await?;
            client.suspend_all_zones(&controller, &until).await?;
            output::notice(
                &format!(
                    "Suspended all zones on '{}' until {}",
                    controller.name,
                    output::format_time(&until)
                ),
                global.quiet,
            );
            Ok(())
        }

        ControllersCommand::ResumeAll { id } => {
            let controller = client.get_controller(id).await?;
            client.resume_all_zones(&controller).await?;
            output::notice(&format!("Resumed all zones on '{}'", controller.name), global.quiet);
            Ok(())
        }
    }
}
