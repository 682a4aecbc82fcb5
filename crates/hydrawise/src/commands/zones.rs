//! Zone command handlers.

use std::fmt::Write;

use tabled::Tabled;

use hydrawise_api::{Hydrawise, Zone};

use crate::cli::{GlobalOpts, ZonesArgs, ZonesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "#")]
    number: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Running")]
    running: String,
    #[tabled(rename = "Suspended Until")]
    suspended_until: String,
}

impl From<&Zone> for ZoneRow {
    fn from(z: &Zone) -> Self {
        let running = match (z.running, z.remaining_run_time) {
            (true, Some(secs)) => format!("{} left", output::format_seconds(secs)),
            (true, None) => "yes".into(),
            (false, _) => "no".into(),
        };
        Self {
            id: z.id,
            number: z.number,
            name: z.name.clone(),
            running,
            suspended_until: latest_suspension(z).unwrap_or_default(),
        }
    }
}

fn latest_suspension(z: &Zone) -> Option<String> {
    z.suspensions
        .iter()
        .map(|s| s.until)
        .max()
        .map(|t| output::format_time(&t))
}

fn detail(z: &Zone) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:         {}", z.id);
    let _ = writeln!(out, "Number:     {}", z.number);
    let _ = writeln!(out, "Name:       {}", z.name);
    let _ = writeln!(out, "Controller: {}", z.controller_id);
    let _ = writeln!(out, "Running:    {}", z.running);
    if let Some(secs) = z.remaining_run_time {
        let _ = writeln!(out, "Remaining:  {}", output::format_seconds(secs));
    }
    for s in &z.suspensions {
        let _ = writeln!(
            out,
            "Suspension: {} (until {})",
            s.id,
            output::format_time(&s.until)
        );
    }
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(client: &Hydrawise, args: ZonesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ZonesCommand::List { controller } => {
            let controller = client.get_controller(controller).await?;
            let zones = client.get_zones(&controller).await?;
            let out = output::render_list(&global.output, &zones, |z| ZoneRow::from(z), |z| {
                z.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ZonesCommand::Get { id } => {
            let zone = client.get_zone(id).await?;
            let out = output::render_single(&global.output, &zone, detail, |z| z.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ZonesCommand::Start { id, run } => {
            let duration = util::run_seconds(&run)?;
            let zone = client.get_zone(id).await?;
            client.start_zone(&zone, run.scheduled, duration).await?;
            output::notice(&format!("Started zone '{}'", zone.name), global.quiet);
            Ok(())
        }

        ZonesCommand::Stop { id } => {
            let zone = client.get_zone(id).await?;
            client.stop_zone(&zone).await?;
            output::notice(&format!("Stopped zone '{}'", zone.name), global.quiet);
            Ok(())
        }

        ZonesCommand::Suspend { id, when } => {
            let until = util::suspend_until(&when)?;
            let zone = client.get_zone(id).await?;
            client.suspend_zone(&zone, &until).await?;
            output::notice(
                &format!(
                    "Suspended zone '{}' until {}",
                    zone.name,
                    output::format_time(&until)
                ),
                global.quiet,
            );
            Ok(())
        }

        ZonesCommand::Resume { id } => {
            let zone = client.get_zone(id).await?;
            client.resume_zone(&zone).await?;
            output::notice(&format!("Resumed zone '{}'", zone.name), global.quiet);
            Ok(())
        }
    }
}
