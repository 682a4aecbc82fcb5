//! Account command handler.

use std::fmt::Write;

use hydrawise_api::{Hydrawise, User};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(u: &User) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "ID:          {}", u.id);
    let _ = writeln!(out, "Customer ID: {}", u.customer_id);
    let _ = writeln!(out, "Name:        {}", u.name);
    let _ = write!(out, "Email:       {}", u.email);
    out
}

pub async fn handle(client: &Hydrawise, global: &GlobalOpts) -> Result<(), CliError> {
    let user = client.get_user().await?;
    let out = output::render_single(&global.output, &user, detail, |u| u.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}
