//! Login and logout commands

use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::api::{HttpVisitApi, VisitApi};
use crate::domain::home_stage;
use crate::errors::{CareQueueError, Result};
use crate::fs::{clear_session, write_session};
use crate::schemas::Session;

use super::{print_json, Context};

pub const PASSWORD_ENV: &str = "CAREQUEUE_PASSWORD";

/// Log in and store the session under the home directory
pub async fn login(
    home: Option<&Path>,
    json: bool,
    email: &str,
    password: Option<&str>,
) -> Result<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => std::env::var(PASSWORD_ENV).map_err(|_| {
            CareQueueError::Validation(format!("pass --password or set {}", PASSWORD_ENV))
        })?,
    };

    let ctx = Context::load(home)?;
    let api = HttpVisitApi::from_config(&ctx.config)?;
    let response = api.login(email.trim(), &password).await?;

    let session = Session::new(response.user, response.token);
    write_session(&ctx.home, &session)?;
    info!(staff = %session.staff.id, role = %session.role(), "Logged in");

    if json {
        print_json(&session.staff)?;
    } else {
        println!(
            "Logged in as {} ({}); your queue is {}",
            session.staff.name,
            session.role(),
            home_stage(session.role())
        );
    }
    Ok(())
}

/// Remove the stored session
pub async fn logout(home: Option<&Path>, json: bool) -> Result<()> {
    let ctx = Context::load(home)?;
    let removed = clear_session(&ctx.home)?;
    if json {
        print_json(&json!({ "loggedOut": removed }))?;
    } else if removed {
        println!("Logged out");
    } else {
        println!("No session to clear");
    }
    Ok(())
}
