#![deny(clippy::all, clippy::pedantic)]

use blogdesk::application::access::{Requirement, Viewer};
use blogdesk::application::session::{Credential, CredentialStore};
use blogdesk::config::SessionSettings;
use blogdesk::infra::session_store::FileCredentialStore;
use serde_json::json;
use tracing::info;

use crate::args::LoginArgs;
use crate::client::{CliError, Ctx, read_token};
use crate::print::print_json;

pub async fn login(ctx: &Ctx, args: &LoginArgs) -> Result<(), CliError> {
    let token = read_token(args)?;
    ctx.session.set(Credential::new(token))?;
    let viewer = ctx.viewer(Requirement::Authenticated).await?;
    info!(user = %viewer.user.username, "signed in");
    if ctx.json {
        return print_viewer(ctx, &viewer);
    }
    println!(
        "Signed in as {} ({})",
        viewer.user.username,
        viewer.user.role.as_str()
    );
    Ok(())
}

/// Works on the store directly, so an unreadable session file can still be reset.
pub fn logout(settings: &SessionSettings) -> Result<(), CliError> {
    FileCredentialStore::new(&settings.path).remove()?;
    info!("signed out");
    println!("Signed out");
    Ok(())
}

pub async fn whoami(ctx: &Ctx) -> Result<(), CliError> {
    let viewer = ctx.viewer(Requirement::Authenticated).await?;
    print_viewer(ctx, &viewer)
}

fn print_viewer(ctx: &Ctx, viewer: &Viewer) -> Result<(), CliError> {
    let caps = viewer.capabilities;
    if ctx.json {
        return print_json(&json!({
            "user": viewer.user,
            "capabilities": {
                "canPublish": caps.can_publish,
                "canViewAllDrafts": caps.can_view_all_drafts,
                "canViewUserCount": caps.can_view_user_count,
                "canAccessAdmin": caps.can_access_admin,
            },
            "dashboard": caps.dashboard_route().path(),
        }));
    }

    println!("{} <{}>", viewer.user.username, viewer.user.email);
    println!("role: {}", viewer.user.role.as_str());
    println!("dashboard: {}", caps.dashboard_route());
    let mut allowed = Vec::new();
    if caps.can_publish {
        allowed.push("publish");
    }
    if caps.can_view_all_drafts {
        allowed.push("review all drafts");
    }
    if caps.can_view_user_count {
        allowed.push("view user count");
    }
    println!("can: {}", allowed.join(", "));
    Ok(())
}
