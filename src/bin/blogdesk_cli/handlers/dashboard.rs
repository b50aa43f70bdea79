#![deny(clippy::all, clippy::pedantic)]

use blogdesk::application::access::Requirement;
use blogdesk::application::dashboard::{DashboardService, DashboardStats};
use serde_json::json;

use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx) -> Result<(), CliError> {
    let viewer = ctx.viewer(Requirement::Authenticated).await?;
    let service = DashboardService::new(ctx.api.clone(), ctx.api.clone());
    let stats = service
        .load(&viewer)
        .await
        .map_err(|err| CliError::rejected(&err.feedback("Failed to load dashboard")))?;

    match stats {
        DashboardStats::Admin {
            drafts,
            published,
            total,
            users,
        } => {
            if ctx.json {
                return print_json(&json!({
                    "drafts": drafts,
                    "published": published,
                    "total": total,
                    "users": users,
                }));
            }
            println!("Pending drafts:  {drafts}");
            println!("Published posts: {published}");
            println!("Total posts:     {total}");
            println!("Users:           {users}");
        }
        DashboardStats::User { drafts, my_posts } => {
            if ctx.json {
                return print_json(&json!({ "drafts": drafts, "myPosts": my_posts }));
            }
            println!("My drafts: {drafts}");
            println!("My posts:  {my_posts}");
        }
    }
    Ok(())
}
