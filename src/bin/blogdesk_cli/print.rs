#![deny(clippy::all, clippy::pedantic)]

use blogdesk::application::listing::ListSnapshot;
use blogdesk::application::notice::Feedback;
use blogdesk::application::pagination::{PageItem, page_strip, summary};
use blogdesk::util::time::relative_time;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

use crate::client::CliError;

pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::InvalidInput(format!("failed to render output: {e}")))?;
    println!("{out}");
    Ok(())
}

pub fn feedback(feedback: &Feedback) {
    println!("{}", feedback.notice.text);
    if let Some(route) = &feedback.navigate {
        debug!(%route, "view would navigate");
    }
}

/// Rows, summary and page strip of a loaded listing.
pub fn listing(snapshot: &ListSnapshot) {
    let Some(page) = snapshot.page.as_deref() else {
        println!("No {} loaded", snapshot.partition.noun());
        return;
    };

    let now = OffsetDateTime::now_utc();
    for post in &page.content {
        println!(
            "#{}  {}  ({}, {})",
            post.id,
            post.title,
            post.author.username,
            relative_time(&post.updated_at, now)
        );
    }
    println!("{}", summary(page));

    if page.total_pages > 1 {
        let strip: Vec<String> = page_strip(page.number, page.total_pages)
            .into_iter()
            .map(|item| match item {
                PageItem::Page(n) if n == page.number => format!("[{}]", n + 1),
                PageItem::Page(n) => (n + 1).to_string(),
                PageItem::Gap => "...".to_string(),
            })
            .collect();
        println!("Pages: {}", strip.join(" "));
    }
}
