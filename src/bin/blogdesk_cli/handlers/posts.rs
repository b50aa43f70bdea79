#![deny(clippy::all, clippy::pedantic)]

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use blogdesk::application::access::Requirement;
use blogdesk::application::editor::{EditorMode, EditorViewModel};
use blogdesk::application::listing::ListViewModel;
use blogdesk::application::notice::Feedback;
use blogdesk::application::reader::{PostReader, ReaderState};
use blogdesk::application::selection::{BulkPublishOutcome, SelectionController};
use blogdesk::domain::posts::Partition;
use blogdesk_api_types::PostId;
use serde_json::json;

use crate::args::{PartitionArg, PostsCmd};
use crate::client::{CliError, Ctx};
use crate::io::{page_index, read_opt_value, read_value};
use crate::print::{self, print_json};

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List {
            partition,
            page,
            size,
        } => list(ctx, partition.into(), page, size).await,
        PostsCmd::Show { id } => show(ctx, &id).await,
        PostsCmd::Create {
            title,
            content,
            content_file,
            publish,
        } => {
            let content = read_value(content, content_file)?;
            create(ctx, title, content, publish).await
        }
        PostsCmd::Edit {
            id,
            title,
            content,
            content_file,
            publish,
        } => edit(ctx, &id, title, content, content_file, publish).await,
        PostsCmd::Publish {
            page,
            size,
            all,
            ids,
        } => publish(ctx, page, size, all, &ids).await,
        PostsCmd::Delete {
            id,
            partition,
            page,
        } => delete(ctx, &id, partition, page).await,
    }
}

fn report(ctx: &Ctx, feedback: &Feedback, id: Option<&PostId>) -> Result<(), CliError> {
    if ctx.json {
        return print_json(&json!({
            "kind": feedback.notice.kind.as_str(),
            "message": feedback.notice.text,
            "id": id,
            "navigate": feedback.navigate.as_ref().map(|route| route.path()),
        }));
    }
    print::feedback(feedback);
    Ok(())
}

fn listing(ctx: &Ctx, list: &ListViewModel) -> Result<(), CliError> {
    let snapshot = list.snapshot();
    if ctx.json {
        return match snapshot.page.as_deref() {
            Some(page) => print_json(page),
            None => print_json(&serde_json::Value::Null),
        };
    }
    print::listing(&snapshot);
    Ok(())
}

async fn list(
    ctx: &Ctx,
    partition: Partition,
    page: u32,
    size: Option<u32>,
) -> Result<(), CliError> {
    if partition.requires_credential() {
        let requirement = if partition.requires_admin() {
            Requirement::Admin
        } else {
            Requirement::Authenticated
        };
        ctx.viewer(requirement).await?;
    }

    let size = size.unwrap_or_else(|| ctx.page_size(partition));
    let list = ListViewModel::new(ctx.api.clone(), ctx.session.clone(), partition, size);
    if let Err(err) = list.load(page_index(page)).await {
        let message = list
            .snapshot()
            .error()
            .map_or_else(|| err.to_string(), str::to_string);
        return Err(CliError::Rejected {
            message,
            route: err.redirect(),
        });
    }
    listing(ctx, &list)
}

async fn show(ctx: &Ctx, id: &str) -> Result<(), CliError> {
    let id = PostId::from(id);
    let reader = PostReader::new(ctx.api.clone(), ctx.session.clone());
    match reader.open(&id).await {
        ReaderState::Ready(view) => {
            if ctx.json {
                return print_json(&json!({
                    "id": view.id,
                    "title": view.title,
                    "author": view.author,
                    "created": view.created,
                    "updated": view.updated,
                    "excerpt": view.excerpt,
                    "html": view.html,
                }));
            }
            println!("{}", view.title);
            println!("by {} on {}", view.author.username, view.created);
            if view.updated != view.created {
                println!("updated {}", view.updated);
            }
            println!();
            println!("{}", view.html);
            Ok(())
        }
        ReaderState::NotFound => Err(CliError::Rejected {
            message: "Post not found".to_string(),
            route: None,
        }),
        ReaderState::Failed(message) => Err(CliError::Rejected {
            message,
            route: None,
        }),
    }
}

async fn create(
    ctx: &Ctx,
    title: String,
    content: String,
    publish: bool,
) -> Result<(), CliError> {
    let viewer = ctx.viewer(Requirement::Authenticated).await?;
    let editor = EditorViewModel::new(
        ctx.api.clone(),
        ctx.session.clone(),
        viewer.capabilities,
        EditorMode::Create,
    );
    editor.open().await?;
    editor.set_title(title);
    editor.set_content(content);
    submit(ctx, &editor, publish).await
}

async fn edit(
    ctx: &Ctx,
    id: &str,
    title: Option<String>,
    content: Option<String>,
    content_file: Option<PathBuf>,
    publish: bool,
) -> Result<(), CliError> {
    let content = read_opt_value(content, content_file)?;
    let viewer = ctx.viewer(Requirement::Authenticated).await?;
    let editor = EditorViewModel::new(
        ctx.api.clone(),
        ctx.session.clone(),
        viewer.capabilities,
        EditorMode::Edit(PostId::from(id)),
    );
    if let Err(err) = editor.open().await {
        return Err(CliError::rejected(&editor.load_failure_feedback(&err)));
    }
    if let Some(title) = title {
        editor.set_title(title);
    }
    if let Some(content) = content {
        editor.set_content(content);
    }
    submit(ctx, &editor, publish).await
}

async fn submit(ctx: &Ctx, editor: &EditorViewModel, publish: bool) -> Result<(), CliError> {
    let result = if publish {
        editor
            .publish()
            .await
            .map_err(|err| err.feedback("Failed to publish post"))
    } else {
        editor
            .save()
            .await
            .map_err(|err| err.feedback("Failed to save post"))
    };
    let feedback = result.map_err(|feedback| CliError::rejected(&feedback))?;

    let id = match editor.snapshot().mode {
        EditorMode::Edit(id) => Some(id),
        EditorMode::Create => None,
    };
    report(ctx, &feedback, id.as_ref())
}

async fn publish(
    ctx: &Ctx,
    page: u32,
    size: Option<u32>,
    all: bool,
    ids: &[String],
) -> Result<(), CliError> {
    let viewer = ctx.viewer(Requirement::Authenticated).await?;
    let partition = viewer.capabilities.review_partition();
    let size = size.unwrap_or_else(|| ctx.page_size(partition));
    let list = Arc::new(ListViewModel::new(
        ctx.api.clone(),
        ctx.session.clone(),
        partition,
        size,
    ));
    let controller = SelectionController::new(list.clone());
    controller.go_to_page(page_index(page)).await?;

    if all {
        controller.toggle_select_all();
    } else {
        let on_page = list.snapshot().ids();
        let wanted: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        for raw in wanted {
            let id = on_page
                .iter()
                .find(|id| id.matches(raw))
                .cloned()
                .ok_or_else(|| {
                    CliError::InvalidInput(format!(
                        "draft {raw} is not on page {page} of {partition}"
                    ))
                })?;
            controller.toggle_select(id);
        }
    }

    let outcome = controller.publish_selected().await?;
    match (outcome, outcome.feedback()) {
        (BulkPublishOutcome::Skipped, _) | (_, None) => {
            if ctx.json {
                return print_json(&json!({
                    "kind": "skipped",
                    "message": "No drafts to publish",
                    "page": page,
                }));
            }
            println!("No drafts to publish on page {page}");
            Ok(())
        }
        (_, Some(feedback)) if feedback.notice.is_error() => Err(CliError::rejected(&feedback)),
        (_, Some(feedback)) => {
            report(ctx, &feedback, None)?;
            if !ctx.json {
                listing(ctx, &list)?;
            }
            Ok(())
        }
    }
}

async fn delete(
    ctx: &Ctx,
    id: &str,
    partition: Option<PartitionArg>,
    page: u32,
) -> Result<(), CliError> {
    let viewer = ctx.viewer(Requirement::Authenticated).await?;
    let partition = partition.map_or_else(|| viewer.capabilities.review_partition(), Into::into);
    if !viewer.capabilities.can_list(partition) {
        return Err(CliError::Rejected {
            message: format!("{partition} listing is admin only"),
            route: None,
        });
    }

    let list = ListViewModel::new(
        ctx.api.clone(),
        ctx.session.clone(),
        partition,
        ctx.page_size(partition),
    );
    list.load(page_index(page)).await?;

    let id = PostId::from(id);
    let feedback = list
        .delete(&id)
        .await
        .map_err(|err| CliError::rejected(&err.feedback("Failed to delete post")))?;
    report(ctx, &feedback, Some(&id))?;
    if !ctx.json {
        listing(ctx, &list)?;
    }
    Ok(())
}
