use std::io;
use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use crate::cmd::prompt::{PromptAction, prompt};
use crate::context::AppContext;
use crate::domain::draft::TicketDraft;
use crate::domain::field::Field;
use crate::domain::sample::random_draft;
use crate::domain::ticket::{Source, TicketSummary};
use crate::draft_store::DraftStore;
use crate::error::{AppError, AppResult};
use crate::ui::modal::{SummaryModal, Viewport, render_banner, render_loading, render_state};
use crate::workflow::submission::TicketForm;

#[derive(Args, Debug, Clone, Default)]
pub struct SubmitArgs {
    /// Contact full name.
    #[arg(long)]
    pub name: Option<String>,
    /// Company name.
    #[arg(long)]
    pub company: Option<String>,
    /// Contact email.
    #[arg(long)]
    pub email: Option<String>,
    /// Contact phone.
    #[arg(long)]
    pub phone: Option<String>,
    /// high, medium or low (Alta, Media, Baja also accepted).
    #[arg(short, long)]
    pub priority: Option<String>,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// web, email, phone or chat.
    #[arg(long)]
    pub source: Option<String>,
    /// Service tag of an affected device. Repeatable.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Service tag to drop from a resumed or sample draft. Repeatable.
    #[arg(long = "untag")]
    pub untag: Vec<String>,
    /// Image to attach. Repeatable; non-image files are skipped.
    #[arg(short, long = "attach")]
    pub attachments: Vec<PathBuf>,
    /// Start from randomly generated test data.
    #[arg(long, conflicts_with = "resume")]
    pub sample: bool,
    /// Start from the draft saved by the last failed submission.
    #[arg(long)]
    pub resume: bool,
    /// Prompt for each field, and again for any field that fails validation.
    #[arg(short, long)]
    pub interactive: bool,
}

impl SubmitArgs {
    fn overrides(&self) -> Vec<(Field, &str)> {
        [
            (Field::ContactName, &self.name),
            (Field::CompanyName, &self.company),
            (Field::ContactEmail, &self.email),
            (Field::ContactPhone, &self.phone),
            (Field::Priority, &self.priority),
            (Field::Title, &self.title),
            (Field::Description, &self.description),
            (Field::Source, &self.source),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|value| (field, value)))
        .collect()
    }
}

/// Picks the starting draft: resumed, generated, or empty with the
/// configured source.
fn starting_draft(
    args: &SubmitArgs,
    resumed: Option<TicketDraft>,
    default_source: Source,
) -> TicketDraft {
    if args.resume {
        if let Some(draft) = resumed {
            return draft;
        }
        warn!("no saved draft to resume, starting empty");
    }
    if args.sample {
        return random_draft(&mut rand::rng());
    }
    let mut draft = TicketDraft::new();
    draft.set(Field::Source, default_source.as_str());
    draft
}

fn build_form(
    args: &SubmitArgs,
    resumed: Option<TicketDraft>,
    default_source: Source,
) -> TicketForm {
    let mut form = TicketForm::with_draft(starting_draft(args, resumed, default_source));
    for (field, value) in args.overrides() {
        form.set_field(field, value);
    }
    for tag in &args.tags {
        if !form.add_service_tag(tag) {
            warn!(tag = tag.as_str(), "ignoring empty or duplicate service tag");
        }
    }
    for tag in &args.untag {
        if !form.remove_service_tag(tag) {
            warn!(tag = tag.as_str(), "service tag not in draft");
        }
    }
    form
}

fn prompt_field(form: &mut TicketForm, field: Field) -> AppResult<bool> {
    let label = match field {
        Field::ServiceTags => format!("{} (comma separated)", field.label()),
        _ => field.label().to_string(),
    };
    if let Some(message) = form.errors().get(field) {
        println!("  ! {message}");
    }
    let current = form.draft().get(field);
    match prompt(&label, Some(current.as_str()))? {
        PromptAction::Keep => Ok(false),
        PromptAction::Clear => {
            form.set_field(field, "");
            Ok(true)
        }
        PromptAction::Set(value) => {
            form.set_field(field, value);
            Ok(true)
        }
    }
}

/// Lists the encoded attachments and drops the ones the user picks.
fn prune_attachments(form: &mut TicketForm) -> AppResult<()> {
    for (index, attachment) in form.draft().attachments.iter().enumerate() {
        println!(
            "  {}. {} ({})",
            index + 1,
            attachment.filename,
            attachment.mime_type().unwrap_or("?")
        );
    }
    let PromptAction::Set(answer) = prompt("Attachments to remove (comma separated numbers)", None)?
    else {
        return Ok(());
    };
    for index in parse_indices(&answer).into_iter().rev() {
        if let Some(removed) = form.remove_attachment(index) {
            info!(file = removed.filename.as_str(), "attachment removed");
        }
    }
    Ok(())
}

/// 1-based positions to sorted, deduplicated 0-based indices.
fn parse_indices(answer: &str) -> Vec<usize> {
    let mut indices = answer
        .split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .filter(|position| *position > 0)
        .map(|position| position - 1)
        .collect::<Vec<_>>();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Asked while the summary is open; `true` starts a fresh ticket.
fn ask_create_new() -> AppResult<bool> {
    Ok(match prompt("¿Crear otro ticket? (s/N)", None)? {
        PromptAction::Set(answer) => matches!(
            answer.to_lowercase().chars().next(),
            Some('s') | Some('y')
        ),
        PromptAction::Keep | PromptAction::Clear => false,
    })
}

/// The ticket already exists, so a failure to drop the saved draft is only
/// worth a warning.
fn forget_draft(store: &mut DraftStore) {
    store.clear();
    if let Err(err) = store.save() {
        warn!(error = %err, "ticket sent but the saved draft could not be removed");
    }
}

fn remember_draft(store: &mut DraftStore, draft: &TicketDraft) {
    store.put(draft);
    if let Err(err) = store.save() {
        warn!(error = %err, "could not save the draft for --resume");
    }
}

pub async fn run(ctx: &AppContext, args: SubmitArgs) -> AppResult<TicketSummary> {
    let mut store = DraftStore::load()?;
    let mut form = build_form(&args, store.get(), ctx.config.default_source);

    if args.interactive {
        for field in Field::ALL {
            prompt_field(&mut form, field)?;
        }
    }

    if !args.attachments.is_empty() {
        match form
            .attach_files(ctx.attachments.as_ref(), &args.attachments)
            .await
        {
            Ok(added) => info!(added, "attachments encoded"),
            Err(err) => {
                render_banner(&mut io::stdout().lock(), &err.user_message(), form.errors())?;
                return Err(err);
            }
        }
        if args.interactive {
            prune_attachments(&mut form)?;
        }
    }

    if form.draft().is_empty() && !args.interactive {
        warn!("draft is empty; pass field flags, --sample, --resume or --interactive");
    }

    drive(ctx, &args, &mut form, &mut store).await
}

/// Submits until the ticket is accepted or the user stops correcting it.
async fn drive(
    ctx: &AppContext,
    args: &SubmitArgs,
    form: &mut TicketForm,
    store: &mut DraftStore,
) -> AppResult<TicketSummary> {
    let viewport = Viewport::new();

    loop {
        render_loading(&mut io::stdout().lock())?;
        let result = form.submit(ctx.ticket_api.as_ref()).await;
        render_state(
            &mut io::stdout().lock(),
            &viewport,
            form.state(),
            form.errors(),
        )?;

        match result {
            Ok(summary) => {
                forget_draft(store);
                let modal = SummaryModal::open(&viewport, &summary);
                modal.render(&mut io::stdout().lock())?;
                let again = args.interactive && ask_create_new()?;
                modal.close();
                if !again {
                    form.dismiss();
                    return Ok(summary);
                }
                form.create_new();
                for field in Field::ALL {
                    prompt_field(form, field)?;
                }
            }
            Err(AppError::Validation(errors)) if args.interactive && !errors.is_empty() => {
                let failing = errors.iter().map(|(field, _)| field).collect::<Vec<_>>();
                form.dismiss();
                let mut changed = false;
                for field in failing {
                    changed |= prompt_field(form, field)?;
                }
                if !changed {
                    remember_draft(store, form.draft());
                    return Err(AppError::Validation(errors));
                }
            }
            Err(err) => {
                remember_draft(store, form.draft());
                return Err(err);
            }
        }
    }
}
