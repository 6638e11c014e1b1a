//! Draft review commands: inspect, preview and decide on a pending draft.

use clinicdir_client::{load_review_session, ApproveRequest, ClinicApiClient, RejectRequest};
use clinicdir_review::{
    build_preview, ChangeKind, DiffResult, PhotoSelection, Preview, RatingOptions, ReviewOutcome,
    ReviewSession, ReviewState,
};

const VALUE_WIDTH: usize = 30;

/// Loads a draft into a review session, turning a missing draft or a failed
/// load into an error.
async fn ready_session(client: &ClinicApiClient, draft_id: i64) -> anyhow::Result<ReviewSession> {
    let session = load_review_session(client, draft_id).await;
    match session.state() {
        ReviewState::Ready { .. } => Ok(session),
        ReviewState::NotFound => anyhow::bail!("draft {draft_id} not found"),
        ReviewState::Error { message } => {
            anyhow::bail!("failed to load draft {draft_id}: {message}")
        }
        other => anyhow::bail!("draft {draft_id} is not reviewable ({})", other.name()),
    }
}

/// Show a draft and, for an adjustment draft, the changes it proposes.
///
/// # Errors
///
/// Returns an error if the draft cannot be loaded.
pub(crate) async fn run_review(
    client: &ClinicApiClient,
    draft_id: i64,
    json: bool,
) -> anyhow::Result<()> {
    let session = ready_session(client, draft_id).await?;
    let diff = session.diff();

    if json {
        let body = serde_json::json!({
            "review": session.state(),
            "merged": session.merged_draft(),
            "diff": diff,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let ReviewState::Ready { draft, existing, .. } = session.state() else {
        anyhow::bail!("draft {draft_id} is not reviewable");
    };
    println!(
        "draft {draft_id}: {} ({})",
        display_or_dash(&draft.clinic_name),
        draft.submission_flow.as_str()
    );

    match (existing, diff) {
        (Some(clinic), Some(diff)) => {
            println!("targets clinic {}: {}", clinic.id, clinic.clinic_name);
            print_diff(&diff);
        }
        _ => println!("new listing; nothing to compare against"),
    }
    Ok(())
}

fn print_diff(diff: &DiffResult) {
    if !diff.has_changes {
        println!("no changes proposed");
        return;
    }

    if !diff.field_changes.is_empty() {
        let header = format!(
            "{:<22}{:<9}{:<w$}PROPOSED",
            "FIELD",
            "KIND",
            "PREVIOUS",
            w = VALUE_WIDTH
        );
        println!("{header}");
        println!("{}", "-".repeat(header.len()));
        for change in &diff.field_changes {
            println!(
                "{:<22}{:<9}{:<w$}{}",
                change.label,
                kind_label(change.kind),
                truncate(&change.previous.to_string(), VALUE_WIDTH - 2),
                truncate(&change.proposed.to_string(), VALUE_WIDTH - 2),
                w = VALUE_WIDTH
            );
        }
    }

    for provider in &diff.new_providers {
        println!("+ provider   {}", provider.provider_name);
    }
    for procedure in &diff.new_procedures {
        println!(
            "+ procedure  {} ({})",
            procedure.procedure_name,
            display_or_dash(&procedure.category)
        );
    }
    if !diff.new_photos.is_empty() {
        println!("+ {} new photo(s)", diff.new_photos.len());
    }
    if diff.google_photos_changed {
        println!("* Google photo set changed");
    }
}

/// Render the listing a draft would publish with the given choices.
///
/// # Errors
///
/// Returns an error if the draft cannot be loaded.
pub(crate) async fn run_preview(
    client: &ClinicApiClient,
    draft_id: i64,
    photos: PhotoSelection,
    rating: &RatingOptions,
    json: bool,
) -> anyhow::Result<()> {
    let session = ready_session(client, draft_id).await?;
    let merged = session
        .merged_draft()
        .ok_or_else(|| anyhow::anyhow!("draft {draft_id} has nothing to preview"))?;
    let preview = build_preview(&merged, rating, photos);

    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        print_preview(&preview);
    }
    Ok(())
}

fn print_preview(preview: &Preview) {
    let clinic = &preview.clinic;
    println!("{}", display_or_dash(&clinic.clinic_name));
    println!(
        "{}, {}, {} {}",
        display_or_dash(&clinic.address),
        display_or_dash(&clinic.city),
        clinic.state,
        clinic.zip_code
    );
    println!("rating {:.1} ({} reviews)", clinic.rating, clinic.review_count);
    for day in &clinic.working_hours {
        println!("  {:<11}{}", day.day, day.hours);
    }

    if !preview.providers.is_empty() {
        println!("providers:");
        for provider in &preview.providers {
            println!("  {}", provider.name);
        }
    }

    for group in &preview.procedures {
        println!("{}:", group.category);
        for procedure in &group.procedures {
            println!(
                "  {:<32}{}",
                procedure.name,
                procedure.display_price.as_deref().unwrap_or("-")
            );
        }
    }

    println!("{} photo(s)", preview.photos.len());
}

/// Approve a draft after confirming it loads into a reviewable state.
///
/// # Errors
///
/// Returns an error if the draft cannot be loaded or the API rejects the
/// approval.
pub(crate) async fn run_approve(
    client: &ClinicApiClient,
    draft_id: i64,
    photos: PhotoSelection,
    rating: &RatingOptions,
) -> anyhow::Result<()> {
    let session = ready_session(client, draft_id).await?;
    let finished = session.finish(ReviewOutcome::Approved)?;
    client
        .approve_draft(draft_id, &ApproveRequest::new(photos, rating))
        .await?;
    println!("draft {draft_id}: {}", finished.state().name());
    Ok(())
}

/// Reject a draft with an optional reason.
///
/// # Errors
///
/// Returns an error if the API rejects the request.
pub(crate) async fn run_reject(
    client: &ClinicApiClient,
    draft_id: i64,
    reason: Option<&str>,
) -> anyhow::Result<()> {
    client
        .reject_draft(draft_id, &RejectRequest::new(reason))
        .await?;
    println!("draft {draft_id}: rejected");
    Ok(())
}

/// Delete a draft without publishing it.
///
/// # Errors
///
/// Returns an error if the API rejects the request.
pub(crate) async fn run_delete(client: &ClinicApiClient, draft_id: i64) -> anyhow::Result<()> {
    client.delete_draft(draft_id).await?;
    println!("draft {draft_id}: deleted");
    Ok(())
}

fn kind_label(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Changed => "changed",
        ChangeKind::Added => "added",
    }
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Shortens `value` to at most `max` characters, marking the cut with `~`.
fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_values() {
        assert_eq!(truncate("Acme", 10), "Acme");
    }

    #[test]
    fn truncate_marks_cut_on_char_boundary() {
        assert_eq!(truncate("Café Élan Aesthetics", 6), "Café ~");
    }

    #[test]
    fn blank_values_render_as_dash() {
        assert_eq!(display_or_dash("  "), "-");
        assert_eq!(display_or_dash("Botox"), "Botox");
    }
}
