//! Soft-deleted clinic commands.

use clinicdir_client::{find_deleted_clinic, ClinicApiClient};
use clinicdir_core::DeletedClinicSummary;

/// List one page of soft-deleted clinics.
///
/// # Errors
///
/// Returns an error if the listing request fails.
pub(crate) async fn run_deleted_list(
    client: &ClinicApiClient,
    page: u32,
    limit: u32,
) -> anyhow::Result<()> {
    let rows = client.list_deleted_clinics(page.max(1), limit.max(1)).await?;

    if rows.is_empty() {
        println!("no deleted clinics on page {page}");
        return Ok(());
    }

    let header = format!("{:<9}{:<32}{:<26}DELETED", "ID", "CLINIC", "LOCATION");
    println!("{header}");
    println!("{}", "-".repeat(header.len() + 9));
    for row in &rows {
        println!(
            "{:<9}{:<32}{:<26}{}",
            row.clinic_id,
            row.draft.clinic_name,
            location(row),
            row.deleted_at
                .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string())
        );
    }
    Ok(())
}

/// Restore a soft-deleted clinic once it is confirmed on the deleted listing.
///
/// # Errors
///
/// Returns an error if the clinic is not listed as deleted or the restore
/// request fails.
pub(crate) async fn run_restore(
    client: &ClinicApiClient,
    clinic_id: i64,
    page_size: u32,
    max_pages: u32,
) -> anyhow::Result<()> {
    let summary = find_deleted_clinic(client, clinic_id, page_size, max_pages)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                anyhow::anyhow!("clinic {clinic_id} is not in the deleted listing")
            } else {
                e.into()
            }
        })?;
    tracing::debug!(
        clinic_id,
        deleted_at = ?summary.deleted_at,
        "found clinic in deleted listing"
    );
    client.restore_clinic(clinic_id).await?;
    println!("restored clinic {clinic_id}: {}", summary.draft.clinic_name);
    Ok(())
}

fn location(row: &DeletedClinicSummary) -> String {
    match (row.draft.city.as_str(), row.draft.state.as_str()) {
        ("", "") => "-".to_string(),
        (city, "") => city.to_string(),
        ("", state) => state.to_string(),
        (city, state) => format!("{city}, {state}"),
    }
}
