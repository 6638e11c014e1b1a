//! HTTP client for the clinic directory REST API.
//!
//! Every response passes through the same checks: HTTP 404 becomes
//! [`ClientError::NotFound`], other non-2xx statuses become
//! [`ClientError::UnexpectedStatus`], and a `"success": false` envelope
//! becomes [`ClientError::Api`]. Payloads are normalized into canonical
//! types before they leave this module. Requests are never retried.

use std::time::Duration;

use clinicdir_core::{AppConfig, DeletedClinicSummary, ExistingClinic, Photo};
use clinicdir_review::{
    normalize, normalize_clinic, normalize_deleted_summary, normalize_photos, SourceKind,
    SubmissionPayload,
};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::Value;

use crate::error::ClientError;
use crate::types::{ApproveRequest, DraftRecord, RejectRequest};

/// Client for the clinic directory API.
///
/// Use [`ClinicApiClient::new`] with the loaded [`AppConfig`], or
/// [`ClinicApiClient::with_base_url`] to point at a mock server in tests.
pub struct ClinicApiClient {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl ClinicApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidUrl`] if the configured base URL is invalid.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.api_token.clone(),
        )
    }

    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        api_token: Option<String>,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            api_token,
        })
    }

    /// Fetches a submitted draft, plus the clinic record the API embeds for
    /// adjustment drafts.
    ///
    /// # Errors
    ///
    /// - [`ClientError::NotFound`] if the draft does not exist.
    /// - [`ClientError::Api`] on a `"success": false` envelope.
    /// - [`ClientError::Review`] if the draft is not a JSON object.
    /// - [`ClientError::Http`] / [`ClientError::UnexpectedStatus`] on transport failures.
    pub async fn get_draft(&self, draft_id: i64) -> Result<DraftRecord, ClientError> {
        let url = self.endpoint(&format!("drafts/{draft_id}"))?;
        let body = self.send(Method::GET, url.clone(), None).await?;

        let raw_draft = body
            .get("draft")
            .filter(|d| !d.is_null())
            .ok_or_else(|| ClientError::NotFound {
                resource: url.to_string(),
            })?;
        let draft = normalize(raw_draft, SourceKind::SubmittedDraft)?;

        let existing_clinic = match body.get("existingClinic") {
            Some(raw) if raw.is_object() => Some(normalize_clinic(raw)?),
            _ => None,
        };

        Ok(DraftRecord {
            draft,
            existing_clinic,
        })
    }

    /// Fetches a published clinic with its providers and procedures.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_draft`].
    pub async fn get_clinic(&self, clinic_id: i64) -> Result<ExistingClinic, ClientError> {
        let mut url = self.endpoint(&format!("clinics/{clinic_id}"))?;
        url.query_pairs_mut()
            .append_pair("include", "providers,procedures");
        let body = self.send(Method::GET, url, None).await?;
        let raw = unwrap_record(&body, "clinic");
        let mut clinic = normalize_clinic(raw)?;
        if clinic.id == 0 {
            clinic.id = clinic_id;
        }
        Ok(clinic)
    }

    /// Fetches the photos stored for a published clinic.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_draft`].
    pub async fn get_clinic_photos(&self, clinic_id: i64) -> Result<Vec<Photo>, ClientError> {
        let url = self.endpoint(&format!("clinics/{clinic_id}/photos"))?;
        let body = self.send(Method::GET, url, None).await?;
        Ok(normalize_photos(list_field(&body, "photos")))
    }

    /// Fetches one page of the soft-deleted clinic listing. Pages start at 1.
    ///
    /// Rows that are not JSON objects are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_draft`].
    pub async fn list_deleted_clinics(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<Vec<DeletedClinicSummary>, ClientError> {
        let mut url = self.endpoint("admin/clinics/deleted")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        let body = self.send(Method::GET, url, None).await?;

        Ok(list_field(&body, "clinics")
            .iter()
            .filter_map(|raw| match normalize_deleted_summary(raw) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!(page, error = %e, "skipping malformed deleted clinic row");
                    None
                }
            })
            .collect())
    }

    /// Submits an edit of a published clinic for moderation.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_draft`].
    pub async fn submit_edit(&self, payload: &SubmissionPayload) -> Result<Value, ClientError> {
        let url = self.endpoint("clinic-management/submissions")?;
        let body = serialize(payload, "submission payload")?;
        self.send(Method::POST, url, Some(body)).await
    }

    /// # Errors
    ///
    /// Same as [`Self::get_draft`].
    pub async fn approve_draft(
        &self,
        draft_id: i64,
        request: &ApproveRequest,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("admin/drafts/{draft_id}/approve"))?;
        let body = serialize(request, "approve request")?;
        self.send(Method::POST, url, Some(body)).await?;
        tracing::info!(draft_id, "draft approved");
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`Self::get_draft`].
    pub async fn reject_draft(
        &self,
        draft_id: i64,
        request: &RejectRequest,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("admin/drafts/{draft_id}/reject"))?;
        let body = serialize(request, "reject request")?;
        self.send(Method::POST, url, Some(body)).await?;
        tracing::info!(draft_id, "draft rejected");
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`Self::get_draft`].
    pub async fn restore_clinic(&self, clinic_id: i64) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("admin/clinics/{clinic_id}/restore"))?;
        self.send(Method::POST, url, None).await?;
        tracing::info!(clinic_id, "clinic restored");
        Ok(())
    }

    /// # Errors
    ///
    /// Same as [`Self::get_draft`].
    pub async fn delete_draft(&self, draft_id: i64) -> Result<(), ClientError> {
        let url = self.endpoint(&format!("admin/drafts/{draft_id}"))?;
        self.send(Method::DELETE, url, None).await?;
        tracing::info!(draft_id, "draft deleted");
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.client.request(method, url);
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends a request, maps the status, parses the JSON body, and checks
    /// the `success` flag. An empty body reads as `null`.
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        tracing::debug!(%method, %url, "clinic API request");
        let mut request = self.request(method, url.clone());
        if let Some(body) = &body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound {
                resource: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        let parsed: Value = serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
            context: url.to_string(),
            source: e,
        })?;
        check_api_error(&parsed)?;
        Ok(parsed)
    }
}

fn serialize<T: serde::Serialize>(value: &T, context: &str) -> Result<Value, ClientError> {
    serde_json::to_value(value).map_err(|e| ClientError::Serialize {
        context: context.to_string(),
        source: e,
    })
}

/// Returns an error for a `"success": false` envelope.
fn check_api_error(body: &Value) -> Result<(), ClientError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = ["message", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .unwrap_or("unknown error")
            .to_string();
        return Err(ClientError::Api(message));
    }
    Ok(())
}

/// The record under `key` when the API wraps it, otherwise the body itself.
fn unwrap_record<'a>(body: &'a Value, key: &str) -> &'a Value {
    body.get(key).filter(|v| v.is_object()).unwrap_or(body)
}

/// The array under `key`, or the body itself when it is a bare array.
fn list_field<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    body.get(key)
        .and_then(Value::as_array)
        .or_else(|| body.as_array())
        .map_or(&[][..], Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn test_client(base_url: &str) -> ClinicApiClient {
        ClinicApiClient::with_base_url(base_url, 30, "clinicdir-test", None)
            .expect("client construction should not fail")
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = test_client("https://api.clinics.test/v1");
        let url = client.endpoint("drafts/17").unwrap();
        assert_eq!(url.as_str(), "https://api.clinics.test/v1/drafts/17");

        let client = test_client("https://api.clinics.test/v1///");
        let url = client.endpoint("admin/clinics/deleted").unwrap();
        assert_eq!(url.as_str(), "https://api.clinics.test/v1/admin/clinics/deleted");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ClinicApiClient::with_base_url("not a url", 30, "ua", None)
            .err()
            .expect("should fail");
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn check_api_error_reads_message() {
        let err = check_api_error(&json!({ "success": false, "message": "Draft locked" }))
            .unwrap_err();
        assert_eq!(err.to_string(), "clinic API error: Draft locked");
        assert!(check_api_error(&json!({ "success": true })).is_ok());
        assert!(check_api_error(&json!({ "photos": [] })).is_ok());
    }

    #[test]
    fn list_field_accepts_bare_arrays() {
        let wrapped = json!({ "photos": [{ "id": 1 }] });
        let bare = json!([{ "id": 1 }, { "id": 2 }]);
        assert_eq!(list_field(&wrapped, "photos").len(), 1);
        assert_eq!(list_field(&bare, "photos").len(), 2);
        assert!(list_field(&json!({}), "photos").is_empty());
    }

    #[test]
    fn unwrap_record_prefers_wrapped_object() {
        let wrapped = json!({ "success": true, "clinic": { "id": 3 } });
        assert_eq!(unwrap_record(&wrapped, "clinic"), &json!({ "id": 3 }));
        let bare = json!({ "id": 3 });
        assert_eq!(unwrap_record(&bare, "clinic"), &bare);
    }

    #[test]
    fn serialize_failure_is_reported_as_serialization() {
        let mut body = std::collections::BTreeMap::new();
        body.insert(vec![1_u8], 1_u8);
        let err = serialize(&body, "approve request").unwrap_err();
        assert!(matches!(err, ClientError::Serialize { .. }), "got {err:?}");
        assert!(err
            .to_string()
            .starts_with("JSON serialization error for approve request"));
    }
}
