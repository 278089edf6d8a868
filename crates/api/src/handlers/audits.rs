//! Handlers for the audit pipeline endpoints.
//!
//! `POST /audits` runs the whole pipeline synchronously: stage the
//! uploaded video, forward it to the remote service, wait for remote
//! processing, issue the single inference call, parse the findings, and
//! store the outcome in the session's last-result slot. The result
//! endpoints read that slot and render it as JSON or CSV.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use vidqa_core::csv::report_to_csv;
use vidqa_core::error::CoreError;
use vidqa_core::prompt::build_audit_prompt;
use vidqa_core::report::{parse_report, AuditIssue};
use vidqa_core::run::RunOutcome;
use vidqa_core::script::capture_script;
use vidqa_core::severity::{Highlight, Severity, UnknownSeverityPolicy};

use crate::config::{DEFAULT_VIDEO_MIME, VIDEO_EXTENSIONS};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::staging::StagedVideo;
use crate::state::{session_from_headers, AppState};

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One finding row plus its presentation emphasis.
///
/// The highlight is computed from the severity label and never alters
/// the row content.
#[derive(Debug, Serialize)]
pub struct IssueView {
    #[serde(flatten)]
    pub issue: AuditIssue,
    pub severity_class: Severity,
    pub highlight: Highlight,
}

/// The session's current audit outcome, as rendered to the frontend.
///
/// `clean`, `not_run`, and `parse_failure` are deliberately distinct
/// statuses: an empty findings array is a successful "clean audit".
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeView {
    NotRun,
    Clean,
    Findings { rows: Vec<IssueView> },
    ParseFailure { raw: String, message: String },
    Failed { message: String },
}

/// Envelope pairing an outcome with the session it belongs to.
#[derive(Debug, Serialize)]
pub struct SessionOutcome {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub outcome: OutcomeView,
}

fn outcome_view(outcome: &RunOutcome, policy: UnknownSeverityPolicy) -> OutcomeView {
    match outcome {
        RunOutcome::NotRun => OutcomeView::NotRun,
        RunOutcome::Clean => OutcomeView::Clean,
        RunOutcome::Findings { rows } => OutcomeView::Findings {
            rows: rows
                .iter()
                .map(|issue| {
                    let class = Severity::classify(&issue.severity);
                    IssueView {
                        issue: issue.clone(),
                        severity_class: class,
                        highlight: class.highlight(policy),
                    }
                })
                .collect(),
        },
        RunOutcome::ParseFailure { raw, message } => OutcomeView::ParseFailure {
            raw: raw.clone(),
            message: message.clone(),
        },
        RunOutcome::RunFailed { message } => OutcomeView::Failed {
            message: message.clone(),
        },
    }
}

// ---------------------------------------------------------------------------
// Run audit
// ---------------------------------------------------------------------------

/// Multipart fields collected from the upload form.
#[derive(Default)]
struct RunInput {
    video_name: Option<String>,
    video_bytes: Option<Vec<u8>>,
    script_text: Option<String>,
    script_file: Option<Vec<u8>>,
    model: Option<String>,
}

/// POST /api/v1/audits
///
/// Multipart fields: `video` (file, required), `script` (text) or
/// `script_file` (file), `model` (text, free-text override). Runs the
/// full pipeline and replaces the session's last result. A response-
/// shape failure from the model is a stored outcome, not an HTTP error;
/// upload/processing/inference failures surface as HTTP errors after
/// recording a failed run.
pub async fn run_audit(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<SessionOutcome>>)> {
    let session = session_from_headers(&headers);
    let input = collect_input(multipart).await?;

    let video_bytes = input
        .video_bytes
        .ok_or_else(|| CoreError::MissingInput("A video file is required".to_string()))?;
    let video_name = input.video_name.unwrap_or_else(|| "video.mp4".to_string());

    if let Some(ext) = video_name.rsplit('.').next() {
        if !VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
            tracing::debug!(name = %video_name, "Unusual video extension, proceeding anyway");
        }
    }

    let script = capture_script(input.script_text.as_deref(), input.script_file.as_deref())?;

    let model = match input.model.filter(|m| !m.trim().is_empty()) {
        Some(m) => m,
        None => state
            .sessions
            .model(session)
            .await
            .unwrap_or_else(|| state.config.default_model.clone()),
    };

    tracing::info!(
        %session,
        video = %video_name,
        model = %model,
        scripted = script.is_some(),
        "Starting audit run",
    );

    let outcome = match execute_run(&state, &video_name, video_bytes, script.as_deref(), &model).await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            // The run is over; record the failure before surfacing it.
            state
                .sessions
                .set_outcome(
                    session,
                    RunOutcome::RunFailed {
                        message: err.to_string(),
                    },
                )
                .await;
            return Err(err);
        }
    };

    state.sessions.set_outcome(session, outcome.clone()).await;

    Ok((
        StatusCode::OK,
        Json(DataResponse {
            data: SessionOutcome {
                session_id: session,
                outcome: outcome_view(&outcome, state.config.unknown_severity_policy),
            },
        }),
    ))
}

/// Drain the multipart stream into a [`RunInput`].
async fn collect_input(mut multipart: Multipart) -> AppResult<RunInput> {
    let mut input = RunInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "video" => {
                input.video_name = field.file_name().map(str::to_string);
                input.video_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?
                        .to_vec(),
                );
            }
            "script" => {
                input.script_text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            "script_file" => {
                input.script_file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?
                        .to_vec(),
                );
            }
            "model" => {
                input.model = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(input)
}

/// The stage -> upload -> poll -> infer -> parse pipeline for one run.
///
/// The upload is served from the staged temp file, which is dropped
/// (and removed) as soon as the remote handle exists; the remote copy
/// is deleted fire-and-forget after the inference call returns.
async fn execute_run(
    state: &AppState,
    video_name: &str,
    video_bytes: Vec<u8>,
    script: Option<&str>,
    model: &str,
) -> AppResult<RunOutcome> {
    let staged = StagedVideo::create(&state.config.staging_dir, video_name, &video_bytes)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to stage video: {e}")))?;
    // The staged file is now the source of truth for the upload.
    drop(video_bytes);

    let staged_bytes = tokio::fs::read(staged.path())
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read staged video: {e}")))?;
    let uploaded = state
        .remote
        .upload_video(staged_bytes, video_name, DEFAULT_VIDEO_MIME)
        .await?;

    // Remote handle obtained; the local copy has served its purpose.
    drop(staged);

    let cancel = CancellationToken::new();
    let ready = state.remote.await_processing(uploaded, &cancel).await?;

    let prompt = build_audit_prompt(script);
    let raw = state.remote.run_audit(&ready, &prompt, model).await?;

    // Storage-quota cleanup; a failure here must not fail the run.
    let remote = Arc::clone(&state.remote);
    let remote_name = ready.name.clone();
    tokio::spawn(async move {
        if let Err(e) = remote.delete_video(&remote_name).await {
            tracing::warn!(name = %remote_name, error = %e, "Failed to delete remote video");
        }
    });

    Ok(match parse_report(&raw) {
        Ok(rows) if rows.is_empty() => RunOutcome::Clean,
        Ok(rows) => RunOutcome::Findings { rows },
        Err(e) => RunOutcome::ParseFailure {
            raw: e.raw,
            message: e.message,
        },
    })
}

// ---------------------------------------------------------------------------
// Current result
// ---------------------------------------------------------------------------

/// GET /api/v1/audits/current
///
/// The session's last run outcome. Fresh sessions report `not_run`.
pub async fn current_result(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Json<DataResponse<SessionOutcome>>> {
    let session = session_from_headers(&headers);
    let outcome = state.sessions.outcome(session).await;

    Ok(Json(DataResponse {
        data: SessionOutcome {
            session_id: session,
            outcome: outcome_view(&outcome, state.config.unknown_severity_policy),
        },
    }))
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// GET /api/v1/audits/current/export
///
/// The current findings as a CSV attachment. A clean audit exports a
/// header-only file; sessions without a parsed result get a 400.
pub async fn export_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let session = session_from_headers(&headers);
    let outcome = state.sessions.outcome(session).await;

    let Some(rows) = outcome.rows() else {
        return Err(AppError::BadRequest(
            "No audit result available to export".to_string(),
        ));
    };

    let csv_output = report_to_csv(rows);

    Ok(axum::response::Response::builder()
        .status(200)
        .header("Content-Type", "text/csv; charset=utf-8")
        .header(
            "Content-Disposition",
            "attachment; filename=\"qa-audit-log.csv\"",
        )
        .body(axum::body::Body::from(csv_output))
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .into_response())
}
