//! HTTP handlers for the Aptsign API

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use shared_types::{Notification, ResidentId};
use signature_store::{
    append_notification, clear_notifications as clear_notification_log, list_notifications,
    load_base_document, record_signature, save_base_document, SignatureSubmission,
};

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Exchange the shared admin password for a session token.
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.password != state.config.admin_password {
        return Err(ApiError::Unauthorized);
    }

    let token = Uuid::new_v4().to_string();
    state
        .admin_tokens
        .write()
        .expect("lock poisoned")
        .insert(token.clone());

    tracing::info!("admin logged in");
    Ok(Json(LoginResponse { token }))
}

fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let token = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?;

    if state
        .admin_tokens
        .read()
        .expect("lock poisoned")
        .contains(token)
    {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

/// Store the base document everyone signs against.
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, ApiError> {
    require_admin(&state, &headers)?;

    let bytes = BASE64
        .decode(&req.pdf_base64)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid PDF base64: {}", e)))?;

    save_base_document(state.blobs.as_ref(), &bytes)?;
    let document_hash = hex::encode(Sha256::digest(&bytes));

    tracing::info!(
        "uploaded base document {} ({} bytes, sha256 {})",
        req.filename,
        bytes.len(),
        document_hash
    );

    Ok(Json(UploadResponse {
        document_hash,
        size: bytes.len(),
    }))
}

/// Serve the current base document for the signer view.
pub async fn get_document(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, [(String, String); 2], Vec<u8>), ApiError> {
    let bytes = load_base_document(state.blobs.as_ref())?.ok_or(ApiError::NoDocument)?;

    Ok((
        StatusCode::OK,
        [
            ("Content-Type".to_string(), "application/pdf".to_string()),
            (
                "Content-Disposition".to_string(),
                "inline; filename=\"document.pdf\"".to_string(),
            ),
        ],
        bytes,
    ))
}

/// Per-apartment signing status plus completion progress.
pub async fn roster_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RosterResponse>, ApiError> {
    let book = state.book.read().expect("lock poisoned");

    let apartments: Vec<ApartmentStatus> = state
        .roster
        .iter()
        .map(|resident| {
            let record = book.get(&resident.id);
            ApartmentStatus {
                id: resident.id.get(),
                label: resident.label.clone(),
                signed: record.is_some(),
                full_name: record.map(|r| r.full_name.clone()),
                date_value: record.map(|r| r.date_value.clone()),
                signed_at: record.map(|r| r.signed_at),
            }
        })
        .collect();

    let signed = apartments.iter().filter(|a| a.signed).count();
    let total = apartments.len();
    let percentage = ((signed as f64 / total as f64) * 100.0).round() as u32;

    Ok(Json(RosterResponse {
        apartments,
        signed,
        total,
        percentage,
    }))
}

/// The shareable signing URL for one apartment.
pub async fn sign_link(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<u32>,
) -> Result<Json<SignLinkResponse>, ApiError> {
    let id = ResidentId::new(raw_id).map_err(|_| ApiError::UnknownApartment(raw_id))?;

    Ok(Json(SignLinkResponse {
        url: format!(
            "{}/?apt={}",
            state.config.public_url.trim_end_matches('/'),
            id
        ),
    }))
}

/// The signing flow: validate, upsert the record, persist the book, notify
/// the admin.
pub async fn sign(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<u32>,
    Json(req): Json<SignRequest>,
) -> Result<Json<SignResponse>, ApiError> {
    let resident_id = ResidentId::new(raw_id).map_err(|_| ApiError::UnknownApartment(raw_id))?;

    let signature_png = BASE64
        .decode(&req.signature_png_base64)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid signature base64: {}", e)))?;

    let submission = SignatureSubmission {
        resident_id,
        full_name: req.full_name,
        date_value: req.date_value,
        email: req.email,
        phone: req.phone,
        signature_png,
    };

    let record = {
        let mut book = state.book.write().expect("lock poisoned");
        record_signature(&mut book, state.blobs.as_ref(), submission)?
    };

    // the notification log is advisory; a failure to append never fails the
    // signing itself
    let notification = Notification::signed(resident_id, &record.full_name);
    if let Err(e) = append_notification(state.blobs.as_ref(), notification) {
        tracing::warn!("failed to append notification: {}", e);
    }

    tracing::info!(
        "recorded signature for apartment {} ({})",
        resident_id,
        record.full_name
    );

    Ok(Json(SignResponse {
        resident_id: resident_id.get(),
        signed_at: record.signed_at,
    }))
}

/// Assemble and download the signed document.
pub async fn export(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, [(String, String); 2], Vec<u8>), ApiError> {
    require_admin(&state, &headers)?;

    // only one export at a time; concurrent triggers get a conflict instead
    // of interleaving
    let _guard = state
        .export_guard
        .try_lock()
        .map_err(|_| ApiError::ExportInFlight)?;

    let base = load_base_document(state.blobs.as_ref())?.ok_or(ApiError::NoDocument)?;
    let book = state.book.read().expect("lock poisoned").clone();

    let output = assembly_core::assemble(&base, &state.roster, &book)?;

    let filename = format!("signed-document-{}.pdf", Utc::now().format("%Y-%m-%d"));
    tracing::info!(
        "exported {} ({} bytes, {} signatures)",
        filename,
        output.len(),
        book.len()
    );

    Ok((
        StatusCode::OK,
        [
            ("Content-Type".to_string(), "application/pdf".to_string()),
            (
                "Content-Disposition".to_string(),
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        output,
    ))
}

/// List pending signing notifications.
pub async fn notifications(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<NotificationsResponse>, ApiError> {
    require_admin(&state, &headers)?;

    Ok(Json(NotificationsResponse {
        notifications: list_notifications(state.blobs.as_ref())?,
    }))
}

/// Acknowledge (and wholesale clear) the notification log.
pub async fn clear_notifications(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers)?;

    clear_notification_log(state.blobs.as_ref())?;
    Ok(StatusCode::NO_CONTENT)
}
