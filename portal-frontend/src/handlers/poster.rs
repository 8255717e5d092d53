use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Form, Json,
};
use portal_core::error::AppError;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::analytics::{monthly_counts, status_counts, ChartSeries};
use crate::models::{
    Application, ApplicationStatus, CurrentUser, JobFile, JobOffer, NewPosting, User,
};
use crate::AppState;

const UNKNOWN_COMPANY: &str = "Unknown Company";

#[derive(Serialize)]
pub struct PosterDashboard {
    pub user: User,
    pub offers: Vec<JobOffer>,
    pub active_offers: usize,
    pub applications: Vec<Application>,
    pub offers_by_month: ChartSeries,
    pub application_statuses: ChartSeries,
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PosterDashboard>, AppError> {
    let (offers, applications) = tokio::join!(
        state.api.job_offers_by_offerer(user.id),
        state.api.applications_by_offerer(user.id)
    );
    let offers = offers?;
    let applications = applications?;

    Ok(Json(PosterDashboard {
        active_offers: offers.iter().filter(|o| o.is_active()).count(),
        offers_by_month: monthly_counts(offers.iter().filter_map(|o| o.created_at)),
        application_statuses: status_counts(&applications),
        user,
        offers,
        applications,
    }))
}

pub async fn postings(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<JobOffer>>, AppError> {
    Ok(Json(state.api.job_offers_by_offerer(user.id).await?))
}

/// Runs the posting text through the extractor, then creates the offer from its result.
pub async fn create_posting(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(posting): Form<NewPosting>,
) -> Result<(StatusCode, Json<JobOffer>), AppError> {
    posting.validate()?;

    let extracted = state.api.extract_text(&posting.description).await?;
    let company = extracted
        .company()
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());
    let description = extracted.raw_text().unwrap_or(posting.description);

    let offer = state
        .api
        .create_job_offer(user.id, &posting.title, &company, &description)
        .await?;

    tracing::info!(
        offerer_id = user.id,
        job_offer_id = offer.id,
        company = %company,
        "Job offer created"
    );
    Ok((StatusCode::CREATED, Json(offer)))
}

/// Creates an offer from an uploaded description document.
///
/// Expects a `file` part and an optional `title` field; a blank title is
/// derived from the file name.
pub async fn upload_posting(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<JobOffer>), AppError> {
    let mut title = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.into()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.into()))?;
                title = Some(text.trim().to_string()).filter(|t| !t.is_empty());
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("job-offer").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| {
                    tracing::error!("Failed to read uploaded file {}: {}", file_name, e);
                    AppError::BadRequest(e.into())
                })?;
                file = Some((file_name, content_type, data.to_vec()));
            }
            _ => {}
        }
    }

    let Some((file_name, content_type, data)) = file else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Select a job description file to upload"
        )));
    };
    let upload = JobFile {
        title: title.unwrap_or_else(|| JobFile::title_from_file_name(&file_name)),
        file_name,
        content_type,
        data,
    };
    upload.validate()?;

    let file_name = upload.file_name.clone();
    let offer = state.api.upload_job_offer(user.id, upload).await?;

    tracing::info!(
        offerer_id = user.id,
        job_offer_id = offer.id,
        file_name = %file_name,
        "Job offer created from file"
    );
    Ok((StatusCode::CREATED, Json(offer)))
}

#[derive(Deserialize)]
pub struct PostingStatusUpdate {
    pub active: bool,
}

pub async fn set_posting_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<PostingStatusUpdate>,
) -> Result<Json<JobOffer>, AppError> {
    ensure_owner(&state, &user, id).await?;
    let offer = state.api.set_job_offer_active(id, update.active).await?;
    tracing::info!(job_offer_id = id, active = update.active, "Job offer status updated");
    Ok(Json(offer))
}

pub async fn delete_posting(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    ensure_owner(&state, &user, id).await?;
    state.api.delete_job_offer(id).await?;
    state.extractions.remove(id);
    tracing::info!(job_offer_id = id, "Job offer deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct ApplicationStatusUpdate {
    pub status: ApplicationStatus,
}

pub async fn set_application_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<ApplicationStatusUpdate>,
) -> Result<Json<Application>, AppError> {
    let received = state.api.applications_by_offerer(user.id).await?;
    if !received.iter().any(|a| a.id == id) {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Application {} was not made to one of your offers",
            id
        )));
    }

    let application = state.api.set_application_status(id, update.status).await?;
    tracing::info!(
        offerer_id = user.id,
        application_id = id,
        status = %update.status,
        "Application status updated"
    );
    Ok(Json(application))
}

async fn ensure_owner(state: &AppState, user: &User, job_offer_id: i64) -> Result<(), AppError> {
    let offer = state.api.job_offer(job_offer_id).await?;
    if offer.offerer_id != Some(user.id) {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Job offer {} belongs to another poster",
            job_offer_id
        )));
    }
    Ok(())
}
