use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use portal_core::error::AppError;
use serde::{Deserialize, Serialize};

use crate::analytics::{
    active_only, count_with_status, extraction_csv, filter_jobs, status_counts, ChartSeries,
    JobFilter, PostedWithin,
};
use crate::models::{Application, ApplicationStatus, CurrentUser, ExtractedJob, JobOffer, User};
use crate::AppState;

#[derive(Serialize)]
pub struct SeekerDashboard {
    pub user: User,
    pub offers: Vec<JobOffer>,
    pub applications: Vec<Application>,
    pub accepted: u64,
    pub pending: u64,
    pub application_statuses: ChartSeries,
}

pub async fn dashboard(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<SeekerDashboard>, AppError> {
    let (offers, applications) = tokio::join!(
        state.api.list_job_offers(),
        state.api.applications_by_seeker(user.id)
    );
    let applications = applications?;

    Ok(Json(SeekerDashboard {
        offers: active_only(offers?),
        accepted: count_with_status(&applications, ApplicationStatus::Accepted),
        pending: count_with_status(&applications, ApplicationStatus::Pending),
        application_statuses: status_counts(&applications),
        user,
        applications,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub posted: Option<String>,
}

impl SearchParams {
    fn into_filter(self) -> Result<JobFilter, AppError> {
        let posted = match self.posted.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<PostedWithin>()
                    .map_err(|e| AppError::BadRequest(e.into()))?,
            ),
        };
        Ok(JobFilter {
            keyword: self.keyword,
            posted,
        })
    }
}

#[derive(Serialize)]
pub struct SearchResults {
    pub results: Vec<JobOffer>,
    /// Offers already extracted in this session; only those accept applications.
    pub extracted: Vec<i64>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, AppError> {
    let filter = params.into_filter()?;
    let offers = active_only(state.api.list_job_offers().await?);
    let now = chrono::Local::now().naive_local();
    let results = filter_jobs(offers, &filter, now);

    let extracted = results
        .iter()
        .map(|o| o.id)
        .filter(|id| state.extractions.contains(*id))
        .collect();

    Ok(Json(SearchResults { results, extracted }))
}

#[derive(Serialize)]
pub struct ExtractionView {
    pub job_offer_id: i64,
    pub job_title: String,
    pub extraction: ExtractedJob,
}

pub async fn extract(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExtractionView>, AppError> {
    let offer = state.api.job_offer(id).await?;
    let text = offer.source_text().ok_or_else(|| {
        AppError::BadRequest(anyhow::anyhow!("Job offer {} has no text to extract", id))
    })?;

    let extraction = state.api.extract_text(text).await?;
    let job_title = offer.display_title().to_string();
    state
        .extractions
        .insert(id, job_title.clone(), extraction.clone());

    tracing::info!(job_offer_id = id, "Job offer extracted");
    Ok(Json(ExtractionView {
        job_offer_id: id,
        job_title,
        extraction,
    }))
}

pub async fn apply(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<Application>, AppError> {
    let offer = state.api.job_offer(id).await?;
    if !offer.is_active() {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Job offer {} is not accepting applications",
            id
        )));
    }
    if !state.extractions.contains(id) {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Extract job offer {} before applying",
            id
        )));
    }

    let application = state.api.apply(user.id, id).await?;
    tracing::info!(seeker_id = user.id, job_offer_id = id, "Application submitted");
    Ok(Json(application))
}

pub async fn extraction_export(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let cached = state.extractions.get(id).ok_or_else(|| {
        AppError::NotFound(anyhow::anyhow!("No extraction for job offer {}", id))
    })?;

    let filename: String = cached
        .job_title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let disposition = format!("attachment; filename=\"job-extraction-{}.csv\"", filename);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        extraction_csv(&cached.data),
    ))
}
