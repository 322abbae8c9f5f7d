//! Project timeline handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pd_auth::{require, Action};
use pd_core::traits::{Entity, Id};
use pd_core::PdError;
use pd_models::{validate, CreateMilestoneDto, CreatePushDto, Milestone, Project, Push};
use pd_timeline::{
    current_push_on, days_remaining, filter_by_range, format_date, format_date_range,
    format_year_range, get_year_range, push_label, YearRange,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::extractors::{AppState, CurrentSession};

async fn load_project(state: &AppState, id: Id) -> ApiResult<Project> {
    state
        .projects
        .find_project(id)
        .await?
        .ok_or_else(|| PdError::not_found(Project::TYPE_NAME, id).into())
}

async fn load_writable_project(state: &AppState, id: Id) -> ApiResult<Project> {
    let project = load_project(state, id).await?;
    project.ensure_writable()?;
    Ok(project)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPushResponse {
    pub project_id: Id,
    pub push: Option<Push>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}

/// The push in progress today
///
/// GET /api/projects/:id/current-push
pub async fn get_current_push(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(project_id): Path<Id>,
) -> ApiResult<Json<CurrentPushResponse>> {
    require(&session, Action::ViewProjects)?;
    load_project(&state, project_id).await?;

    let pushes = state.projects.pushes_for(project_id).await?;
    let today = state.clock.today();
    let current = current_push_on(&pushes, today);

    tracing::debug!(
        project_id,
        candidates = pushes.len(),
        current = ?current.map(|p| p.sequence_index),
        "Resolved current push"
    );

    Ok(Json(CurrentPushResponse {
        project_id,
        label: current.map(push_label),
        date_range: current.map(|p| format_date_range(p.start_date, p.end_date)),
        days_remaining: current.map(|p| days_remaining(p, today)),
        push: current.cloned(),
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineParams {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(flatten)]
    pub milestone: Milestone,
    pub date_label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    pub project_id: Id,
    pub range: YearRange,
    /// Span of all milestones, for the range picker
    pub available: YearRange,
    pub range_label: String,
    pub milestones: Vec<TimelineEntry>,
}

/// Milestones within a year range, oldest first
///
/// GET /api/projects/:id/timeline?startYear=&endYear=
///
/// Missing bounds default to the span of the project's milestones.
pub async fn get_timeline(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(project_id): Path<Id>,
    Query(params): Query<TimelineParams>,
) -> ApiResult<Json<TimelineResponse>> {
    require(&session, Action::ViewProjects)?;
    load_project(&state, project_id).await?;

    let milestones = state.projects.milestones_for(project_id).await?;
    let available = get_year_range(&milestones, state.clock.as_ref());
    let range = YearRange::new(
        params.start_year.unwrap_or(available.start_year()),
        params.end_year.unwrap_or(available.end_year()),
    )?;

    let entries: Vec<TimelineEntry> = filter_by_range(&milestones, &range)
        .into_iter()
        .map(|m| TimelineEntry {
            date_label: format_date(m.date),
            milestone: m.clone(),
        })
        .collect();

    tracing::debug!(
        project_id,
        start_year = range.start_year(),
        end_year = range.end_year(),
        total = milestones.len(),
        shown = entries.len(),
        "Filtered timeline"
    );

    Ok(Json(TimelineResponse {
        project_id,
        range_label: format_year_range(&range),
        range,
        available,
        milestones: entries,
    }))
}

/// Add a milestone
///
/// POST /api/projects/:id/milestones
pub async fn create_milestone(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(project_id): Path<Id>,
    Json(dto): Json<CreateMilestoneDto>,
) -> ApiResult<impl IntoResponse> {
    require(&session, Action::ManageMilestones)?;
    load_writable_project(&state, project_id).await?;

    let milestone = dto.into_milestone(project_id);
    validate(&milestone)?;

    let milestone = state.projects.insert_milestone(milestone).await?;
    tracing::info!(project_id, milestone_id = ?milestone.id, user_id = %session.user_id, "{} created", Milestone::TYPE_NAME);

    Ok((StatusCode::CREATED, Json(milestone)))
}

/// Add a push
///
/// POST /api/projects/:id/pushes
pub async fn create_push(
    State(state): State<AppState>,
    session: CurrentSession,
    Path(project_id): Path<Id>,
    Json(dto): Json<CreatePushDto>,
) -> ApiResult<impl IntoResponse> {
    require(&session, Action::ManagePushes)?;
    load_writable_project(&state, project_id).await?;

    let push = dto.into_push(project_id);
    validate(&push)?;

    let push = state.projects.insert_push(push).await?;
    tracing::info!(project_id, push_id = ?push.id, sequence = push.sequence_index, user_id = %session.user_id, "{} created", Push::TYPE_NAME);

    Ok((StatusCode::CREATED, Json(push)))
}
