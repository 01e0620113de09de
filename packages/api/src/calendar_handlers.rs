// ABOUTME: Read-only views derived from the task list
// ABOUTME: Tag counts and the month calendar

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use tracing::info;

use taskbook_tasks::{CalendarMonth, CalendarView, TagCount};

use crate::error::{ApiError, ApiResult};
use crate::tasks_handlers::ListParams;
use crate::AppState;

/// Distinct tags with the number of tasks carrying each
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<TagCount>>> {
    info!("Listing tags");

    let tags = state.tasks.tags().await?;
    Ok(Json(tags))
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    pub year: Option<String>,
    pub month: Option<String>,
    pub filter: Option<String>,
    pub tag: Option<String>,
    pub q: Option<String>,
}

impl CalendarParams {
    /// Requested month, defaulting to the current one
    pub fn month(&self) -> ApiResult<CalendarMonth> {
        let today = Utc::now().date_naive();

        let year = match self.year.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<i32>()
                .map_err(|_| ApiError::bad_request(format!("Invalid year: {}", raw)))?,
            _ => today.year(),
        };
        let month = match self.month.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw
                .parse::<u32>()
                .map_err(|_| ApiError::bad_request(format!("Invalid month: {}", raw)))?,
            _ => today.month(),
        };

        CalendarMonth::new(year, month)
            .ok_or_else(|| ApiError::bad_request(format!("Invalid month: {}-{}", year, month)))
    }

    fn list_params(&self) -> ListParams {
        ListParams {
            filter: self.filter.clone(),
            tag: self.tag.clone(),
            q: self.q.clone(),
        }
    }
}

/// Month grid with the tasks due on each day
pub async fn get_calendar(
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> ApiResult<Json<CalendarView>> {
    let month = params.month()?;
    info!("Calendar for {}-{:02}", month.year(), month.month());

    let view = state
        .tasks
        .calendar(month, &params.list_params().to_query())
        .await?;
    Ok(Json(view))
}
