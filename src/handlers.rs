use crate::errors::AppError;
use crate::models::{
    ClassifyQuery, ClassifyResponse, MealContext, PremiumRequest, PremiumResponse, Reading,
    ReadingsResponse, SaveReadingRequest, SeriesResponse,
};
use crate::state::AppState;
use crate::ui::render_index;
use crate::validate::{parse_recorded_at, validate_reading};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::Utc;
use tracing::warn;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(state.config.scheme, state.entitlements.is_premium()))
}

pub async fn list_readings(State(state): State<AppState>) -> Json<ReadingsResponse> {
    let dashboard = state.feed.current().await;
    Json(ReadingsResponse {
        readings: dashboard.items,
    })
}

pub async fn create_reading(
    State(state): State<AppState>,
    Json(payload): Json<SaveReadingRequest>,
) -> Result<(StatusCode, Json<Reading>), AppError> {
    let reading = save_reading(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(reading)))
}

pub async fn submit_reading_form(
    State(state): State<AppState>,
    Form(payload): Form<SaveReadingRequest>,
) -> Result<Redirect, AppError> {
    save_reading(&state, payload).await?;
    Ok(Redirect::to("/"))
}

pub async fn get_series(State(state): State<AppState>) -> Result<Json<SeriesResponse>, AppError> {
    if !state.entitlements.is_premium() {
        return Err(AppError::payment_required("premium plan required to view the trend chart"));
    }

    let series = state.feed.current().await.series;
    Ok(Json(SeriesResponse {
        enough_data: !series.is_empty(),
        labels: series.labels(),
        data: series.values(),
    }))
}

pub async fn classify_value(
    State(state): State<AppState>,
    Query(query): Query<ClassifyQuery>,
) -> Result<Json<ClassifyResponse>, AppError> {
    let draft = validate_reading(&query.value)?;
    let context = context_or_default(query.context.as_deref());
    Ok(Json(ClassifyResponse {
        value: draft.value,
        context,
        status: state.config.scheme.classify(draft.value, context),
    }))
}

pub async fn get_premium(State(state): State<AppState>) -> Json<PremiumResponse> {
    Json(PremiumResponse {
        premium: state.entitlements.is_premium(),
    })
}

pub async fn set_premium(
    State(state): State<AppState>,
    Json(payload): Json<PremiumRequest>,
) -> Json<PremiumResponse> {
    state.entitlements.set(payload.enabled);
    Json(PremiumResponse {
        premium: state.entitlements.is_premium(),
    })
}

async fn save_reading(state: &AppState, payload: SaveReadingRequest) -> Result<Reading, AppError> {
    let draft = validate_reading(&payload.value).inspect_err(|err| warn!("rejected reading: {err}"))?;
    let recorded_at = parse_recorded_at(payload.recorded_at.as_deref(), Utc::now())?;
    let context = context_or_default(payload.context.as_deref());

    let new = draft.into_new_reading(context, recorded_at, state.config.scheme);
    Ok(state.store.append(new).await?)
}

fn context_or_default(raw: Option<&str>) -> MealContext {
    match raw {
        None => MealContext::default(),
        Some(tag) => MealContext::from_tag(tag),
    }
}
