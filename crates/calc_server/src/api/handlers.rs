use crate::api::dto::{CalculationDto, CreateCalculationRequest, MessageResponse};
use crate::api::error::{ApiError, MISSING_FIELDS_MESSAGE};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use calc_core::NewCalculation;
use log::debug;

pub async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<CalculationDto>>, ApiError> {
    let records = state
        .with_history(|service| service.list_recent().map_err(ApiError::from))
        .await?;
    Ok(Json(records.into_iter().map(CalculationDto::from).collect()))
}

pub async fn create_history(
    State(state): State<AppState>,
    payload: Result<Json<CreateCalculationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CalculationDto>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("event=history_create module=api status=rejected reason={rejection}");
        ApiError::bad_request(MISSING_FIELDS_MESSAGE)
    })?;
    let calculation = NewCalculation::from(request);

    let record = state
        .with_history(move |service| {
            service
                .create(calculation)
                .map_err(ApiError::create_failed)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn clear_history(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .with_history(|service| service.clear().map_err(ApiError::from))
        .await?;
    Ok(Json(MessageResponse::new("History cleared")))
}

pub async fn delete_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .with_history(move |service| service.delete(&id).map_err(ApiError::from))
        .await?;
    Ok(Json(MessageResponse::new("Calculation deleted")))
}
