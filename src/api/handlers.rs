//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    AttendanceInput, FallbackPolicy, RecordInput, calculate_salary_record, plan_cash,
};
use crate::models::{AuditTrace, CalculationResult};

use super::request::{CalculationRequest, CashPlanRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/cash-plan", post(cash_plan_handler))
        .with_state(state)
}

/// Maps a JSON extraction failure to a 400 body.
fn rejection_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// Handler for POST /calculate.
///
/// Computes one salary record. Wage grades resolve strictly by month here;
/// the batch aggregator is where the latest-for-grade fallback applies.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(rejection, correlation_id).into_response(),
    };

    if let Err(err) = request.validate() {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Calculation request rejected"
        );
        return ApiErrorResponse::from(err).into_response();
    }

    let config = state.config();
    let start_time = Instant::now();
    let key = request.record_key();
    let wage_grades = request
        .wage_grades
        .as_deref()
        .unwrap_or_else(|| config.wage_grades());

    let result = calculate_salary_record(
        RecordInput {
            employee: &request.employee,
            key,
            attendance: AttendanceInput::Markers(&request.markers),
            prior: request.prior.as_ref(),
            adjustment: request.adjustment.clone().unwrap_or_default(),
        },
        wage_grades,
        FallbackPolicy::Strict,
        config.config(),
    );
    let duration_us = start_time.elapsed().as_micros() as u64;

    info!(
        correlation_id = %correlation_id,
        record = %result.record.key,
        markers_count = request.markers.len(),
        hasil_gaji = %result.record.hasil_gaji,
        warnings = result.record.warnings.len(),
        duration_us,
        "Calculation completed successfully"
    );

    let response = CalculationResult {
        calculation_id: correlation_id,
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        audit_trace: AuditTrace {
            steps: result.audit_steps,
            warnings: result.record.warnings.clone(),
            duration_us,
        },
        record: result.record,
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(response),
    )
        .into_response()
}

/// Handler for POST /cash-plan.
async fn cash_plan_handler(
    State(state): State<AppState>,
    payload: Result<Json<CashPlanRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_error(rejection, correlation_id).into_response(),
    };

    if let Err(err) = request.validate() {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Cash plan request rejected"
        );
        return ApiErrorResponse::from(err).into_response();
    }

    let plan = plan_cash(&request.amounts, state.config().config().cash());
    info!(
        correlation_id = %correlation_id,
        amounts = request.amounts.len(),
        skipped = plan.skipped,
        total = %plan.total,
        "Cash plan prepared"
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(plan),
    )
        .into_response()
}
