//! HTTP API module for the payroll engine.
//!
//! A thin axum surface: `/calculate` computes a single record and
//! `/cash-plan` counts the notes and coins for a list of net amounts.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, CashPlanRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
