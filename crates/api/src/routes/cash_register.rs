//! Cash register routes.
//!
//! The register is one shared drawer: at most one session is open at a
//! time, and each business date gets at most one session. Handlers
//! translate HTTP payloads into repository inputs and map rule
//! violations to stable error codes; every mutation resolves "today"
//! in the store timezone, not UTC.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use arqo_core::{CountedAmount, MovementKind, RegisterError, SessionStatus};
use arqo_db::entities::{cash_movements, cash_sessions};
use arqo_db::repositories::{
    CloseSessionInput, MovementRepository, MovementWithMethod, OpenSessionInput, RepositoryError,
    SessionDetail, SessionFilter, SessionRepository, session::LedgerLine,
};
use arqo_shared::time::today_in;
use arqo_shared::types::PageRequest;

/// Creates the cash register routes (requires auth middleware to be applied
/// externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cash-register/open", post(open_register))
        .route("/cash-register/close", post(close_register))
        .route("/cash-register/current", get(get_current))
        .route("/cash-register/status", get(get_status))
        .route(
            "/cash-register/suggested-initial",
            get(get_suggested_initial),
        )
        .route("/cash-register/movements", post(create_movement))
        .route("/cash-register/history", get(get_history))
        .route("/cash-register/{id}", get(get_session))
        .route("/cash-register/{id}/reopen", post(reopen_register))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for opening the register.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenRegisterRequest {
    /// Opening cash float counted into the drawer.
    pub initial_amount: Decimal,
    /// True when the cashier overrode the suggested float.
    #[serde(default)]
    pub manually_adjusted: bool,
    /// Why the suggested float was overridden.
    pub adjustment_reason: Option<String>,
    /// Free-form opening notes.
    pub opening_notes: Option<String>,
}

/// Request body for closing the register.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseRegisterRequest {
    /// Cash counted in the drawer at close.
    pub actual_cash_amount: Decimal,
    /// Counted amounts for non-cash methods; uncounted methods are
    /// assumed exact.
    #[serde(default)]
    pub actual_amounts: Vec<CountedAmountRequest>,
    /// Free-form closing notes.
    pub closing_notes: Option<String>,
}

/// One counted amount for a payment method at close.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountedAmountRequest {
    /// The payment method that was counted.
    pub payment_method_id: Uuid,
    /// The counted amount.
    pub amount: Decimal,
}

/// Request body for recording a manual movement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMovementRequest {
    /// Direction: `income` or `expense`.
    pub movement_type: String,
    /// Payment method the money moved through.
    pub payment_method_id: Uuid,
    /// Non-negative amount.
    pub amount: Decimal,
    /// What the movement is for.
    pub description: String,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Query parameters for the session history list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub limit: Option<u32>,
    /// Exact business date; takes priority over the range filter.
    pub date: Option<NaiveDate>,
    /// Range start (inclusive).
    pub start_date: Option<NaiveDate>,
    /// Range end (inclusive).
    pub end_date: Option<NaiveDate>,
}

// ============================================================================
// Response Types
// ============================================================================

/// A cash session in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Session ID.
    pub id: Uuid,
    /// Business date.
    pub session_date: String,
    /// Session status: `open` or `closed`.
    pub status: String,
    /// Opening cash float.
    pub initial_amount: String,
    /// Aggregate income across all payment methods.
    pub total_income: String,
    /// Aggregate expense across all payment methods.
    pub total_expense: String,
    /// Expected total at close; unset while open.
    pub expected_amount: Option<String>,
    /// Counted total at close; unset while open.
    pub actual_amount: Option<String>,
    /// Counted minus expected; positive is surplus.
    pub difference: Option<String>,
    /// Opening notes.
    pub opening_notes: Option<String>,
    /// Closing notes.
    pub closing_notes: Option<String>,
    /// Who opened the session.
    pub opened_by: Uuid,
    /// Who closed the session.
    pub closed_by: Option<Uuid>,
    /// When the session was opened.
    pub opened_at: String,
    /// When the session was closed.
    pub closed_at: Option<String>,
    /// Row creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// One per-method ledger line in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryResponse {
    /// Payment method ID.
    pub payment_method_id: Uuid,
    /// Payment method code.
    pub method_code: String,
    /// Payment method name.
    pub method_name: String,
    /// Opening amount; non-zero only for the cash method.
    pub initial_amount: String,
    /// Income through this method.
    pub total_income: String,
    /// Expense through this method.
    pub total_expense: String,
    /// Running expected balance.
    pub expected_amount: String,
    /// Counted amount at close; unset while open.
    pub actual_amount: Option<String>,
    /// Counted minus expected; unset while open.
    pub difference: Option<String>,
}

/// A recorded movement in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementResponse {
    /// Movement ID.
    pub id: Uuid,
    /// Owning session.
    pub session_id: Uuid,
    /// Direction: `income` or `expense`.
    pub movement_type: String,
    /// Origin: `sale_payment`, `expense`, `purchase`, `income`,
    /// `account_payment`, or `manual`.
    pub reference_type: String,
    /// Originating document, if any.
    pub reference_id: Option<Uuid>,
    /// Amount; always non-negative.
    pub amount: String,
    /// Payment method the money moved through.
    pub payment_method_id: Uuid,
    /// Display description.
    pub description: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Who recorded the movement.
    pub created_by: Option<Uuid>,
    /// When the movement was recorded.
    pub created_at: String,
}

/// A movement with its payment method resolved, used in session detail.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementDetailResponse {
    /// Movement ID.
    pub id: Uuid,
    /// Direction: `income` or `expense`.
    pub movement_type: String,
    /// Origin of the movement.
    pub reference_type: String,
    /// Originating document, if any.
    pub reference_id: Option<Uuid>,
    /// Amount; always non-negative.
    pub amount: String,
    /// Payment method ID.
    pub payment_method_id: Uuid,
    /// Payment method code.
    pub payment_method_code: String,
    /// Payment method name.
    pub payment_method_name: String,
    /// Display description.
    pub description: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Who recorded the movement.
    pub created_by: Option<Uuid>,
    /// When the movement was recorded.
    pub created_at: String,
}

/// Full session detail: the session, its ledger, and its movements.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetailResponse {
    /// The session.
    pub session: SessionResponse,
    /// Per-method ledger lines.
    pub ledger: Vec<LedgerEntryResponse>,
    /// Movements in insertion order.
    pub movements: Vec<MovementDetailResponse>,
}

/// Whether the register is usable right now.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStatusResponse {
    /// True when a session is open.
    pub has_open_register: bool,
    /// True when the open session belongs to an earlier business date
    /// and still needs to be closed out.
    pub is_from_previous_day: bool,
    /// The open session, if any.
    pub open_register: Option<SessionResponse>,
}

/// Suggested opening float for the next session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedInitialResponse {
    /// The previous session's counted cash, or zero.
    pub suggested_amount: String,
    /// `"previous_session"` when a closed session backed the suggestion,
    /// `"none"` otherwise.
    pub source: &'static str,
    /// The session the suggestion came from.
    pub previous_session_id: Option<Uuid>,
    /// That session's business date.
    pub previous_session_date: Option<String>,
}

/// Paginated session history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    /// Sessions, newest business date first.
    pub sessions: Vec<SessionResponse>,
    /// Pagination metadata.
    pub pagination: PaginationResponse,
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    /// Current page.
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total items.
    pub total: u64,
    /// Total pages.
    pub total_pages: u32,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /cash-register/open
///
/// Opens today's session with the supplied opening float and seeds one
/// ledger entry per active payment method.
#[axum::debug_handler]
async fn open_register(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<OpenRegisterRequest>,
) -> impl IntoResponse {
    let repo = SessionRepository::new((*state.db).clone());
    let today = today_in(state.timezone);

    let input = OpenSessionInput {
        initial_amount: payload.initial_amount,
        manually_adjusted: payload.manually_adjusted,
        adjustment_reason: payload.adjustment_reason,
        opening_notes: payload.opening_notes,
        opened_by: auth_user.user_id(),
    };

    match repo.open(today, input).await {
        Ok(session) => {
            info!(
                session_id = %session.id,
                session_date = %session.session_date,
                initial_amount = %session.initial_amount,
                "Cash register opened"
            );
            (StatusCode::CREATED, Json(session_response(&session))).into_response()
        }
        Err(RepositoryError::Register(e)) => register_error_response(&e),
        Err(RepositoryError::Database(e)) => {
            error!(error = %e, "Failed to open cash register");
            internal_error_response()
        }
    }
}

/// POST /cash-register/close
///
/// Reconciles every ledger entry against the counted amounts and closes
/// the open session.
#[axum::debug_handler]
async fn close_register(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CloseRegisterRequest>,
) -> impl IntoResponse {
    let repo = SessionRepository::new((*state.db).clone());

    let input = CloseSessionInput {
        actual_cash_amount: payload.actual_cash_amount,
        actual_amounts: payload
            .actual_amounts
            .iter()
            .map(|c| CountedAmount {
                payment_method_id: c.payment_method_id,
                amount: c.amount,
            })
            .collect(),
        closing_notes: payload.closing_notes,
        closed_by: auth_user.user_id(),
    };

    match repo.close(input).await {
        Ok(session) => {
            info!(
                session_id = %session.id,
                session_date = %session.session_date,
                "Cash register closed"
            );
            (StatusCode::OK, Json(session_response(&session))).into_response()
        }
        Err(RepositoryError::Register(e)) => register_error_response(&e),
        Err(RepositoryError::Database(e)) => {
            error!(error = %e, "Failed to close cash register");
            internal_error_response()
        }
    }
}

/// POST /cash-register/{id}/reopen
///
/// Reopens a session closed earlier today so it can be corrected and
/// closed again.
#[axum::debug_handler]
async fn reopen_register(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    auth_user: AuthUser,
) -> impl IntoResponse {
    let repo = SessionRepository::new((*state.db).clone());
    let today = today_in(state.timezone);

    match repo.reopen(id, today, auth_user.user_id()).await {
        Ok(session) => {
            info!(session_id = %session.id, "Cash register reopened");
            (StatusCode::OK, Json(session_response(&session))).into_response()
        }
        Err(RepositoryError::Register(e)) => register_error_response(&e),
        Err(RepositoryError::Database(e)) => {
            error!(error = %e, "Failed to reopen cash register");
            internal_error_response()
        }
    }
}

/// GET /cash-register/current
///
/// Returns the open session, or null when the register is closed.
#[axum::debug_handler]
async fn get_current(State(state): State<AppState>) -> impl IntoResponse {
    let repo = SessionRepository::new((*state.db).clone());

    match repo.current().await {
        Ok(session) => {
            (StatusCode::OK, Json(session.as_ref().map(session_response))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to load current session");
            internal_error_response()
        }
    }
}

/// GET /cash-register/status
///
/// Returns whether a session is open and whether it was carried over
/// from a previous business date.
#[axum::debug_handler]
async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    let repo = SessionRepository::new((*state.db).clone());
    let today = today_in(state.timezone);

    match repo.status(today).await {
        Ok(status) => {
            let response = RegisterStatusResponse {
                has_open_register: status.has_open_register,
                is_from_previous_day: status.is_from_previous_day,
                open_register: status.open_register.as_ref().map(session_response),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to load register status");
            internal_error_response()
        }
    }
}

/// GET /cash-register/suggested-initial
///
/// Returns the previous closed session's counted cash as the suggested
/// opening float for the next session.
#[axum::debug_handler]
async fn get_suggested_initial(State(state): State<AppState>) -> impl IntoResponse {
    let repo = SessionRepository::new((*state.db).clone());

    match repo.suggested_initial().await {
        Ok(suggested) => {
            let source = if suggested.previous_session_id.is_some() {
                "previous_session"
            } else {
                "none"
            };
            let response = SuggestedInitialResponse {
                suggested_amount: format_money(suggested.amount),
                source,
                previous_session_id: suggested.previous_session_id,
                previous_session_date: suggested.previous_session_date.map(|d| d.to_string()),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to load suggested initial amount");
            internal_error_response()
        }
    }
}

/// POST /cash-register/movements
///
/// Records a manual income or expense movement against the open session.
#[axum::debug_handler]
async fn create_movement(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(payload): Json<CreateMovementRequest>,
) -> impl IntoResponse {
    let kind = match MovementKind::parse(&payload.movement_type) {
        Ok(kind) => kind,
        Err(e) => return register_error_response(&e),
    };

    let repo = MovementRepository::new((*state.db).clone());

    match repo
        .record_manual_movement(
            kind,
            payload.amount,
            payload.payment_method_id,
            &payload.description,
            payload.notes,
            Some(auth_user.user_id()),
        )
        .await
    {
        Ok(movement) => {
            info!(
                movement_id = %movement.id,
                session_id = %movement.session_id,
                amount = %movement.amount,
                "Manual cash movement recorded"
            );
            (StatusCode::CREATED, Json(movement_response(&movement))).into_response()
        }
        Err(RepositoryError::Register(e)) => register_error_response(&e),
        Err(RepositoryError::Database(e)) => {
            error!(error = %e, "Failed to record cash movement");
            internal_error_response()
        }
    }
}

/// GET /cash-register/history
///
/// Lists sessions ordered by business date descending. An exact `date`
/// filter takes priority over the range filter.
#[axum::debug_handler]
async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let repo = SessionRepository::new((*state.db).clone());

    let filter = SessionFilter {
        date: query.date,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.limit.unwrap_or(20),
    };

    match repo.find_all(filter, &page).await {
        Ok(result) => {
            let response = HistoryResponse {
                sessions: result.data.iter().map(session_response).collect(),
                pagination: PaginationResponse {
                    page: result.meta.page,
                    limit: result.meta.per_page,
                    total: result.meta.total,
                    total_pages: result.meta.total_pages,
                },
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list cash sessions");
            internal_error_response()
        }
    }
}

/// GET /cash-register/{id}
///
/// Returns one session with its ledger lines and movements, payment
/// methods resolved.
#[axum::debug_handler]
async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    let repo = SessionRepository::new((*state.db).clone());

    match repo.find_by_id(id).await {
        Ok(detail) => (StatusCode::OK, Json(session_detail_response(&detail))).into_response(),
        Err(RepositoryError::Register(e)) => register_error_response(&e),
        Err(RepositoryError::Database(e)) => {
            error!(error = %e, "Failed to load session detail");
            internal_error_response()
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Formats a Decimal as a string with 2 decimal places.
pub(crate) fn format_money(amount: Decimal) -> String {
    format!("{amount:.2}")
}

/// Maps a register rule violation to its HTTP status and stable error code.
pub(crate) fn register_error_response(err: &RegisterError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({ "error": err.error_code(), "message": err.to_string() })),
    )
        .into_response()
}

/// The response for unexpected database failures.
pub(crate) fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}

/// Converts a session row to its response shape.
fn session_response(session: &cash_sessions::Model) -> SessionResponse {
    SessionResponse {
        id: session.id,
        session_date: session.session_date.to_string(),
        status: SessionStatus::from(session.status).as_str().to_string(),
        initial_amount: format_money(session.initial_amount),
        total_income: format_money(session.total_income),
        total_expense: format_money(session.total_expense),
        expected_amount: session.expected_amount.map(format_money),
        actual_amount: session.actual_amount.map(format_money),
        difference: session.difference.map(format_money),
        opening_notes: session.opening_notes.clone(),
        closing_notes: session.closing_notes.clone(),
        opened_by: session.opened_by,
        closed_by: session.closed_by,
        opened_at: session.opened_at.to_rfc3339(),
        closed_at: session.closed_at.map(|t| t.to_rfc3339()),
        created_at: session.created_at.to_rfc3339(),
        updated_at: session.updated_at.to_rfc3339(),
    }
}

/// Converts a movement row to its response shape.
fn movement_response(movement: &cash_movements::Model) -> MovementResponse {
    MovementResponse {
        id: movement.id,
        session_id: movement.session_id,
        movement_type: MovementKind::from(movement.movement_type).as_str().to_string(),
        reference_type: movement.reference_type.as_str().to_string(),
        reference_id: movement.reference_id,
        amount: format_money(movement.amount),
        payment_method_id: movement.payment_method_id,
        description: movement.description.clone(),
        notes: movement.notes.clone(),
        created_by: movement.created_by,
        created_at: movement.created_at.to_rfc3339(),
    }
}

/// Converts a movement with its resolved payment method to its response
/// shape.
fn movement_with_method_response(row: &MovementWithMethod) -> MovementDetailResponse {
    MovementDetailResponse {
        id: row.movement.id,
        movement_type: MovementKind::from(row.movement.movement_type)
            .as_str()
            .to_string(),
        reference_type: row.movement.reference_type.as_str().to_string(),
        reference_id: row.movement.reference_id,
        amount: format_money(row.movement.amount),
        payment_method_id: row.movement.payment_method_id,
        payment_method_code: row.method_code.clone(),
        payment_method_name: row.method_name.clone(),
        description: row.movement.description.clone(),
        notes: row.movement.notes.clone(),
        created_by: row.movement.created_by,
        created_at: row.movement.created_at.to_rfc3339(),
    }
}

/// Converts a ledger line to its response shape.
fn ledger_line_response(line: &LedgerLine) -> LedgerEntryResponse {
    LedgerEntryResponse {
        payment_method_id: line.entry.payment_method_id,
        method_code: line.method_code.clone(),
        method_name: line.method_name.clone(),
        initial_amount: format_money(line.entry.initial_amount),
        total_income: format_money(line.entry.total_income),
        total_expense: format_money(line.entry.total_expense),
        expected_amount: format_money(line.entry.expected_amount),
        actual_amount: line.entry.actual_amount.map(format_money),
        difference: line.entry.difference.map(format_money),
    }
}

/// Converts a session detail to its response shape.
fn session_detail_response(detail: &SessionDetail) -> SessionDetailResponse {
    SessionDetailResponse {
        session: session_response(&detail.session),
        ledger: detail.ledger.iter().map(ledger_line_response).collect(),
        movements: detail
            .movements
            .iter()
            .map(movement_with_method_response)
            .collect(),
    }
}
