use axum::{
    extract::{Path, State as AxumState},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use casedrop_types::api::{ErrorBody, OpenCaseRequest, OpenCaseResponse, SlotSpinRequest, UpgradeRequest};
use casedrop_types::{GamesError, UserId};

use crate::Gateway;

/// Simple health response for basic liveness checks
#[derive(Serialize)]
struct HealthzResponse {
    ok: bool,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            message: message.into(),
        }),
    )
        .into_response()
}

/// Maps the game error taxonomy to HTTP. Caller faults keep their message;
/// server faults are logged and surfaced generically.
fn games_error_response(err: GamesError) -> Response {
    match err {
        GamesError::CaseNotFound => error_response(StatusCode::NOT_FOUND, err.to_string()),
        GamesError::UserNotFound => error_response(StatusCode::NOT_FOUND, err.to_string()),
        GamesError::InvalidQuantity => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        GamesError::InsufficientBalance => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        GamesError::NoDrawableItems { ref case_id } => {
            tracing::error!(case_id = %case_id, "case has no drawable items");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Case has no drawable items")
        }
        GamesError::Internal(detail) => {
            tracing::error!(detail = %detail, "internal error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Resolves the bearer token to a user id, or answers 401.
fn authorize(gateway: &Gateway, headers: &HeaderMap) -> Result<UserId, Response> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    let Some(token) = token else {
        return Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized"));
    };
    match gateway.authenticator().resolve(token) {
        Some(user_id) => Ok(user_id),
        None => Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized")),
    }
}

pub(super) async fn healthz() -> Response {
    Json(HealthzResponse { ok: true }).into_response()
}

pub(super) async fn config(AxumState(gateway): AxumState<Arc<Gateway>>) -> Response {
    Json(gateway.config.clone()).into_response()
}

pub(super) async fn http_metrics(AxumState(gateway): AxumState<Arc<Gateway>>) -> Response {
    Json(gateway.http_metrics().snapshot()).into_response()
}

pub(super) async fn list_cases(AxumState(gateway): AxumState<Arc<Gateway>>) -> Response {
    let cases: Vec<_> = gateway
        .catalog()
        .list()
        .iter()
        .map(|case| case.as_ref().clone())
        .collect();
    Json(cases).into_response()
}

pub(super) async fn get_case(
    AxumState(gateway): AxumState<Arc<Gateway>>,
    Path(id): Path<String>,
) -> Response {
    match gateway.catalog().get(&id) {
        Some(case) => Json(case.as_ref().clone()).into_response(),
        None => games_error_response(GamesError::CaseNotFound),
    }
}

pub(super) async fn me(
    AxumState(gateway): AxumState<Arc<Gateway>>,
    headers: HeaderMap,
) -> Response {
    let user_id = match authorize(&gateway, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    match gateway.users().snapshot(&user_id) {
        Some(user) => Json(user).into_response(),
        None => games_error_response(GamesError::UserNotFound),
    }
}

pub(super) async fn open_case(
    AxumState(gateway): AxumState<Arc<Gateway>>,
    Path(case_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<OpenCaseRequest>,
) -> Response {
    let user_id = match authorize(&gateway, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    gateway.http_metrics().inc_opens_total();
    match gateway.open_case(&user_id, &case_id, request.quantity) {
        Ok(result) => Json(OpenCaseResponse {
            items: result.items,
        })
        .into_response(),
        Err(err) => {
            gateway.http_metrics().inc_opens_failed();
            games_error_response(err)
        }
    }
}

pub(super) async fn upgrade(
    AxumState(gateway): AxumState<Arc<Gateway>>,
    headers: HeaderMap,
    Json(request): Json<UpgradeRequest>,
) -> Response {
    let user_id = match authorize(&gateway, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let Some(game) = gateway.upgrade_game() else {
        return error_response(StatusCode::NOT_IMPLEMENTED, "Upgrade engine not installed");
    };
    match game.upgrade(&user_id, &request) {
        Ok(outcome) => {
            let status =
                StatusCode::from_u16(outcome.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(outcome)).into_response()
        }
        Err(err) => games_error_response(err),
    }
}

pub(super) async fn slots(
    AxumState(gateway): AxumState<Arc<Gateway>>,
    headers: HeaderMap,
    Json(request): Json<SlotSpinRequest>,
) -> Response {
    let user_id = match authorize(&gateway, &headers) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let Some(game) = gateway.slot_game() else {
        return error_response(StatusCode::NOT_IMPLEMENTED, "Slot engine not installed");
    };
    match game.spin(&user_id, request.bet_amount) {
        Ok(outcome) => Json(outcome).into_response(),
        Err(err) => games_error_response(err),
    }
}
