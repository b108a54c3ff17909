use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, AuditEvent, AuditOutcome, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestPagingResponse, BadRequestValidationResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    extract_ip_from_headers, extract_user_agent,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserError;
use crate::models::{CreateUser, UpdateOutcome, UpdateUser, User};
use crate::pagination::{Page, PageRequest};
use crate::repository::UserRepository;
use crate::service::UserService;

const TAG: &str = "Users";

const USER_NOT_FOUND: &str = "User not found!";
const NO_USER_UPDATED: &str = "No user was found to update for your id";
const NO_USER_DELETED: &str = "No user was found to delete for your id";

const ERROR_CREATING: &str = "An error occurred while creating a new user";
const ERROR_LISTING: &str = "An error occurred while getting users";
const ERROR_GETTING: &str = "An error occurred while getting user with id:";
const ERROR_UPDATING: &str = "An error occurred while updating user with id:";
const ERROR_DELETING: &str = "An error occurred while deleting user with id:";

fn not_found(message: &str, id: impl Into<String>) -> AppError {
    AppError::NotFoundId {
        message: message.to_string(),
        id: id.into(),
    }
}

/// OpenAPI documentation for Users API
#[derive(OpenApi)]
#[openapi(
    paths(list_users, create_user, get_user, update_user, delete_user),
    components(
        schemas(User, CreateUser, UpdateUser),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            BadRequestPagingResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the user router with all HTTP endpoints
pub fn router<R: UserRepository + 'static>(service: UserService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .with_state(shared_service)
}

fn audit(headers: &HeaderMap, action: &str, id: impl std::fmt::Display, outcome: AuditOutcome) {
    AuditEvent::new(action, Some(format!("user:{}", id)), outcome)
        .with_ip(extract_ip_from_headers(headers))
        .with_user_agent(extract_user_agent(headers))
        .log();
}

/// List users one page at a time
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(PageRequest),
    responses(
        (status = 200, description = "Page of users", body = Page<User>),
        (status = 400, response = BadRequestPagingResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Page<User>>, AppError> {
    let Query(request) =
        query.map_err(|e| UserError::InvalidPagingParameter(e.body_text()))?;

    let page = service
        .list(request)
        .await
        .map_err(|e| e.or_failed(ERROR_LISTING))?;
    Ok(Json(page))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = service
        .create(input)
        .await
        .map_err(|e| e.or_failed(ERROR_CREATING))?;

    audit(&headers, "user.create", user.id, AuditOutcome::Success);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    service
        .find_one(&id)
        .await
        .map_err(|e| e.or_failed(format!("{ERROR_GETTING} {id}")))?
        .map(Json)
        .ok_or_else(|| not_found(USER_NOT_FOUND, id))
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated successfully", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UpdateUser>,
) -> Result<Json<User>, AppError> {
    let outcome = service
        .update(&id, patch)
        .await
        .map_err(|e| e.or_failed(format!("{ERROR_UPDATING} {id}")))?;

    match outcome {
        UpdateOutcome::Updated(user) => {
            audit(&headers, "user.update", user.id, AuditOutcome::Success);
            Ok(Json(user))
        }
        UpdateOutcome::NotFound => {
            audit(&headers, "user.update", &id, AuditOutcome::NoOp);
            Err(not_found(NO_USER_UPDATED, id))
        }
    }
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<Arc<UserService<R>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = service
        .remove(&id)
        .await
        .map_err(|e| e.or_failed(format!("{ERROR_DELETING} {id}")))?;

    if removed {
        audit(&headers, "user.delete", &id, AuditOutcome::Success);
        Ok(StatusCode::NO_CONTENT)
    } else {
        audit(&headers, "user.delete", &id, AuditOutcome::NoOp);
        Err(not_found(NO_USER_DELETED, id))
    }
}
