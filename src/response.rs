use okapi::openapi3::Responses;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{response, Request};
use rocket_okapi::{
  gen::OpenApiGenerator, response::OpenApiResponderInner, Result as OpenApiResult,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

fn add_error(responses: &mut Responses, status: Status) {
  responses
    .responses
    .entry(status.code.to_string())
    .or_insert_with(|| {
      let response = okapi::openapi3::Response {
        description: format!(
          "# [{} {}](https://developer.mozilla.org/en-US/docs/Web/HTTP/Status/{})",
          status.code,
          status.reason_lossy(),
          status.code
        ),
        ..Default::default()
      };
      response.into()
    });
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
pub struct ErrorBody {
  pub detail: String,
}

impl ErrorBody {
  pub fn new<T: ToString>(detail: T) -> Self {
    ErrorBody {
      detail: detail.to_string(),
    }
  }

  pub fn from_status(status: Status) -> Self {
    Self::new(status.reason_lossy())
  }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, PartialEq)]
pub struct Message {
  pub message: String,
}

pub struct NotFound(pub String);

#[derive(Debug)]
pub enum MutationError {
  ValidationErrors(ValidationErrors),
  NotFound(String),
  Status(Status),
}

#[derive(Debug)]
pub enum QueryError {
  NotFound(String),
  Status(Status),
}

pub type MutationResponse<T> = Result<Json<T>, MutationError>;
pub type QueryResponse<T> = Result<Json<T>, QueryError>;
pub struct Response;

impl Response {
  pub fn success<T, E>(response: T) -> Result<Json<T>, E> {
    Ok(Json(response))
  }

  pub fn not_found<T, E: From<NotFound>>(detail: &str) -> Result<Json<T>, E> {
    Err(NotFound(detail.to_string()).into())
  }

  pub fn validation_error<T>(errors: ValidationErrors) -> Result<Json<T>, MutationError> {
    Err(MutationError::ValidationErrors(errors))
  }
}

fn respond_with_status<'r>(status: Status, req: &'r Request<'_>) -> response::Result<'static> {
  Custom(status, Json(ErrorBody::from_status(status))).respond_to(req)
}

impl<'r> Responder<'r, 'static> for MutationError {
  fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
    match self {
      MutationError::Status(status) => respond_with_status(status, req),
      MutationError::NotFound(detail) => {
        Custom(Status::NotFound, Json(ErrorBody::new(detail))).respond_to(req)
      }
      MutationError::ValidationErrors(errors) => {
        Custom(Status::UnprocessableEntity, Json(errors)).respond_to(req)
      }
    }
  }
}

impl<'r> Responder<'r, 'static> for QueryError {
  fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
    match self {
      QueryError::Status(status) => respond_with_status(status, req),
      QueryError::NotFound(detail) => {
        Custom(Status::NotFound, Json(ErrorBody::new(detail))).respond_to(req)
      }
    }
  }
}

impl OpenApiResponderInner for MutationError {
  fn responses(_gen: &mut OpenApiGenerator) -> OpenApiResult<Responses> {
    let mut responses = Responses::default();
    add_error(&mut responses, Status::BadRequest);
    add_error(&mut responses, Status::NotFound);
    add_error(&mut responses, Status::UnprocessableEntity);
    add_error(&mut responses, Status::InternalServerError);
    Ok(responses)
  }
}

impl OpenApiResponderInner for QueryError {
  fn responses(_gen: &mut OpenApiGenerator) -> OpenApiResult<Responses> {
    let mut responses = Responses::default();
    add_error(&mut responses, Status::NotFound);
    add_error(&mut responses, Status::InternalServerError);
    add_error(&mut responses, Status::ServiceUnavailable);
    Ok(responses)
  }
}

impl From<NotFound> for MutationError {
  fn from(not_found: NotFound) -> Self {
    MutationError::NotFound(not_found.0)
  }
}

impl From<NotFound> for QueryError {
  fn from(not_found: NotFound) -> Self {
    QueryError::NotFound(not_found.0)
  }
}

pub const RECORD_NOT_FOUND: &str = "Record not found";

impl<'r> From<rocket::serde::json::Error<'r>> for MutationError {
  fn from(error: rocket::serde::json::Error<'r>) -> Self {
    log::debug!("rejected request body: {}", error);
    MutationError::Status(Status::UnprocessableEntity)
  }
}

fn storage_failure(error: &diesel::result::Error) -> Status {
  log::error!("storage failure: {}", error);
  sentry::capture_error(error);
  Status::InternalServerError
}

impl From<diesel::result::Error> for MutationError {
  fn from(error: diesel::result::Error) -> Self {
    use diesel::result::{DatabaseErrorKind, Error};

    match error {
      Error::NotFound => MutationError::NotFound(RECORD_NOT_FOUND.to_string()),
      Error::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
        MutationError::Status(Status::UnprocessableEntity)
      }
      _ => MutationError::Status(storage_failure(&error)),
    }
  }
}

impl From<diesel::result::Error> for QueryError {
  fn from(error: diesel::result::Error) -> Self {
    match error {
      diesel::result::Error::NotFound => QueryError::NotFound(RECORD_NOT_FOUND.to_string()),
      _ => QueryError::Status(storage_failure(&error)),
    }
  }
}
