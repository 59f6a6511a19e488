use crate::db::DbConn;
use crate::response::{QueryError, QueryResponse, Response};
use diesel::prelude::*;
use rocket::http::Status;
use rocket_okapi::openapi;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema)]
pub struct Health {
  pub status: String,
}

#[openapi(tag = "Health")]
#[get("/")]
pub async fn get_health(db_conn: DbConn) -> QueryResponse<Health> {
  db_conn
    .run(|conn| diesel::sql_query("SELECT 1").execute(conn))
    .await
    .map_err(|error| {
      log::warn!("health check failed: {}", error);
      QueryError::Status(Status::ServiceUnavailable)
    })?;

  Response::success(Health {
    status: "ok".into(),
  })
}
