use crate::response::ErrorBody;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::{Catcher, Request};

#[catch(default)]
pub fn json_error(status: Status, _req: &Request) -> Custom<Json<ErrorBody>> {
  Custom(status, Json(ErrorBody::from_status(status)))
}

pub fn all() -> Vec<Catcher> {
  catchers![json_error]
}
