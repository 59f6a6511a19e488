mod catchers;
mod index;
mod reviews;

use rocket::Route;
use rocket_okapi::handlers::OpenApiHandler;
use rocket_okapi::openapi_get_routes_spec;

pub use catchers::all as catchers;
pub use reviews::REVIEW_NOT_FOUND;

pub const API_TITLE: &str = "User Reviews API";
pub const API_VERSION: &str = "1.0.0";

pub fn all() -> Vec<Route> {
  let (mut routes, mut spec) = openapi_get_routes_spec![
    index::get_health,
    reviews::create,
    reviews::get,
    reviews::list_by_user,
    reviews::list_by_movie,
    reviews::update,
    reviews::delete
  ];

  spec.info.title = API_TITLE.to_owned();
  spec.info.version = API_VERSION.to_owned();
  spec.info.description = Some("CRUD API for user movie reviews".to_owned());

  routes.push(OpenApiHandler::new(spec).into_route("/openapi.json"));
  routes
}
