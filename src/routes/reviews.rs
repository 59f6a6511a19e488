use crate::db::DbConn;
use crate::models::Review;
use crate::response::{Message, MutationResponse, QueryResponse, Response};
use crate::views::ReviewView;
use diesel::prelude::*;
use rocket::serde::json::{self, Json};
use rocket_okapi::openapi;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use validator::Validate;

pub const REVIEW_NOT_FOUND: &str = "Review not found";

#[derive(Deserialize, Validate, JsonSchema)]
pub struct CreateReviewRequest {
  #[validate(length(min = 1))]
  user_id: String,
  movie_id: i32,
  #[validate(range(min = 1, max = 10))]
  rating: i32,
  comment: Option<String>,
}

// Distinguishes a missing `comment` key (None) from an explicit null (Some(None)).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
  D: Deserializer<'de>,
{
  Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Validate, JsonSchema)]
pub struct UpdateReviewRequest {
  #[validate(range(min = 1, max = 10))]
  rating: Option<i32>,
  #[serde(default, deserialize_with = "present")]
  #[schemars(with = "Option<String>")]
  comment: Option<Option<String>>,
}

#[openapi(tag = "Reviews")]
#[post("/reviews", data = "<review>")]
pub async fn create(
  review: Result<Json<CreateReviewRequest>, json::Error<'_>>,
  db_conn: DbConn,
) -> MutationResponse<ReviewView> {
  let review = review?;

  if let Err(errors) = review.validate() {
    return Response::validation_error(errors);
  }

  let review = review.into_inner();

  let review = db_conn
    .run(move |conn| {
      Review::create(
        conn,
        review.user_id,
        review.movie_id,
        review.rating,
        review.comment,
      )
    })
    .await?;

  log::info!(
    "created review {} for movie {} by {}",
    review.id,
    review.movie_id,
    review.user_id
  );

  Response::success(ReviewView::from(review))
}

#[openapi(tag = "Reviews")]
#[get("/reviews/<id>")]
pub async fn get(id: i32, db_conn: DbConn) -> QueryResponse<ReviewView> {
  let review = db_conn
    .run(move |conn| Review::find_by_id(id).first::<Review>(conn).optional())
    .await?;

  match review {
    Some(review) => Response::success(ReviewView::from(review)),
    None => Response::not_found(REVIEW_NOT_FOUND),
  }
}

#[openapi(tag = "Reviews")]
#[get("/reviews/user/<user_id>")]
pub async fn list_by_user(user_id: String, db_conn: DbConn) -> QueryResponse<Vec<ReviewView>> {
  let reviews = db_conn
    .run(move |conn| Review::filter_by_user_id(&user_id).load::<Review>(conn))
    .await?;

  Response::success(reviews.into_iter().map(ReviewView::from).collect())
}

#[openapi(tag = "Reviews")]
#[get("/reviews/movie/<movie_id>")]
pub async fn list_by_movie(movie_id: i32, db_conn: DbConn) -> QueryResponse<Vec<ReviewView>> {
  let reviews = db_conn
    .run(move |conn| Review::filter_by_movie_id(movie_id).load::<Review>(conn))
    .await?;

  Response::success(reviews.into_iter().map(ReviewView::from).collect())
}

#[openapi(tag = "Reviews")]
#[put("/reviews/<id>", data = "<review>")]
pub async fn update(
  id: i32,
  review: Result<Json<UpdateReviewRequest>, json::Error<'_>>,
  db_conn: DbConn,
) -> MutationResponse<ReviewView> {
  let review = review?;

  if let Err(errors) = review.validate() {
    return Response::validation_error(errors);
  }

  let review = review.into_inner();

  let updated_review = db_conn
    .run(move |conn| Review::update(conn, id, review.rating, review.comment).optional())
    .await?;

  match updated_review {
    Some(review) => {
      log::info!("updated review {}", review.id);
      Response::success(ReviewView::from(review))
    }
    None => Response::not_found(REVIEW_NOT_FOUND),
  }
}

#[openapi(tag = "Reviews")]
#[delete("/reviews/<id>")]
pub async fn delete(id: i32, db_conn: DbConn) -> MutationResponse<Message> {
  let deleted = db_conn
    .run(move |conn| Review::delete(conn, id).optional())
    .await?;

  match deleted {
    Some(()) => {
      log::info!("deleted review {}", id);
      Response::success(Message {
        message: "Review deleted successfully".into(),
      })
    }
    None => Response::not_found(REVIEW_NOT_FOUND),
  }
}
