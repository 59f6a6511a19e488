use crate::models::Review;
use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(rename = "Review")]
pub struct ReviewView {
  pub id: i32,
  pub user_id: String,
  pub movie_id: i32,
  pub rating: i32,
  pub comment: Option<String>,
  pub created_at: NaiveDateTime,
  pub updated_at: NaiveDateTime,
}

impl From<Review> for ReviewView {
  fn from(review: Review) -> Self {
    ReviewView {
      id: review.id,
      user_id: review.user_id,
      movie_id: review.movie_id,
      rating: review.rating,
      comment: review.comment,
      created_at: review.created_at,
      updated_at: review.updated_at,
    }
  }
}
