use crate::schema::reviews;
use chrono::{Duration, NaiveDateTime, Utc};
use derive_builder::Builder;
use diesel::dsl::{Eq, Filter, Find};
use diesel::helper_types::{Desc, Order};
use diesel::prelude::*;

#[derive(Builder, Queryable, Identifiable, Clone, Debug, PartialEq)]
#[builder(
  derive(AsChangeset, Insertable),
  pattern = "owned",
  name = "ReviewChangeset"
)]
#[builder_struct_attr(diesel(table_name = reviews))]
pub struct Review {
  pub id: i32,
  pub user_id: String,
  pub movie_id: i32,
  pub rating: i32,
  pub comment: Option<String>,
  pub created_at: NaiveDateTime,
  pub updated_at: NaiveDateTime,
}

pub type MostRecentFirst = (Desc<reviews::created_at>, Desc<reviews::id>);

#[allow(clippy::type_complexity)]
impl Review {
  pub fn find_by_id(id: i32) -> Find<reviews::table, i32> {
    reviews::table.find(id)
  }

  pub fn filter_by_user_id(
    user_id: &str,
  ) -> Order<Filter<reviews::table, Eq<reviews::user_id, String>>, MostRecentFirst> {
    reviews::table
      .filter(reviews::user_id.eq(user_id.to_string()))
      .order((reviews::created_at.desc(), reviews::id.desc()))
  }

  pub fn filter_by_movie_id(
    movie_id: i32,
  ) -> Order<Filter<reviews::table, Eq<reviews::movie_id, i32>>, MostRecentFirst> {
    reviews::table
      .filter(reviews::movie_id.eq(movie_id))
      .order((reviews::created_at.desc(), reviews::id.desc()))
  }

  pub fn create(
    conn: &mut SqliteConnection,
    user_id: String,
    movie_id: i32,
    rating: i32,
    comment: Option<String>,
  ) -> QueryResult<Review> {
    let now = Utc::now().naive_utc();

    diesel::insert_into(reviews::table)
      .values(
        ReviewChangeset::default()
          .user_id(user_id)
          .movie_id(movie_id)
          .rating(rating)
          .comment(comment)
          .created_at(now)
          .updated_at(now),
      )
      .get_result::<Review>(conn)
  }

  /// Applies a partial update. `None` leaves a field untouched; for `comment`,
  /// `Some(None)` clears it.
  pub fn update(
    conn: &mut SqliteConnection,
    id: i32,
    rating: Option<i32>,
    comment: Option<Option<String>>,
  ) -> QueryResult<Review> {
    conn.transaction::<_, diesel::result::Error, _>(|conn| {
      let existing = Review::find_by_id(id).first::<Review>(conn)?;

      // updated_at must strictly increase even if the clock has not moved
      let now = Utc::now()
        .naive_utc()
        .max(existing.updated_at + Duration::microseconds(1));

      let mut changeset = ReviewChangeset::default().updated_at(now);

      if let Some(rating) = rating {
        changeset = changeset.rating(rating);
      }

      if let Some(comment) = comment {
        changeset = changeset.comment(comment);
      }

      diesel::update(&existing)
        .set(changeset)
        .get_result::<Review>(conn)
    })
  }

  pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<()> {
    match diesel::delete(Review::find_by_id(id)).execute(conn)? {
      0 => Err(diesel::result::Error::NotFound),
      _ => Ok(()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::run_pending_migrations;
  use diesel::result::{DatabaseErrorKind, Error};

  fn connection() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    run_pending_migrations(&mut conn).unwrap();
    conn
  }

  fn create(conn: &mut SqliteConnection, user_id: &str, movie_id: i32, rating: i32) -> Review {
    Review::create(conn, user_id.to_string(), movie_id, rating, None).unwrap()
  }

  #[test]
  fn create_assigns_id_and_equal_timestamps() {
    let mut conn = connection();

    let first = Review::create(&mut conn, "u1".into(), 42, 8, Some("great".into())).unwrap();
    let second = create(&mut conn, "u2", 42, 3);

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.user_id, "u1");
    assert_eq!(first.movie_id, 42);
    assert_eq!(first.rating, 8);
    assert_eq!(first.comment.as_deref(), Some("great"));
    assert_eq!(first.created_at, first.updated_at);
  }

  #[test]
  fn find_returns_the_stored_row() {
    let mut conn = connection();
    let created = create(&mut conn, "u1", 7, 5);

    let found = Review::find_by_id(created.id)
      .first::<Review>(&mut conn)
      .unwrap();

    assert_eq!(found, created);
  }

  #[test]
  fn find_missing_is_not_found() {
    let mut conn = connection();

    let result = Review::find_by_id(99).first::<Review>(&mut conn);

    assert!(matches!(result, Err(Error::NotFound)));
  }

  #[test]
  fn storage_rejects_out_of_range_rating() {
    let mut conn = connection();

    for rating in [0, 11, -3] {
      let result = Review::create(&mut conn, "u1".into(), 1, rating, None);

      assert!(matches!(
        result,
        Err(Error::DatabaseError(DatabaseErrorKind::CheckViolation, _))
      ));
    }

    let count: i64 = reviews::table.count().get_result(&mut conn).unwrap();
    assert_eq!(count, 0);
  }

  #[test]
  fn lists_are_most_recent_first() {
    let mut conn = connection();
    let a = create(&mut conn, "u1", 1, 5);
    let b = create(&mut conn, "u1", 2, 6);
    create(&mut conn, "u2", 1, 7);

    // higher id but older timestamp, so it must sort last
    let earlier = a.created_at - Duration::days(1);
    let backdated = diesel::insert_into(reviews::table)
      .values(
        ReviewChangeset::default()
          .user_id("u1".to_string())
          .movie_id(1)
          .rating(4)
          .comment(None)
          .created_at(earlier)
          .updated_at(earlier),
      )
      .get_result::<Review>(&mut conn)
      .unwrap();

    let by_user: Vec<i32> = Review::filter_by_user_id("u1")
      .load::<Review>(&mut conn)
      .unwrap()
      .into_iter()
      .map(|review| review.id)
      .collect();

    assert_eq!(by_user, vec![b.id, a.id, backdated.id]);

    let by_movie: Vec<Review> = Review::filter_by_movie_id(1).load(&mut conn).unwrap();

    assert_eq!(by_movie.len(), 3);
    assert!(by_movie.iter().all(|review| review.movie_id == 1));
    assert!(by_movie
      .windows(2)
      .all(|pair| pair[0].created_at >= pair[1].created_at));
    assert_eq!(by_movie.last().unwrap().id, backdated.id);
  }

  #[test]
  fn lists_are_empty_when_nothing_matches() {
    let mut conn = connection();
    create(&mut conn, "u1", 1, 5);

    let by_user = Review::filter_by_user_id("nobody")
      .load::<Review>(&mut conn)
      .unwrap();
    let by_movie = Review::filter_by_movie_id(404)
      .load::<Review>(&mut conn)
      .unwrap();

    assert!(by_user.is_empty());
    assert!(by_movie.is_empty());
  }

  #[test]
  fn update_changes_only_supplied_fields() {
    let mut conn = connection();
    let created = Review::create(&mut conn, "u1".into(), 42, 8, Some("great".into())).unwrap();

    let rated = Review::update(&mut conn, created.id, Some(9), None).unwrap();

    assert_eq!(rated.rating, 9);
    assert_eq!(rated.comment.as_deref(), Some("great"));
    assert_eq!(rated.user_id, created.user_id);
    assert_eq!(rated.movie_id, created.movie_id);
    assert_eq!(rated.created_at, created.created_at);
    assert!(rated.updated_at > created.updated_at);

    let commented = Review::update(&mut conn, created.id, None, Some(Some("meh".into()))).unwrap();

    assert_eq!(commented.rating, 9);
    assert_eq!(commented.comment.as_deref(), Some("meh"));
    assert!(commented.updated_at > rated.updated_at);
  }

  #[test]
  fn update_can_clear_comment() {
    let mut conn = connection();
    let created = Review::create(&mut conn, "u1".into(), 42, 8, Some("great".into())).unwrap();

    let cleared = Review::update(&mut conn, created.id, None, Some(None)).unwrap();

    assert_eq!(cleared.comment, None);
    assert_eq!(cleared.rating, 8);
  }

  #[test]
  fn update_missing_is_not_found() {
    let mut conn = connection();

    let result = Review::update(&mut conn, 5, Some(3), None);

    assert!(matches!(result, Err(Error::NotFound)));
  }

  #[test]
  fn update_rejects_out_of_range_rating_without_changes() {
    let mut conn = connection();
    let created = create(&mut conn, "u1", 1, 5);

    let result = Review::update(&mut conn, created.id, Some(11), None);

    assert!(matches!(
      result,
      Err(Error::DatabaseError(DatabaseErrorKind::CheckViolation, _))
    ));

    let stored = Review::find_by_id(created.id)
      .first::<Review>(&mut conn)
      .unwrap();
    assert_eq!(stored, created);
  }

  #[test]
  fn delete_removes_the_row() {
    let mut conn = connection();
    let created = create(&mut conn, "u1", 1, 5);

    Review::delete(&mut conn, created.id).unwrap();

    let result = Review::find_by_id(created.id).first::<Review>(&mut conn);
    assert!(matches!(result, Err(Error::NotFound)));
    assert!(matches!(
      Review::delete(&mut conn, created.id),
      Err(Error::NotFound)
    ));
  }

  #[test]
  fn ids_are_not_reused_after_delete() {
    let mut conn = connection();
    let first = create(&mut conn, "u1", 1, 5);
    Review::delete(&mut conn, first.id).unwrap();

    let second = create(&mut conn, "u1", 1, 5);

    assert!(second.id > first.id);
  }
}
