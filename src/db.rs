use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use rocket::fairing::{AdHoc, Fairing};
use rocket::{Build, Rocket};
use rocket_okapi::{
  gen::OpenApiGenerator,
  request::{OpenApiFromRequest, RequestHeaderInput},
};
use rocket_sync_db_pools::database;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[database("default")]
pub struct DbConn(pub diesel::SqliteConnection);

impl<'a> OpenApiFromRequest<'a> for DbConn {
  fn from_request_input(
    _gen: &mut OpenApiGenerator,
    _name: String,
    _required: bool,
  ) -> rocket_okapi::Result<RequestHeaderInput> {
    Ok(RequestHeaderInput::None)
  }
}

#[derive(thiserror::Error, Debug)]
pub enum SetupError {
  #[error("no database connection available")]
  Connection,
  #[error("failed to run migrations: {0}")]
  Migrations(String),
}

pub fn run_pending_migrations(conn: &mut diesel::SqliteConnection) -> Result<(), SetupError> {
  conn
    .run_pending_migrations(MIGRATIONS)
    .map(|versions| {
      for version in versions {
        log::info!("applied migration {}", version);
      }
    })
    .map_err(|error| SetupError::Migrations(error.to_string()))
}

async fn migrate(rocket: &Rocket<Build>) -> Result<(), SetupError> {
  let db_conn = DbConn::get_one(rocket)
    .await
    .ok_or(SetupError::Connection)?;

  db_conn.run(run_pending_migrations).await
}

pub fn migrations() -> impl Fairing {
  AdHoc::try_on_ignite("Run Migrations", |rocket| async move {
    match migrate(&rocket).await {
      Ok(()) => Ok(rocket),
      Err(error) => {
        log::error!("{}", error);
        Err(rocket)
      }
    }
  })
}
