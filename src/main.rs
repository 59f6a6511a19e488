use rocket::figment::providers::Env;
use rocket::{launch, Build, Rocket};

#[launch]
fn rocket() -> Rocket<Build> {
  dotenv::dotenv().ok();

  let mut figment = rocket::Config::figment();

  if let Some(database_url) = Env::var("DATABASE_URL") {
    figment = figment.merge(("databases.default.url", database_url));
  }

  reviews_api::build(figment)
}
