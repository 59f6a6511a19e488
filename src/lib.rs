#[macro_use]
extern crate rocket;

pub mod config;
pub mod db;
pub mod fairings;
pub mod models;
pub mod response;
pub mod routes;
pub mod schema;
pub mod views;

use config::Config;
use fairings::SentryFairing;
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::{Build, Rocket};

pub fn build(figment: Figment) -> Rocket<Build> {
  rocket::custom(figment)
    .attach(AdHoc::config::<Config>())
    .attach(SentryFairing::fairing())
    .attach(db::DbConn::fairing())
    .attach(db::migrations())
    .mount("/", routes::all())
    .register("/", routes::catchers())
}
