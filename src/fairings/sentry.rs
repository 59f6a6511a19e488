use std::sync::Mutex;

use rocket::fairing::{self, Fairing, Info, Kind};
use rocket::{Build, Rocket};
use sentry::ClientInitGuard;

use crate::config::Config;

pub struct SentryFairing {
  guard: Mutex<Option<ClientInitGuard>>,
}

impl SentryFairing {
  pub fn fairing() -> impl Fairing {
    Self {
      guard: Mutex::new(None),
    }
  }

  fn init(&self, dsn: &str) {
    if dsn.is_empty() {
      return;
    }

    let guard = sentry::init(dsn.to_string());

    if let Ok(mut slot) = self.guard.lock() {
      *slot = Some(guard);
    }

    log::info!("sentry error reporting enabled");
  }
}

#[rocket::async_trait]
impl Fairing for SentryFairing {
  fn info(&self) -> Info {
    Info {
      name: "sentry",
      kind: Kind::Ignite,
    }
  }

  async fn on_ignite(&self, rocket: Rocket<Build>) -> fairing::Result {
    if let Some(dsn) = rocket
      .state::<Config>()
      .and_then(|config| config.sentry_dsn.as_deref())
    {
      self.init(dsn);
    }

    Ok(rocket)
  }
}
