mod review;

pub use review::ReviewView;
