pub mod rules;
pub mod potential;
pub mod service;

pub use potential::roast_potential;
pub use rules::{evaluate, fallback_roasts};
pub use service::RoastService;
