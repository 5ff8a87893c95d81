pub mod scoring_service;

pub use scoring_service::ScoringService;
