pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::classifier::{load_classifier, LinearModel};
pub use adapters::http::HttpServer;
pub use config::toml_config::TomlConfig;
pub use self::core::{batch::predict_csv, decision::rule_based_placement, predictor::Predictor};
pub use domain::model::{Decision, ScoreBounds, ScoreInput};
pub use domain::ports::Classifier;
pub use utils::error::{PredictorError, Result};
