pub mod batch;
pub mod decision;
pub mod predictor;
