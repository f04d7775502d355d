pub mod dataset;
pub mod export;
pub mod form;
pub mod match_store;
pub mod overview;
pub mod state;
