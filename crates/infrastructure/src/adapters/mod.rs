//! Transport adapters.

mod reqwest_engine;

pub use reqwest_engine::{ReqwestContext, ReqwestEngine};
