// src/lib.rs

//! OwwJurnal Library

pub mod client;
pub mod error;
pub mod functions;
pub mod inference;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

pub use error::{AppError, Result};
