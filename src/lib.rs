// src/lib.rs

//! rankwatch library
//!
//! Reads a published admission ranking list, reports applicant positions and
//! notifies subscribers when a new list is published.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod utils;

#[cfg(test)]
mod testing;
