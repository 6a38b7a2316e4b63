//! lscode - TypeScript symbol references and definitions
//!
//! Resolves which tsconfig governs a file, turns a bare symbol name into the
//! declarations it names there, and answers reference and definition queries
//! for the selected declaration. Built for AI coding agents.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod infra;
pub mod models;
pub mod services;

pub use error::{LscodeError, LscodeResult};
