//! Core library exports for the marketplace blog publishing service.
//!
//! This crate exposes the domain model, Diesel persistence, validated forms,
//! public projections and the service layer that resolves taxonomy, allocates
//! slugs and upserts posts transactionally.

pub mod db;
pub mod domain;
pub mod dto;
pub mod error_conversions;
pub mod forms;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod schema;
pub mod services;
