//! Car Zone API - backend for a car marketplace.
//!
//! This crate provides:
//! - Accounts with buyer/seller profiles and role-based admin access
//! - Car listings, favorites and buyer-seller messaging
//! - Moderation reports with bulk review actions
//! - Daily analytics and search logging
//! - An idempotent seed loader for development data

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod validation;
