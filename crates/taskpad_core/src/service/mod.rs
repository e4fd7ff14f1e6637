//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate collection mutations and persistence into use-case APIs.
//! - Keep the controller decoupled from storage details.

pub mod task_service;
