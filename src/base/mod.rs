//! Core components, types, and utilities for the guard-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The system prompt and the fixed replies.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;
