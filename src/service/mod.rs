//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the guard-bot:
//! - Chat services (e.g., Slack)
//! - LLM services (e.g., Gemini via its OpenAI-compatible API)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod llm;
