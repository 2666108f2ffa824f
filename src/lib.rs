//! Telegram bot for a blinds and curtains workshop: lead capture, catalog
//! browsing, scheduled channel posts and an LLM-assisted post generator.

pub mod bot;
pub mod config;
pub mod context;
pub mod db;
pub mod dialogue;
pub mod llm;
pub mod poster;
pub mod texts;
pub mod web;
