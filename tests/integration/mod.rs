//! Integration tests for mdocs
//!
//! These tests drive several layers together: the HTTP client against a
//! local server, the document library and session handling against the
//! in-memory repository, the application reducer, rendering and the binary.

#[path = "../common/mod.rs"]
pub mod common;

pub mod app_flow;
pub mod cli;
pub mod document_flow;
pub mod render;
