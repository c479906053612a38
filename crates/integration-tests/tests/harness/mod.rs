//! Shared fixtures for host-level tests

#![allow(dead_code)]

pub mod context;
pub mod mock_llm;
