//! Integration tests for the engagement store.

mod collections;
mod cross_context;
mod interactions;
mod projection;
mod support;
