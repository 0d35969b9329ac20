//! E2E test suite entry point.

mod cli_workflow;
mod fixture;
mod index_workflow;
