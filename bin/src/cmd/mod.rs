//! CLI subcommand modules.
//!
//! This module contains the implementations for all ronda CLI subcommands.

pub(crate) mod batch;
pub(crate) mod components;
pub(crate) mod score;
