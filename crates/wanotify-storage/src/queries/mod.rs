// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules for the queue and config-store tables.

pub mod config_store;
pub mod queue;
