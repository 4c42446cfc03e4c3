// SPDX-FileCopyrightText: 2026 Wanotify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test doubles for the wanotify crates.

mod mock_client;

pub use mock_client::MockClient;
