// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits at the seams of the scan pipeline.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod classifier;
pub mod store;

pub use adapter::PluginAdapter;
pub use classifier::ClassificationProvider;
pub use store::ProgressStore;
