// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for EcoSort.
//!
//! - [`MockClassifier`] returns queued classifications or errors
//! - [`MemoryProgressStore`] keeps progress in memory using the real scoring rules

pub mod memory_store;
pub mod mock_classifier;

pub use memory_store::MemoryProgressStore;
pub use mock_classifier::MockClassifier;
