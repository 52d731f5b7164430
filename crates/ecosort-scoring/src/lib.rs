// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic reward rules for EcoSort.
//!
//! Everything here is pure: no I/O, no clocks, no randomness. Stores call
//! into [`progress::apply_update`] from inside their own transaction so the
//! arithmetic lives in one place regardless of the backend.

pub mod badges;
pub mod points;
pub mod policy;
pub mod progress;
pub mod streak;

pub use badges::newly_earned;
pub use points::{level_for_points, score};
pub use policy::policy_for;
pub use progress::{apply_update, CategoryCounts};
pub use streak::next_streak;
