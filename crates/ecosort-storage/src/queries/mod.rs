// SPDX-FileCopyrightText: 2026 EcoSort Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table group.

pub mod badges;
pub mod leaderboard;
pub mod profiles;
pub mod scans;
pub mod scoring;
