// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod amortization;
pub mod cli;
pub mod commands;
pub mod error;
pub mod models;
pub mod percent;
pub mod recalc;
pub mod storage;
pub mod store;
pub mod summary;
pub mod utils;
