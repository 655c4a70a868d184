// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod debts;
pub mod doctor;
pub mod entries;
pub mod exporter;
pub mod goals;
pub mod months;
pub mod reports;
