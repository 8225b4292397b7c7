// Copyright 2026 Parcel Tracker Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP and command-line front end for the parcel-tracker engine.

pub mod config;
pub mod logging;
pub mod rest;
