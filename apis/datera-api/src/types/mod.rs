// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Type definitions for the Datera API

pub mod app_instance;
pub mod common;
pub mod initiator;
pub mod params;
pub mod user_data;

pub use app_instance::*;
pub use common::*;
pub use initiator::*;
pub use params::*;
pub use user_data::*;
