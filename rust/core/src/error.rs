// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for core model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building the layer model
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid layer config: {0}")]
    InvalidLayer(String),

    #[error("Invalid footprint: {0}")]
    InvalidFootprint(String),
}
