// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during mesh generation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid ring: {0}")]
    InvalidRing(String),

    #[error("Degenerate triangle: {0}")]
    DegenerateTriangle(String),

    #[error("Projection out of domain: {0}")]
    ProjectionDomain(String),

    #[error("Triangulation failed: {0}")]
    Triangulation(String),

    #[error("Core model error: {0}")]
    Core(#[from] citymesh_core::Error),
}
