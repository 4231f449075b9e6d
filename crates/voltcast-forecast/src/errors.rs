// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of VoltCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use thiserror::Error;

/// Forecast API error types
#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Forecast API returned error status {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Connection timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ForecastError {
    /// Maps a transport error, keeping timeouts distinguishable
    pub(crate) fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::HttpError(err)
        }
    }
}

pub type ForecastResult<T> = Result<T, ForecastError>;
