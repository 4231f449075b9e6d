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

/// Rounds to one decimal place, half away from zero
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Solar generation as a percentage of consumption, one decimal place.
///
/// Zero (or unusable) consumption yields 0 instead of dividing by zero, and
/// so does a ratio too large to represent.
/// Values above 100 are valid: generation exceeded consumption.
pub fn efficiency_rate(total_generation: f64, total_consumption: f64) -> f64 {
    if total_consumption == 0.0 || !total_consumption.is_finite() || !total_generation.is_finite()
    {
        return 0.0;
    }
    let rate = round_to_tenth(total_generation / total_consumption * 100.0);
    if rate.is_finite() { rate } else { 0.0 }
}
