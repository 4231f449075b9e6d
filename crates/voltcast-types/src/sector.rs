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

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Campus consumption sector.
///
/// The set is closed and ordered; the order is the display order used by every
/// chart, table and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "Staff Quarters")]
    StaffQuarters,
    #[serde(rename = "Academic Blocks")]
    AcademicBlocks,
    #[serde(rename = "Hostels")]
    Hostels,
    #[serde(rename = "Chiller Plants")]
    ChillerPlants,
    #[serde(rename = "STP")]
    Stp,
}

pub const SECTOR_COUNT: usize = 5;

impl Sector {
    /// All sectors in display order
    pub fn all() -> &'static [Sector; SECTOR_COUNT] {
        &[
            Self::StaffQuarters,
            Self::AcademicBlocks,
            Self::Hostels,
            Self::ChillerPlants,
            Self::Stp,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::StaffQuarters => "Staff Quarters",
            Self::AcademicBlocks => "Academic Blocks",
            Self::Hostels => "Hostels",
            Self::ChillerPlants => "Chiller Plants",
            Self::Stp => "STP",
        }
    }

    /// Key of this sector inside a backend `prediction` object.
    ///
    /// The chiller key contains a literal space; the backend emits it that way.
    pub fn raw_key(&self) -> &'static str {
        match self {
            Self::StaffQuarters => "consumption_Staff_quarters",
            Self::AcademicBlocks => "consumption_Academic_blocks",
            Self::Hostels => "consumption_Hostels",
            Self::ChillerPlants => "consumption_Chiller plant",
            Self::Stp => "consumption_STP",
        }
    }

    /// Bar chart label: the first space of the display name becomes a line break
    pub fn bar_label(&self) -> String {
        self.display_name().replacen(' ', "\n", 1)
    }

    /// Chart colour as a hex string
    pub fn color(&self) -> &'static str {
        match self {
            Self::StaffQuarters => "#8884d8",
            Self::AcademicBlocks => "#82ca9d",
            Self::Hostels => "#ffc658",
            Self::ChillerPlants => "#ff7c7c",
            Self::Stp => "#8dd1e1",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::StaffQuarters => 0,
            Self::AcademicBlocks => 1,
            Self::Hostels => 2,
            Self::ChillerPlants => 3,
            Self::Stp => 4,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sector: '{0}'")]
pub struct UnknownSector(pub String);

impl FromStr for Sector {
    type Err = UnknownSector;

    /// Accepts either the display name or the backend key
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|sector| sector.display_name() == s || sector.raw_key() == s)
            .copied()
            .ok_or_else(|| UnknownSector(s.to_owned()))
    }
}

/// One value per sector.
///
/// Every sector is always present; a sector the backend did not report holds 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SectorValues([f64; SECTOR_COUNT]);

impl SectorValues {
    pub fn from_fn(mut f: impl FnMut(Sector) -> f64) -> Self {
        let mut values = [0.0; SECTOR_COUNT];
        for sector in Sector::all() {
            values[sector.index()] = f(*sector);
        }
        Self(values)
    }

    pub fn get(&self, sector: Sector) -> f64 {
        self.0[sector.index()]
    }

    pub fn set(&mut self, sector: Sector, value: f64) {
        self.0[sector.index()] = value;
    }

    /// `(sector, value)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Sector, f64)> + '_ {
        Sector::all().iter().map(|sector| (*sector, self.get(*sector)))
    }

    /// Sum over all sectors
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Serialize for SectorValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(SECTOR_COUNT))?;
        for (sector, value) in self.iter() {
            map.serialize_entry(sector.display_name(), &value)?;
        }
        map.end()
    }
}
