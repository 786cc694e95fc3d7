use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::model::Area;

/// Display color assigned to an Area, one of a fixed palette of nine.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaColor {
    Red,
    Orange,
    Amber,
    Green,
    Teal,
    Blue,
    Indigo,
    Purple,
    Pink,
}

/// The allocation order for new areas.
pub const AREA_PALETTE: [AreaColor; 9] = [
    AreaColor::Red,
    AreaColor::Orange,
    AreaColor::Amber,
    AreaColor::Green,
    AreaColor::Teal,
    AreaColor::Blue,
    AreaColor::Indigo,
    AreaColor::Purple,
    AreaColor::Pink,
];

impl fmt::Display for AreaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Amber => "amber",
            Self::Green => "green",
            Self::Teal => "teal",
            Self::Blue => "blue",
            Self::Indigo => "indigo",
            Self::Purple => "purple",
            Self::Pink => "pink",
        };
        f.write_str(s)
    }
}

impl FromStr for AreaColor {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "red" => Ok(Self::Red),
            "orange" => Ok(Self::Orange),
            "amber" => Ok(Self::Amber),
            "green" => Ok(Self::Green),
            "teal" => Ok(Self::Teal),
            "blue" => Ok(Self::Blue),
            "indigo" => Ok(Self::Indigo),
            "purple" => Ok(Self::Purple),
            "pink" => Ok(Self::Pink),
            other => Err(format!("unknown area color: {other}")),
        }
    }
}

/// Pick the color for a newly created area: the first palette entry not used
/// by any existing area, in palette order. Once all nine are taken the palette
/// wraps and colors repeat, starting from the first entry.
pub fn next_area_color(areas: &[Area]) -> AreaColor {
    AREA_PALETTE
        .iter()
        .copied()
        .find(|c| !areas.iter().any(|a| a.color == *c))
        .unwrap_or(AREA_PALETTE[0])
}
