use serde::{Deserialize, Serialize};

/// Status of a single parking space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SpotStatus {
    Available,
    /// Held by a vehicle this system does not manage
    Occupied,
    /// Held by the current user's booking
    Booked,
}

impl std::fmt::Display for SpotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpotStatus::Available => "AVAILABLE",
            SpotStatus::Occupied => "OCCUPIED",
            SpotStatus::Booked => "BOOKED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Spot {
    pub id: String,
    pub status: SpotStatus,
}

impl Spot {
    pub fn new(id: impl Into<String>, status: SpotStatus) -> Self {
        Self { id: id.into(), status }
    }

    pub fn is_available(&self) -> bool {
        self.status == SpotStatus::Available
    }
}

/// Derived lot counters. `occupied` includes spots booked by the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct OccupancySnapshot {
    pub available: usize,
    pub occupied: usize,
    pub total: usize,
}
