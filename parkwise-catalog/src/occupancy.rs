use parkwise_shared::{OccupancySnapshot, Spot, SpotStatus};

/// Count the lot. Booked spots count as occupied.
pub fn aggregate(spots: &[Spot]) -> OccupancySnapshot {
    let total = spots.len();
    let occupied = spots
        .iter()
        .filter(|s| matches!(s.status, SpotStatus::Occupied | SpotStatus::Booked))
        .count();

    OccupancySnapshot {
        available: total - occupied,
        occupied,
        total,
    }
}
