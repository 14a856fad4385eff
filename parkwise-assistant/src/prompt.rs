use chrono::{DateTime, Utc};
use parkwise_booking::Booking;
use parkwise_catalog::Tariff;
use parkwise_shared::{format_cents, OccupancySnapshot};

/// One sentence describing the user's booking for the system instruction
pub fn booking_status_line(booking: Option<&Booking>, now: DateTime<Utc>) -> String {
    match booking {
        None => "The user has not booked a spot yet.".to_string(),
        Some(b) if b.is_overstaying(now) => format!(
            "The user is currently overstaying at spot {}. Their booked time has expired.",
            b.spot_id
        ),
        Some(b) => format!(
            "The user has an active booking for spot {}. Their time expires in about {} minutes. The booking cost was {}.",
            b.spot_id,
            b.remaining(now).num_minutes(),
            format_cents(b.cost_cents)
        ),
    }
}

pub fn build_system_instruction(
    occupancy: &OccupancySnapshot,
    booking: Option<&Booking>,
    tariff: &Tariff,
    now: DateTime<Utc>,
) -> String {
    format!(
        r#"You are a helpful and friendly AI assistant for 'ParkWise AI', a modern parking booking app for consumers.
Your role is to assist the user with their questions about parking.
You have access to real-time data about the parking lot and the user's current booking.

Current parking lot status: {available} spots available, {occupied} spots occupied, out of {total} total spots.
User's booking status: {booking}

Be concise and helpful. Answer questions about parking availability, booking, pricing ({rate}/hour, bookings from {min} to {max} hours), overstay penalties ({penalty}/hour, billed per hour or part thereof), and general help.
Do not ask them to perform actions you cannot do, like booking a spot for them. Instead, guide them on how to use the app (e.g., "You can book a spot by picking any available spot on the map.")."#,
        available = occupancy.available,
        occupied = occupancy.occupied,
        total = occupancy.total,
        booking = booking_status_line(booking, now),
        rate = format_cents(tariff.hourly_rate_cents),
        min = tariff.min_duration_hours,
        max = tariff.max_duration_hours,
        penalty = format_cents(tariff.penalty_rate_cents),
    )
}
