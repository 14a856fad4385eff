use parkwise_core::{LotError, LotResult};
use parkwise_shared::{Spot, SpotStatus};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Spots per lettered section
const SECTION_SIZE: usize = 10;

/// Fixed population of parking spots.
///
/// Transitions never mutate the receiver; they return the updated registry so
/// callers can commit it together with the booking change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotRegistry {
    spots: Vec<Spot>,
}

impl SpotRegistry {
    /// Build `count` spots, each available with probability `available_probability`
    pub fn initialize<R: Rng + ?Sized>(count: usize, available_probability: f64, rng: &mut R) -> Self {
        let p = if available_probability.is_nan() {
            0.0
        } else {
            available_probability.clamp(0.0, 1.0)
        };

        let spots = (0..count)
            .map(|index| {
                let status = if rng.gen_bool(p) {
                    SpotStatus::Available
                } else {
                    SpotStatus::Occupied
                };
                Spot::new(Self::spot_id(index), status)
            })
            .collect();

        Self { spots }
    }

    pub fn from_spots(spots: Vec<Spot>) -> Self {
        Self { spots }
    }

    /// Identifier for the spot at `index`: section letter plus 1-based number.
    /// Index 0 is `A1`, 10 is `B1`, 23 is `C4`. Past `Z` sections continue as `AA`, `AB`, ...
    pub fn spot_id(index: usize) -> String {
        let number = index % SECTION_SIZE + 1;
        format!("{}{}", section_label(index / SECTION_SIZE), number)
    }

    pub fn get(&self, spot_id: &str) -> Option<&Spot> {
        self.spots.iter().find(|s| s.id == spot_id)
    }

    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Available -> Booked
    pub fn mark_booked(&self, spot_id: &str) -> LotResult<SpotRegistry> {
        self.transition(spot_id, SpotStatus::Available, SpotStatus::Booked)
    }

    /// Booked -> Available
    pub fn mark_available(&self, spot_id: &str) -> LotResult<SpotRegistry> {
        self.transition(spot_id, SpotStatus::Booked, SpotStatus::Available)
    }

    fn transition(&self, spot_id: &str, from: SpotStatus, to: SpotStatus) -> LotResult<SpotRegistry> {
        let current = self
            .get(spot_id)
            .ok_or_else(|| LotError::SpotNotFound(spot_id.to_string()))?;

        if current.status != from {
            return Err(LotError::InvalidTransition {
                spot_id: spot_id.to_string(),
                from: current.status,
                to,
            });
        }

        let spots = self
            .spots
            .iter()
            .map(|s| {
                if s.id == spot_id {
                    Spot::new(s.id.clone(), to)
                } else {
                    s.clone()
                }
            })
            .collect();

        tracing::debug!(spot_id, %from, %to, "Spot transition");
        Ok(Self { spots })
    }
}

/// 0 -> "A", 25 -> "Z", 26 -> "AA"
fn section_label(section: usize) -> String {
    let mut n = section + 1;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn registry(statuses: &[SpotStatus]) -> SpotRegistry {
        SpotRegistry::from_spots(
            statuses
                .iter()
                .enumerate()
                .map(|(i, s)| Spot::new(SpotRegistry::spot_id(i), *s))
                .collect(),
        )
    }

    #[test]
    fn test_spot_id_scheme() {
        assert_eq!(SpotRegistry::spot_id(0), "A1");
        assert_eq!(SpotRegistry::spot_id(9), "A10");
        assert_eq!(SpotRegistry::spot_id(10), "B1");
        assert_eq!(SpotRegistry::spot_id(23), "C4");
        assert_eq!(SpotRegistry::spot_id(259), "Z10");
        assert_eq!(SpotRegistry::spot_id(260), "AA1");
    }

    #[test]
    fn test_initialize_count_and_unique_ids() {
        let mut rng = StdRng::seed_from_u64(7);

        for count in [0, 1, 10, 50, 300] {
            let registry = SpotRegistry::initialize(count, 0.7, &mut rng);
            assert_eq!(registry.len(), count);

            let ids: HashSet<_> = registry.spots().iter().map(|s| s.id.clone()).collect();
            assert_eq!(ids.len(), count);
            assert!(registry.spots().iter().all(|s| s.status != SpotStatus::Booked));
        }
    }

    #[test]
    fn test_initialize_is_deterministic_for_seed() {
        let a = SpotRegistry::initialize(50, 0.7, &mut StdRng::seed_from_u64(42));
        let b = SpotRegistry::initialize(50, 0.7, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_initialize_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(1);

        let all_free = SpotRegistry::initialize(20, 1.0, &mut rng);
        assert!(all_free.spots().iter().all(|s| s.is_available()));

        let all_taken = SpotRegistry::initialize(20, 0.0, &mut rng);
        assert!(all_taken.spots().iter().all(|s| s.status == SpotStatus::Occupied));

        // Out-of-range probabilities are clamped rather than panicking
        let clamped = SpotRegistry::initialize(5, 3.5, &mut rng);
        assert!(clamped.spots().iter().all(|s| s.is_available()));
    }

    #[test]
    fn test_book_then_release_round_trip() {
        let original = registry(&[SpotStatus::Available, SpotStatus::Occupied, SpotStatus::Available]);

        let booked = original.mark_booked("A1").unwrap();
        assert_eq!(booked.get("A1").unwrap().status, SpotStatus::Booked);
        assert_eq!(booked.get("A2").unwrap().status, SpotStatus::Occupied);
        assert_eq!(booked.get("A3").unwrap().status, SpotStatus::Available);

        // Receiver untouched
        assert_eq!(original.get("A1").unwrap().status, SpotStatus::Available);

        let released = booked.mark_available("A1").unwrap();
        assert_eq!(released, original);
    }

    #[test]
    fn test_invalid_transitions() {
        let registry = registry(&[SpotStatus::Occupied, SpotStatus::Available, SpotStatus::Booked]);

        assert_eq!(
            registry.mark_booked("A1"),
            Err(LotError::InvalidTransition {
                spot_id: "A1".to_string(),
                from: SpotStatus::Occupied,
                to: SpotStatus::Booked,
            })
        );
        assert!(matches!(registry.mark_booked("A3"), Err(LotError::InvalidTransition { .. })));
        assert!(matches!(registry.mark_available("A2"), Err(LotError::InvalidTransition { .. })));
        assert!(matches!(registry.mark_available("A1"), Err(LotError::InvalidTransition { .. })));
        assert_eq!(
            registry.mark_booked("Q9"),
            Err(LotError::SpotNotFound("Q9".to_string()))
        );
    }
}
