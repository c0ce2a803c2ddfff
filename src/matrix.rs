//! Id-keyed travel-time matrix shared read-only by every day's solve.

use std::collections::HashMap;

use tracing::info;

use crate::error::{PlannerError, Result};
use crate::poi::{Hotel, Poi, PoiId};
use crate::traits::DistanceMatrixProvider;

/// Travel minutes for every ordered pair over {hotel} ∪ POIs, self-pairs included.
#[derive(Debug, Clone, Default)]
pub struct DistanceMatrix {
    minutes: HashMap<(PoiId, PoiId), f64>,
}

impl DistanceMatrix {
    /// Queries `provider` once for all nodes.
    pub fn build<M>(hotel: &Hotel, pois: &[Poi], provider: &M) -> Result<Self>
    where
        M: DistanceMatrixProvider + ?Sized,
    {
        let nodes: Vec<&Poi> = std::iter::once(hotel.as_poi()).chain(pois.iter()).collect();
        let locations: Vec<(f64, f64)> = nodes.iter().map(|poi| poi.location.as_tuple()).collect();

        info!(nodes = nodes.len(), "computing travel-time matrix");
        let raw = provider.matrix_for(&locations)?;
        if raw.len() != nodes.len() || raw.iter().any(|row| row.len() != nodes.len()) {
            return Err(PlannerError::upstream(format!(
                "travel-time source returned a matrix that is not {0}x{0}",
                nodes.len()
            )));
        }

        let mut minutes = HashMap::with_capacity(nodes.len() * nodes.len());
        for (i, from) in nodes.iter().enumerate() {
            for (j, to) in nodes.iter().enumerate() {
                let value = if i == j { 0.0 } else { raw[i][j] };
                if !value.is_finite() || value < 0.0 {
                    return Err(PlannerError::upstream(format!(
                        "invalid travel time {value} from {} to {}",
                        from.id, to.id
                    )));
                }
                minutes.insert((from.id.clone(), to.id.clone()), value);
            }
        }

        Ok(Self { minutes })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ((PoiId, PoiId), f64)>) -> Self {
        Self {
            minutes: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, from: &PoiId, to: &PoiId) -> Option<f64> {
        if from == to {
            return Some(0.0);
        }
        self.minutes.get(&(from.clone(), to.clone())).copied()
    }

    /// Like [`get`](Self::get) but a missing pair is an error.
    pub fn travel_time(&self, from: &PoiId, to: &PoiId) -> Result<f64> {
        self.get(from, to).ok_or_else(|| {
            PlannerError::upstream(format!("no travel time from {from} to {to}"))
        })
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }
}
