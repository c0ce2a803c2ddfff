//! Partitioning POIs into day-sized geographic groups.

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::error::{PlannerError, Result};
use crate::poi::{Coordinate, Poi};
use crate::projection::{PlanarPoint, project_all};

/// One day's group of POIs. Membership only; visiting order is decided later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    pub members: Vec<Poi>,
    /// Mean of member coordinates.
    pub centroid: Coordinate,
    pub mean_prominence: f64,
}

impl Cluster {
    /// Tags each member with `id` and derives the summary fields.
    ///
    /// An empty cluster gets a (0, 0) centroid and zero mean prominence.
    pub fn new(id: usize, mut members: Vec<Poi>) -> Self {
        for poi in &mut members {
            poi.cluster = Some(id);
        }
        let size = members.len() as f64;
        let (centroid, mean_prominence) = if members.is_empty() {
            (Coordinate::new(0.0, 0.0), 0.0)
        } else {
            let lat = members.iter().map(|p| p.location.lat).sum::<f64>() / size;
            let lng = members.iter().map(|p| p.location.lng).sum::<f64>() / size;
            let prominence = members.iter().map(Poi::prominence).sum::<f64>() / size;
            (Coordinate::new(lat, lng), prominence)
        };

        Self {
            id,
            members,
            centroid,
            mean_prominence,
        }
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Result of clustering: groups in day order plus the hotel anchor.
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Sorted by non-increasing mean prominence; index 0 is day 1.
    pub ranked: Vec<Cluster>,
    /// Id of the cluster with the most members.
    pub largest_cluster: usize,
}

impl Clustering {
    /// Centroid of the largest cluster, where the hotel is placed.
    pub fn hotel_anchor(&self) -> Coordinate {
        self.ranked
            .iter()
            .find(|cluster| cluster.id == self.largest_cluster)
            .map(|cluster| cluster.centroid)
            .unwrap_or(Coordinate::new(0.0, 0.0))
    }
}

/// Clusters `pois` into `config.days` groups using planar offsets from `reference`.
pub fn partition(pois: &[Poi], reference: Coordinate, config: &PlannerConfig) -> Result<Clustering> {
    let locations: Vec<Coordinate> = pois.iter().map(|poi| poi.location).collect();
    let points = project_all(reference, &locations);
    let labels = cluster(&points, config.days, config.cluster_seed, config.cluster_max_iterations)?;

    let mut groups: Vec<Vec<Poi>> = vec![Vec::new(); config.days];
    for (poi, label) in pois.iter().zip(&labels) {
        groups[*label].push(poi.clone());
    }
    let clusters: Vec<Cluster> = groups
        .into_iter()
        .enumerate()
        .map(|(id, members)| Cluster::new(id, members))
        .collect();

    let largest_cluster = largest(&clusters).map(|c| c.id).unwrap_or(0);
    let ranked = rank_by_prominence(clusters);
    info!(
        clusters = ranked.len(),
        largest_cluster,
        "partitioned {} POIs into day clusters",
        pois.len()
    );

    Ok(Clustering {
        ranked,
        largest_cluster,
    })
}

/// Orders clusters by descending mean prominence; ties keep id order.
pub fn rank_by_prominence(mut clusters: Vec<Cluster>) -> Vec<Cluster> {
    clusters.sort_by(|a, b| {
        b.mean_prominence
            .partial_cmp(&a.mean_prominence)
            .unwrap_or(Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    clusters
}

/// Cluster with the most members; the lowest id wins ties.
pub fn largest(clusters: &[Cluster]) -> Option<&Cluster> {
    clusters
        .iter()
        .max_by(|a, b| a.size().cmp(&b.size()).then(b.id.cmp(&a.id)))
}

/// Labels each point with one of `k` non-empty groups (seeded k-means++ then Lloyd).
pub fn cluster(points: &[PlanarPoint], k: usize, seed: u64, max_iterations: usize) -> Result<Vec<usize>> {
    if k == 0 {
        return Err(PlannerError::configuration("cannot cluster into zero days"));
    }
    let distinct = distinct_count(points);
    if k > distinct {
        return Err(PlannerError::configuration(format!(
            "{k} days requested but only {distinct} distinct POI locations are available"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centers = seed_centers(points, k, &mut rng)?;
    let mut labels = vec![usize::MAX; points.len()];

    for iteration in 0..max_iterations.max(1) {
        let mut next: Vec<usize> = points.iter().map(|p| nearest(p, &centers)).collect();
        fill_empty(points, &centers, &mut next, k);

        let converged = next == labels;
        labels = next;
        centers = means(points, &labels, k);
        if converged {
            debug!(iteration, "k-means converged");
            break;
        }
    }

    Ok(labels)
}

fn distinct_count(points: &[PlanarPoint]) -> usize {
    points
        .iter()
        .map(|p| (p.x.to_bits(), p.y.to_bits()))
        .collect::<HashSet<_>>()
        .len()
}

/// k-means++ seeding: each new center drawn proportionally to squared distance.
fn seed_centers(points: &[PlanarPoint], k: usize, rng: &mut StdRng) -> Result<Vec<PlanarPoint>> {
    let mut centers = Vec::with_capacity(k);
    centers.push(points[rng.gen_range(0..points.len())]);

    while centers.len() < k {
        let weights: Vec<f64> = points
            .iter()
            .map(|p| {
                centers
                    .iter()
                    .map(|c| p.distance_sq(c))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();
        let total: f64 = weights.iter().sum();
        if !(total > 0.0) {
            return Err(PlannerError::configuration(
                "not enough distinct POI locations to seed clusters",
            ));
        }

        let mut target = rng.gen_range(0.0..total);
        let mut chosen = points.len() - 1;
        for (i, weight) in weights.iter().enumerate() {
            if *weight > 0.0 && target < *weight {
                chosen = i;
                break;
            }
            target -= weight;
        }
        // Floating-point leftovers can run past the end; fall back to the farthest point.
        if weights[chosen] <= 0.0 {
            chosen = weights
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
        centers.push(points[chosen]);
    }

    Ok(centers)
}

fn nearest(point: &PlanarPoint, centers: &[PlanarPoint]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, center) in centers.iter().enumerate() {
        let dist = point.distance_sq(center);
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Moves the worst-fitting member of the biggest group into each empty group.
fn fill_empty(points: &[PlanarPoint], centers: &[PlanarPoint], labels: &mut [usize], k: usize) {
    loop {
        let mut sizes = vec![0usize; k];
        for label in labels.iter() {
            sizes[*label] += 1;
        }
        let Some(empty) = sizes.iter().position(|size| *size == 0) else {
            return;
        };
        let donor = (0..k).max_by_key(|c| (sizes[*c], std::cmp::Reverse(*c))).unwrap_or(0);
        if sizes[donor] < 2 {
            return;
        }

        let moved = labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == donor)
            .map(|(i, _)| (i, points[i].distance_sq(&centers[donor])))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(b.0.cmp(&a.0)))
            .map(|(i, _)| i);
        match moved {
            Some(i) => labels[i] = empty,
            None => return,
        }
    }
}

fn means(points: &[PlanarPoint], labels: &[usize], k: usize) -> Vec<PlanarPoint> {
    let mut sums = vec![(0.0, 0.0, 0usize); k];
    for (point, label) in points.iter().zip(labels) {
        let entry = &mut sums[*label];
        entry.0 += point.x;
        entry.1 += point.y;
        entry.2 += 1;
    }
    sums.into_iter()
        .map(|(x, y, count)| {
            if count == 0 {
                PlanarPoint::default()
            } else {
                PlanarPoint::new(x / count as f64, y / count as f64)
            }
        })
        .collect()
}
