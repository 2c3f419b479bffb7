use statetime_core::model::route::RouteDocument;
use statetime_core::model::RegionCode;

use super::{AttributionError, TripTable};

/// A method for splitting a route's drive time across regions.
pub trait AttributionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// produces the per-region drive time table for one route document.
    fn attribute(&self, route: &RouteDocument) -> Result<TripTable, AttributionError>;
}

/// picks the region with the strictly greatest vote count. ties resolve to
/// the earliest-seen candidate so repeated runs agree.
pub(crate) fn majority_region(votes: &[RegionCode]) -> Option<RegionCode> {
    let mut tally: Vec<(&RegionCode, usize)> = Vec::new();
    for vote in votes.iter() {
        match tally.iter_mut().find(|(region, _)| *region == vote) {
            Some((_, count)) => *count += 1,
            None => tally.push((vote, 1)),
        }
    }
    let mut winner: Option<(&RegionCode, usize)> = None;
    for (region, count) in tally.into_iter() {
        match winner {
            Some((_, best)) if count <= best => {}
            _ => winner = Some((region, count)),
        }
    }
    winner.map(|(region, _)| region.clone())
}

/// converts votes into proportional weights, ignoring unknown classifications
/// unless every vote is unknown.
pub(crate) fn region_weights(votes: &[RegionCode]) -> Vec<(RegionCode, f64)> {
    let known: Vec<&RegionCode> = votes.iter().filter(|r| !r.is_unknown()).collect();
    if known.is_empty() {
        return vec![(RegionCode::unknown(), 1.0)];
    }
    let total = known.len() as f64;
    let mut tally: Vec<(&RegionCode, usize)> = Vec::new();
    for vote in known.into_iter() {
        match tally.iter_mut().find(|(region, _)| *region == vote) {
            Some((_, count)) => *count += 1,
            None => tally.push((vote, 1)),
        }
    }
    tally
        .into_iter()
        .map(|(region, count)| (region.clone(), count as f64 / total))
        .collect()
}
