use statetime_core::model::RegionCode;
use std::collections::HashMap;

/// dense integer ids for the distinct region codes present in an index.
/// this is the id contract batch point-classification callers rely on when
/// returning classification results as parallel id arrays: ids are
/// assigned alphabetically with the unknown sentinel always last, unknown
/// codes and out-of-range ids both resolve to the sentinel. the table is
/// stable only for the region set it was derived from: index inserts
/// change the id space, so ids must never be cached across a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionIdTable {
    id_to_region: Vec<RegionCode>,
    region_to_id: HashMap<RegionCode, u8>,
}

impl RegionIdTable {
    pub fn from_regions<'a, I>(regions: I) -> RegionIdTable
    where
        I: IntoIterator<Item = &'a RegionCode>,
    {
        let mut distinct: Vec<RegionCode> = regions
            .into_iter()
            .filter(|region| !region.is_unknown())
            .cloned()
            .collect();
        distinct.sort();
        distinct.dedup();
        distinct.push(RegionCode::unknown());
        let region_to_id = distinct
            .iter()
            .enumerate()
            .map(|(id, region)| (region.clone(), id as u8))
            .collect();
        RegionIdTable {
            id_to_region: distinct,
            region_to_id,
        }
    }

    /// the id for a region code; codes not present map to the unknown id.
    pub fn region_to_id(&self, region: &RegionCode) -> u8 {
        self.region_to_id
            .get(region)
            .copied()
            .unwrap_or_else(|| self.unknown_id())
    }

    /// the region code for an id; out-of-range ids yield the unknown
    /// sentinel.
    pub fn id_to_region(&self, id: u8) -> RegionCode {
        self.id_to_region
            .get(id as usize)
            .cloned()
            .unwrap_or_else(RegionCode::unknown)
    }

    pub fn unknown_id(&self) -> u8 {
        (self.id_to_region.len() - 1) as u8
    }

    pub fn len(&self) -> usize {
        self.id_to_region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_region.is_empty()
    }
}
