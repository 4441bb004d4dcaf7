//! Matches a location reading to the known office sites.

use crate::core::calculator::distance::distance;
use crate::models::geo::{LocationReading, OfficeSite};
use crate::models::status::{ProximityResult, ProximityStatus};
use crate::models::work_mode::WorkMode;

/// Nearest office site and the distance to it.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestSite<'a> {
    pub site: &'a OfficeSite,
    pub distance: f64,
}

impl NearestSite<'_> {
    pub fn within_range(&self) -> bool {
        self.distance <= f64::from(self.site.radius_meters)
    }
}

/// Nearest site to `current`, or `None` without coordinates or sites.
/// Ties keep the first site in input order.
pub fn resolve_nearest<'a>(
    current: &LocationReading,
    sites: &'a [OfficeSite],
) -> Option<NearestSite<'a>> {
    if !current.has_point() {
        return None;
    }
    let point = current.point?;

    let mut best: Option<NearestSite<'a>> = None;
    for site in sites {
        let d = distance(point, site.location);
        if !d.is_finite() {
            continue;
        }
        match &best {
            // strict `<` keeps the earlier site on ties
            Some(b) if d.total_cmp(&b.distance).is_ge() => {}
            _ => best = Some(NearestSite { site, distance: d }),
        }
    }
    best
}

/// Closest site whose radius contains the reading, if any.
fn nearest_covering<'a>(
    current: &LocationReading,
    sites: &'a [OfficeSite],
) -> Option<NearestSite<'a>> {
    let point = current.point?;
    sites
        .iter()
        .map(|site| NearestSite {
            site,
            distance: distance(point, site.location),
        })
        .filter(|n| n.distance.is_finite() && n.within_range())
        .fold(None, |best: Option<NearestSite<'a>>, n| match best {
            Some(b) if n.distance.total_cmp(&b.distance).is_ge() => Some(b),
            _ => Some(n),
        })
}

/// Site that verifies the reading: the nearest one when it covers the
/// point, otherwise the closest site whose radius does.
pub fn covering_site<'a>(
    current: &LocationReading,
    sites: &'a [OfficeSite],
) -> Option<NearestSite<'a>> {
    match resolve_nearest(current, sites) {
        Some(nearest) if nearest.within_range() => Some(nearest),
        Some(_) => nearest_covering(current, sites),
        None => None,
    }
}

/// Verification status for the given mode and reading.
///
/// The nearest site decides; when it does not cover the point but a
/// farther site with a wider radius does, that site is reported instead,
/// so `OutsideRange` always means "outside every site's radius".
pub fn verification_status(
    mode: WorkMode,
    current: Option<&LocationReading>,
    sites: &[OfficeSite],
) -> ProximityResult {
    if !mode.requires_verification() {
        return ProximityResult {
            status: ProximityStatus::NotRequired,
            site: None,
            distance_meters: None,
        };
    }

    let Some(reading) = current else {
        return unverified();
    };

    let Some(nearest) = resolve_nearest(reading, sites) else {
        return unverified();
    };

    if let Some(covering) = covering_site(reading, sites) {
        return ProximityResult {
            status: ProximityStatus::Verified,
            site: Some(covering.site.clone()),
            distance_meters: Some(covering.distance),
        };
    }

    ProximityResult {
        status: ProximityStatus::OutsideRange,
        site: Some(nearest.site.clone()),
        distance_meters: Some(nearest.distance),
    }
}

fn unverified() -> ProximityResult {
    ProximityResult {
        status: ProximityStatus::Unverified,
        site: None,
        distance_meters: None,
    }
}
