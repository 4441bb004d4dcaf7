//! Location acquisition: one bounded platform query per refresh.

use crate::core::calculator::proximity::covering_site;
use crate::models::geo::{GeoPoint, LocationReading, OfficeSite};
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Why a location query produced no coordinates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("position unavailable: {0}")]
    Unavailable(String),

    #[error("no position within {0:?}")]
    Timeout(Duration),
}

/// Platform geolocation query.
pub trait LocationProvider: Send + Sync {
    fn locate(&self) -> Result<GeoPoint, LocationError>;
}

/// Coordinates entered by hand (`--lat/--lon`).
pub struct FixedLocation(pub GeoPoint);

impl LocationProvider for FixedLocation {
    fn locate(&self) -> Result<GeoPoint, LocationError> {
        if self.0.is_valid() {
            Ok(self.0)
        } else {
            Err(LocationError::Unavailable(format!(
                "invalid coordinates {}",
                self.0.short()
            )))
        }
    }
}

/// Provider used when no position source is configured.
pub struct NoLocation(pub LocationError);

impl LocationProvider for NoLocation {
    fn locate(&self) -> Result<GeoPoint, LocationError> {
        Err(self.0.clone())
    }
}

/// Run `provider` on a worker thread and wait at most `timeout`.
///
/// A late answer is dropped together with the channel; the worker never
/// blocks the caller past the deadline.
pub fn locate_with_timeout(
    provider: Arc<dyn LocationProvider>,
    timeout: Duration,
) -> Result<GeoPoint, LocationError> {
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("location-query".into())
        .spawn(move || {
            let _ = tx.send(provider.locate());
        });

    if let Err(e) = spawned {
        return Err(LocationError::Unavailable(e.to_string()));
    }

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(LocationError::Timeout(timeout)),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(LocationError::Unavailable(
            "location worker stopped without an answer".into(),
        )),
    }
}

/// Build a reading for a resolved point: the address of the site that
/// verifies it (same rule as the proximity status), the raw coordinates
/// otherwise.
pub fn reading_for_point(
    point: GeoPoint,
    sites: &[OfficeSite],
    captured_at: NaiveDateTime,
) -> LocationReading {
    let mut reading = LocationReading {
        point: Some(point),
        address: point.short(),
        verified: false,
        captured_at,
    };

    if let Some(covering) = covering_site(&reading, sites) {
        reading.address = if covering.site.address.is_empty() {
            covering.site.name.clone()
        } else {
            covering.site.address.clone()
        };
        reading.verified = true;
    }

    reading
}

/// One refresh: returns the new reading, or the error together with an
/// unusable reading so the caller can surface `unverified`.
pub fn acquire_reading(
    provider: Arc<dyn LocationProvider>,
    sites: &[OfficeSite],
    timeout: Duration,
    captured_at: NaiveDateTime,
) -> Result<LocationReading, (LocationError, LocationReading)> {
    match locate_with_timeout(provider, timeout) {
        Ok(point) => Ok(reading_for_point(point, sites, captured_at)),
        Err(e) => Err((e, LocationReading::unavailable(captured_at))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Slow(Duration);

    impl LocationProvider for Slow {
        fn locate(&self) -> Result<GeoPoint, LocationError> {
            thread::sleep(self.0);
            Ok(GeoPoint::new(45.0, 9.0))
        }
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn hq() -> OfficeSite {
        OfficeSite {
            id: "hq".into(),
            name: "Headquarters".into(),
            address: "Via Roma 1".into(),
            location: GeoPoint::new(45.0, 9.0),
            radius_meters: 100,
        }
    }

    #[test]
    fn fixed_location_inside_site_is_verified() {
        let r = acquire_reading(
            Arc::new(FixedLocation(GeoPoint::new(45.0002, 9.0))),
            &[hq()],
            Duration::from_secs(1),
            at(),
        )
        .unwrap();
        assert!(r.verified);
        assert_eq!(r.address, "Via Roma 1");
    }

    #[test]
    fn far_point_keeps_coordinates_as_address() {
        let r = acquire_reading(
            Arc::new(FixedLocation(GeoPoint::new(46.0, 9.0))),
            &[hq()],
            Duration::from_secs(1),
            at(),
        )
        .unwrap();
        assert!(!r.verified);
        assert_eq!(r.address, "46.00000, 9.00000");
    }

    #[test]
    fn wider_farther_site_verifies_the_reading() {
        // kiosk is nearest (150 m) but covers only 50 m; campus at 300 m covers 500 m
        let meters = |m: f64| (m / crate::core::calculator::distance::EARTH_RADIUS_METERS).to_degrees();
        let kiosk = OfficeSite {
            id: "kiosk".into(),
            name: "Kiosk".into(),
            address: "Kiosk corner".into(),
            location: GeoPoint::new(45.0 + meters(150.0), 9.0),
            radius_meters: 50,
        };
        let campus = OfficeSite {
            id: "campus".into(),
            name: "Campus".into(),
            address: String::new(),
            location: GeoPoint::new(45.0 - meters(300.0), 9.0),
            radius_meters: 500,
        };

        let r = reading_for_point(GeoPoint::new(45.0, 9.0), &[kiosk, campus], at());
        assert!(r.verified);
        assert_eq!(r.address, "Campus");
    }

    #[test]
    fn permission_denied_gives_unusable_reading() {
        let (err, reading) = acquire_reading(
            Arc::new(NoLocation(LocationError::PermissionDenied)),
            &[hq()],
            Duration::from_secs(1),
            at(),
        )
        .unwrap_err();
        assert_eq!(err, LocationError::PermissionDenied);
        assert!(!reading.has_point());
    }

    #[test]
    fn slow_provider_times_out() {
        let started = std::time::Instant::now();
        let res = locate_with_timeout(
            Arc::new(Slow(Duration::from_millis(500))),
            Duration::from_millis(20),
        );
        assert!(matches!(res, Err(LocationError::Timeout(_))));
        assert!(started.elapsed() < Duration::from_millis(400));
    }

    #[test]
    fn invalid_fixed_coordinates_are_rejected() {
        let res = FixedLocation(GeoPoint::new(123.0, 9.0)).locate();
        assert!(matches!(res, Err(LocationError::Unavailable(_))));
    }
}
