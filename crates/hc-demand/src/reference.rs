//! Built-in store catalogue for the Oaxaca study area.

use hc_core::GeoPoint;

use crate::{Facility, FacilityKind, FacilitySite};

/// The chain's existing branches, with their in-house attractiveness scores.
pub fn own_stores() -> Vec<Facility> {
    vec![
        Facility::new("A", "Sucursal Violetas", FacilityKind::Own, GeoPoint::new(17.078904, -96.710641), 4.0),
        Facility::new("B", "Sucursal Poniente", FacilityKind::Own, GeoPoint::new(17.07, -96.73), 4.0),
        Facility::new("C", "Sucursal Sur", FacilityKind::Own, GeoPoint::new(17.05, -96.71), 4.2),
    ]
}

/// Known competitors.  They carry no score; resolve one through an
/// [`AttractivenessProvider`][crate::AttractivenessProvider].
pub fn competitors() -> Vec<FacilitySite> {
    vec![
        FacilitySite::new("X", "Joyería Nice", FacilityKind::Competitor, GeoPoint::new(17.078891, -96.710177)),
        FacilitySite::new("Y", "Joyería Sublime", FacilityKind::Competitor, GeoPoint::new(17.078206, -96.710654)),
        FacilitySite::new("Z", "Joyería Ag 925", FacilityKind::Competitor, GeoPoint::new(17.080318, -96.713559)),
    ]
}
