#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Building and fire-start location taxonomy for dwelling fires.
//!
//! The incident-level data carries free-text dwelling types and fire-start
//! locations. This crate defines the coarse groups used for the
//! "House vs. Flats" comparison and the rules that map raw dimension
//! labels into them. Unrecognized labels are not errors: they fall through
//! to [`BuildingGroup::Other`] or [`LocationGroup::OtherRoomExternal`].

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Dwelling type label for a single-occupancy house.
pub const HOUSE_SINGLE_OCCUPANCY: &str = "House - single occupancy";

/// Prefix shared by every purpose-built flat dwelling type
/// (low-rise, medium-rise, high-rise).
pub const PURPOSE_BUILT_PREFIX: &str = "Purpose Built";

/// Raw fire-start locations grouped as living space.
pub const LIVING_BEDROOM_LOCATIONS: &[&str] = &["Living Room", "Bedroom/ Bedsitting Room"];

/// Raw fire-start locations grouped as communal areas and escape routes.
pub const COMMUNAL_LOCATIONS: &[&str] = &[
    "Refuse Store",
    "Corridor/ Hall/ Open Plan Area/ Reception Area",
    "Stairs/ Under stairs (enclosed area)",
];

/// Coarse building category derived from the raw dwelling type.
///
/// Variants are declared in label order so that the derived [`Ord`]
/// matches alphabetical ordering of the display names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum BuildingGroup {
    /// Single-occupancy houses.
    #[serde(rename = "House")]
    #[strum(serialize = "House")]
    House,
    /// Any dwelling type outside the comparison.
    #[serde(rename = "Other")]
    #[strum(serialize = "Other")]
    Other,
    /// All purpose-built flats regardless of height.
    #[serde(rename = "Purpose Built Flats")]
    #[strum(serialize = "Purpose Built Flats")]
    PurposeBuiltFlats,
}

impl BuildingGroup {
    /// Classifies a raw dwelling type label.
    #[must_use]
    pub fn classify(dwelling_type: &str) -> Self {
        if dwelling_type == HOUSE_SINGLE_OCCUPANCY {
            return Self::House;
        }
        if dwelling_type.starts_with(PURPOSE_BUILT_PREFIX) {
            return Self::PurposeBuiltFlats;
        }
        Self::Other
    }

    /// Whether this group takes part in the house vs. flats comparison.
    ///
    /// [`Self::Other`] is excluded from the comparison as a product
    /// decision; nothing else is filtered.
    #[must_use]
    pub const fn is_compared(self) -> bool {
        matches!(self, Self::House | Self::PurposeBuiltFlats)
    }
}

/// Coarse room category derived from the raw fire-start location.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum LocationGroup {
    /// Refuse stores, corridors, halls and enclosed stairs.
    #[serde(rename = "Communal/Escape Routes")]
    #[strum(serialize = "Communal/Escape Routes")]
    CommunalEscapeRoutes,
    /// Kitchens.
    #[serde(rename = "Kitchen")]
    #[strum(serialize = "Kitchen")]
    Kitchen,
    /// Living rooms and bedrooms.
    #[serde(rename = "Living/Bedroom")]
    #[strum(serialize = "Living/Bedroom")]
    LivingBedroom,
    /// Everything else, including external locations.
    #[serde(rename = "Other Room/External")]
    #[strum(serialize = "Other Room/External")]
    OtherRoomExternal,
}

impl LocationGroup {
    /// Classifies a raw fire-start location label.
    #[must_use]
    pub fn classify(location: &str) -> Self {
        if location == "Kitchen" {
            return Self::Kitchen;
        }
        if LIVING_BEDROOM_LOCATIONS.contains(&location) {
            return Self::LivingBedroom;
        }
        if COMMUNAL_LOCATIONS.contains(&location) {
            return Self::CommunalEscapeRoutes;
        }
        Self::OtherRoomExternal
    }

    /// Whether this group is dropped from the comparison after
    /// percentages have been computed.
    #[must_use]
    pub const fn is_noise(self) -> bool {
        matches!(self, Self::OtherRoomExternal)
    }
}
