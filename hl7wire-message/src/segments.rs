//! Composite field types shared across segments.
//!
//! Components join with `^`; trailing empty components are trimmed, matching
//! how interface engines render ER7 composites.

use serde::{Deserialize, Serialize};

/// Joins components with `^`, dropping trailing empties.
pub(crate) fn join_components(components: &[&str]) -> String {
    let mut components: Vec<&str> = components.to_vec();
    while components.last().is_some_and(|c| c.is_empty()) {
        components.pop();
    }
    components.join("^")
}

/// A person name (XPN-style composite).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PersonName {
    pub family_name: String,
    pub given_name: String,
    pub middle_initial_or_name: String,
    pub suffix: String,
    pub prefix: String,
}

impl PersonName {
    /// Encodes as `Family^Given^Middle^Suffix^Prefix`.
    pub fn encode(&self) -> String {
        join_components(&[
            &self.family_name,
            &self.given_name,
            &self.middle_initial_or_name,
            &self.suffix,
            &self.prefix,
        ])
    }
}

/// A postal address (XAD-style composite).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Address {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl Address {
    /// Encodes as `Street^^City^State^Zip^Country`.
    ///
    /// The second component (other designation) is always empty.
    pub fn encode(&self) -> String {
        join_components(&[
            &self.street_address,
            "",
            &self.city,
            &self.state,
            &self.zip,
            &self.country,
        ])
    }
}

/// An identified practitioner (XCN-style composite).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Practitioner {
    #[serde(rename = "ID")]
    pub id: String,
    pub family_name: String,
    pub given_name: String,
    pub middle_initial_or_name: String,
    pub degree: String,
}

impl Practitioner {
    /// Encodes as `ID^Family^Given^Middle^Degree`.
    pub fn encode(&self) -> String {
        join_components(&[
            &self.id,
            &self.family_name,
            &self.given_name,
            &self.middle_initial_or_name,
            &self.degree,
        ])
    }
}

/// An assigned patient location (PL-style composite).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PatientLocation {
    pub point_of_care: String,
    pub room: String,
    pub facility: String,
}

impl PatientLocation {
    /// Encodes as `PointOfCare^Room^Facility`.
    pub fn encode(&self) -> String {
        join_components(&[&self.point_of_care, &self.room, &self.facility])
    }
}
