//! Municipal departments and the category-to-department routing table.
//!
//! The original deployment duplicated this mapping in several places with
//! slightly different category sets; this module is now the single source
//! of truth for which department owns which issue category.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The five municipal departments. The set is closed: departments are
/// seeded at deployment and never created through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Electrical,
    Pwd,
    Municipal,
    Water,
    Sanitation,
}

/// All departments, in seed order.
pub const ALL_DEPARTMENTS: &[Department] = &[
    Department::Electrical,
    Department::Pwd,
    Department::Municipal,
    Department::Water,
    Department::Sanitation,
];

impl Department {
    /// Display name as stored in the `departments` table (e.g. `"PWD"`).
    pub fn name(self) -> &'static str {
        match self {
            Department::Electrical => "Electrical",
            Department::Pwd => "PWD",
            Department::Municipal => "Municipal",
            Department::Water => "Water",
            Department::Sanitation => "Sanitation",
        }
    }

    /// Lowercase role slug used in JWT claims and the `users.role` column
    /// (e.g. `"pwd"`).
    pub fn role_slug(self) -> &'static str {
        match self {
            Department::Electrical => "electrical",
            Department::Pwd => "pwd",
            Department::Municipal => "municipal",
            Department::Water => "water",
            Department::Sanitation => "sanitation",
        }
    }

    /// Resolve a department from its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_DEPARTMENTS.iter().copied().find(|d| d.name() == name)
    }

    /// Resolve a department from its role slug.
    pub fn from_role_slug(slug: &str) -> Option<Self> {
        ALL_DEPARTMENTS
            .iter()
            .copied()
            .find(|d| d.role_slug() == slug)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The closed set of reportable issue categories, grouped by owning
/// department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    StreetLight,
    PowerOutage,
    ElectricalWiring,
    RoadDamage,
    Potholes,
    BridgeRepair,
    GarbageCollection,
    Sewage,
    PublicToilets,
    WaterSupply,
    WaterLeakage,
    Drainage,
    Parks,
    PublicBuildings,
    Playgrounds,
}

/// All categories, in the order presented to reporters.
pub const ALL_CATEGORIES: &[Category] = &[
    Category::StreetLight,
    Category::PowerOutage,
    Category::ElectricalWiring,
    Category::RoadDamage,
    Category::Potholes,
    Category::BridgeRepair,
    Category::GarbageCollection,
    Category::Sewage,
    Category::PublicToilets,
    Category::WaterSupply,
    Category::WaterLeakage,
    Category::Drainage,
    Category::Parks,
    Category::PublicBuildings,
    Category::Playgrounds,
];

impl Category {
    /// Wire/display name as stored in the `issues.category` column.
    pub fn name(self) -> &'static str {
        match self {
            Category::StreetLight => "Street Light",
            Category::PowerOutage => "Power Outage",
            Category::ElectricalWiring => "Electrical Wiring",
            Category::RoadDamage => "Road Damage",
            Category::Potholes => "Potholes",
            Category::BridgeRepair => "Bridge Repair",
            Category::GarbageCollection => "Garbage Collection",
            Category::Sewage => "Sewage",
            Category::PublicToilets => "Public Toilets",
            Category::WaterSupply => "Water Supply",
            Category::WaterLeakage => "Water Leakage",
            Category::Drainage => "Drainage",
            Category::Parks => "Parks",
            Category::PublicBuildings => "Public Buildings",
            Category::Playgrounds => "Playgrounds",
        }
    }

    /// The department responsible for issues of this category.
    pub fn department(self) -> Department {
        match self {
            Category::StreetLight | Category::PowerOutage | Category::ElectricalWiring => {
                Department::Electrical
            }
            Category::RoadDamage | Category::Potholes | Category::BridgeRepair => Department::Pwd,
            Category::GarbageCollection | Category::Sewage | Category::PublicToilets => {
                Department::Sanitation
            }
            Category::WaterSupply | Category::WaterLeakage | Category::Drainage => {
                Department::Water
            }
            Category::Parks | Category::PublicBuildings | Category::Playgrounds => {
                Department::Municipal
            }
        }
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.name() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid category '{}'. Must be one of: {:?}",
                    s,
                    ALL_CATEGORIES.iter().map(|c| c.name()).collect::<Vec<_>>()
                ))
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolve the owning department for a free-form category string.
///
/// Unknown categories (legacy data, renamed categories) fall back to
/// `Municipal` rather than failing; strict validation of new input happens
/// at the API boundary via `Category::from_str`.
pub fn department_for_category(category: &str) -> Department {
    category
        .parse::<Category>()
        .map(Category::department)
        .unwrap_or(Department::Municipal)
}
