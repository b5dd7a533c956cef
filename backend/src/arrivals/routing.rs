//! Class-based routing table
//!
//! Every passenger class walks a fixed, ordered list of zone names. Classes
//! differ only at the start of the route (dedicated check-in and security
//! for premium passengers) and converge on passport control, gate and
//! boarding.

use crate::models::passenger::PassengerClass;
use serde::{Deserialize, Serialize};

/// Ordered zone sequence per passenger class
///
/// # Example
/// ```
/// use airport_simulator_core_rs::arrivals::RoutingTable;
/// use airport_simulator_core_rs::models::PassengerClass;
///
/// let routes = RoutingTable::default();
/// assert_eq!(routes.route_for(PassengerClass::First)[0], "Check-In VIP");
/// assert_eq!(routes.route_for(PassengerClass::Economy).last().unwrap(), "Boarding");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingTable {
    pub economy: Vec<String>,
    pub business: Vec<String>,
    pub first: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self {
            economy: names(&["Check-In", "Security", "Passport Control", "Gate", "Boarding"]),
            business: names(&[
                "Check-In Business",
                "Security",
                "Passport Control",
                "Gate",
                "Boarding",
            ]),
            first: names(&[
                "Check-In VIP",
                "Security VIP",
                "Passport Control",
                "Gate",
                "Boarding",
            ]),
        }
    }
}

impl RoutingTable {
    /// Same route for every class
    pub fn uniform(route: &[&str]) -> Self {
        Self {
            economy: names(route),
            business: names(route),
            first: names(route),
        }
    }

    pub fn route_for(&self, class: PassengerClass) -> &[String] {
        match class {
            PassengerClass::Economy => &self.economy,
            PassengerClass::Business => &self.business,
            PassengerClass::First => &self.first,
        }
    }

    /// Every zone name referenced by any route, first occurrence order
    pub fn referenced_zones(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for class in PassengerClass::ALL {
            for name in self.route_for(class) {
                if !seen.contains(&name.as_str()) {
                    seen.push(name.as_str());
                }
            }
        }
        seen
    }
}
