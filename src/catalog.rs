// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Fare Regulator Simulation Suite - Scenario Catalog

//! The fixed ten-year scenario catalog and its lookups.

use serde::{Deserialize, Serialize};

use crate::types::{IdealAction, Scenario, Year};

// ---------------------------------------------------------------------------
// Standard catalog table
// ---------------------------------------------------------------------------

// (year, volatility, cost_modifier, ideal_action, description)
const STANDARD_SCENARIOS: [(Year, f64, f64, IdealAction, &str); 10] = [
    (2000, 0.05, 0.05, IdealAction::Maintain,
        "The new millennium begins with economic optimism. Commuters are hopeful."),
    (2001, 0.15, 0.10, IdealAction::Maintain,
        "A global tech bubble burst sends ripples through the economy. Caution is advised."),
    (2002, 0.08, 0.30, IdealAction::SlightIncrease,
        "The new Circle Line is under construction, increasing operational costs."),
    (2003, 0.40, 0.10, IdealAction::Decrease,
        "SARS outbreak impacts public transport usage significantly. Ridership is volatile."),
    (2004, 0.10, 0.10, IdealAction::SlightIncrease,
        "Economic recovery is underway. Demand for public transport is rising."),
    (2005, 0.12, 0.35, IdealAction::SlightIncrease,
        "Fuel prices surge globally. The cost of energy is at an all-time high."),
    (2006, 0.08, 0.10, IdealAction::Maintain,
        "A new government initiative promotes public transport. Commuter expectations are high."),
    (2007, 0.15, 0.10, IdealAction::Decrease,
        "Competition from budget ride-sharing services begins to emerge."),
    (2008, 0.30, 0.15, IdealAction::Decrease,
        "The Global Financial Crisis hits. Household budgets are tight."),
    (2009, 0.10, 0.30, IdealAction::SlightIncrease,
        "Infrastructure upgrades are needed. The network requires significant investment."),
];

// ---------------------------------------------------------------------------
// ScenarioCatalog
// ---------------------------------------------------------------------------

/// Ordered, read-only set of scenario years.
///
/// Serialized as a plain list so host configuration can replace it wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScenarioCatalog {
    /// The built-in 2000..=2009 catalog.
    pub fn standard() -> Self {
        let scenarios = STANDARD_SCENARIOS
            .iter()
            .map(|&(year, volatility, cost_modifier, ideal_action, description)| Scenario {
                year,
                description: description.to_string(),
                volatility,
                cost_modifier,
                ideal_action,
            })
            .collect();
        Self { scenarios }
    }

    /// Build a catalog from arbitrary scenarios, sorted by year.
    ///
    /// Duplicates are kept so that `EngineConfig::validate` can report them.
    pub fn from_scenarios(mut scenarios: Vec<Scenario>) -> Self {
        scenarios.sort_by_key(|s| s.year);
        Self { scenarios }
    }

    pub fn get(&self, year: Year) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.year == year)
    }

    pub fn contains(&self, year: Year) -> bool {
        self.get(year).is_some()
    }

    pub fn years(&self) -> Vec<Year> {
        self.scenarios.iter().map(|s| s.year).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
