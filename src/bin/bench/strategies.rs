// Player Strategies - fixed fare policies replayed over many seeded terms
// Each strategy picks a fare from the year's scenario and the last committed fare

use fare_engine::{EngineConfig, IdealAction, Scenario};

// ─── Strategy Configuration ─────────────────────────────────────────────────

pub struct Strategy {
    pub name: &'static str,
    pub label: &'static str,
    pub category: &'static str,
    /// `(scenario, previous committed fare, config) -> fare to commit`
    pub choose: fn(&Scenario, f64, &EngineConfig) -> f64,
}

// ─── Fare Rules ─────────────────────────────────────────────────────────────

fn hold(_: &Scenario, previous: f64, _: &EngineConfig) -> f64 {
    previous
}

fn follow_ideal(scenario: &Scenario, previous: f64, _: &EngineConfig) -> f64 {
    match scenario.ideal_action {
        IdealAction::Decrease => previous - 0.20,
        IdealAction::Maintain => previous,
        IdealAction::SlightIncrease => previous + 0.10,
    }
}

fn contrarian(scenario: &Scenario, previous: f64, _: &EngineConfig) -> f64 {
    match scenario.ideal_action {
        IdealAction::Decrease => previous + 0.30,
        IdealAction::Maintain => previous - 0.20,
        IdealAction::SlightIncrease => previous - 0.20,
    }
}

fn always_raise(_: &Scenario, previous: f64, _: &EngineConfig) -> f64 {
    previous + 0.30
}

fn free_fare(_: &Scenario, _: f64, _: &EngineConfig) -> f64 {
    0.0
}

fn max_fare(_: &Scenario, _: f64, config: &EngineConfig) -> f64 {
    config.max_fare
}

// ─── Strategy Table ─────────────────────────────────────────────────────────

pub fn strategies() -> Vec<Strategy> {
    vec![
        Strategy {
            name: "HOLD",
            label: "Hold the initial fare",
            category: "baseline",
            choose: hold,
        },
        Strategy {
            name: "FOLLOW_IDEAL",
            label: "Follow each year's ideal action",
            category: "strategic",
            choose: follow_ideal,
        },
        Strategy {
            name: "CONTRARIAN",
            label: "Move against the ideal action",
            category: "strategic",
            choose: contrarian,
        },
        Strategy {
            name: "ALWAYS_RAISE",
            label: "Raise 30 cents every year",
            category: "revenue",
            choose: always_raise,
        },
        Strategy {
            name: "FREE_FARE",
            label: "Free travel every year",
            category: "extreme",
            choose: free_fare,
        },
        Strategy {
            name: "MAX_FARE",
            label: "Charge the maximum fare",
            category: "extreme",
            choose: max_fare,
        },
    ]
}
