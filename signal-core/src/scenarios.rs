//! Built-in macro scenario catalog offered to callers

use crate::types::{Impact, MacroScenario, RiskBias};

/// Scenarios the caller can select and attach to a standard analysis request.
pub fn builtin_scenarios() -> Vec<MacroScenario> {
    vec![
        MacroScenario {
            id: "fed_cut".to_string(),
            label: "Fed rate cut expectations".to_string(),
            bias: RiskBias::RiskOn,
            impact: Impact::Positive,
        },
        MacroScenario {
            id: "etf_inflow".to_string(),
            label: "BTC ETF net inflows".to_string(),
            bias: RiskBias::RiskOn,
            impact: Impact::Positive,
        },
        MacroScenario {
            id: "high_cpi".to_string(),
            label: "CPI above expectations".to_string(),
            bias: RiskBias::RiskOff,
            impact: Impact::Negative,
        },
        MacroScenario {
            id: "geopolitical".to_string(),
            label: "Geopolitical risk".to_string(),
            bias: RiskBias::RiskOff,
            impact: Impact::Negative,
        },
        MacroScenario {
            id: "btc_halving".to_string(),
            label: "BTC halving cycle".to_string(),
            bias: RiskBias::RiskOn,
            impact: Impact::Positive,
        },
        MacroScenario {
            id: "regulation".to_string(),
            label: "Tightening regulation".to_string(),
            bias: RiskBias::RiskOff,
            impact: Impact::Negative,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_ids_are_unique() {
        let scenarios = builtin_scenarios();
        let mut ids: Vec<&str> = scenarios.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), scenarios.len());
    }
}
