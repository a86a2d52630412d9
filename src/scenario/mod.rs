pub mod builtin;
pub mod runner;
pub mod session;
pub mod state;

use crate::errors::{ProbeError, ProbeResult};
use crate::scenario::state::Scenario;

/// Built-in scenarios followed by configured ones, filtered by `names` when
/// any are given. Configured scenarios replace built-ins of the same name.
pub fn select_scenarios(configured: &[Scenario], names: &[String]) -> ProbeResult<Vec<Scenario>> {
    let mut available = builtin::all();
    for scenario in configured {
        match available.iter_mut().find(|s| s.name == scenario.name) {
            Some(existing) => *existing = scenario.clone(),
            None => available.push(scenario.clone()),
        }
    }

    if names.is_empty() {
        return Ok(available);
    }
    names
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|s| &s.name == name)
                .cloned()
                .ok_or_else(|| ProbeError::UnknownScenario(name.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(name: &str) -> Scenario {
        Scenario {
            name: name.to_string(),
            steps: Vec::new(),
            expected_trace: vec!["Test started!".to_string()],
        }
    }

    #[test]
    fn all_scenarios_when_no_names_given() {
        let selected = select_scenarios(&[custom("idle_start")], &[]).unwrap();
        let names: Vec<_> = selected.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["click_events", "key_events", "idle_start"]);
    }

    #[test]
    fn configured_scenario_overrides_builtin() {
        let selected = select_scenarios(&[custom("key_events")], &["key_events".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert!(selected[0].steps.is_empty());
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = select_scenarios(&[], &["nope".to_string()]).unwrap_err();
        assert!(matches!(err, ProbeError::UnknownScenario(name) if name == "nope"));
    }
}
