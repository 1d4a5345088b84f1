//! Subsystem tables shipped with the crate.

pub const SYNERGY_STRATEGY_JSON: &str = include_str!("../../../strategies/synergy.json");
pub const RESOURCE_STRATEGY_JSON: &str = include_str!("../../../strategies/resource.json");
pub const SERVICE_STRATEGY_JSON: &str = include_str!("../../../strategies/service.json");

pub const BUILTIN_SUBSYSTEMS: [&str; 3] = ["synergy", "resource", "service"];

/// `(subsystem, json)` pairs for every built-in table.
pub fn builtin_payloads() -> [(&'static str, &'static str); 3] {
    [
        ("synergy", SYNERGY_STRATEGY_JSON),
        ("resource", RESOURCE_STRATEGY_JSON),
        ("service", SERVICE_STRATEGY_JSON),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payloads_are_present_and_named() {
        for ((name, json), expected) in builtin_payloads().into_iter().zip(BUILTIN_SUBSYSTEMS) {
            assert_eq!(name, expected);
            assert!(json.contains(&format!("\"name\": \"{name}\"")));
        }
    }
}
