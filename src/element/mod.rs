//! Elements: behavioral archetypes governing how a walker moves through a graph.
//!
//! Six core elements carry fixed traits used by schedulers for routing and by
//! walkers for loop/convergence control. Iron is an evolved Earth derived from
//! calibration accuracy via [`iron_from_earth`].

pub mod cycle;
pub mod persona;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OrigamiError;

pub use cycle::{CycleRule, CycleType, challenged_by, challenges, destructive_cycle, generative_cycle, next_generative};
pub use persona::{Persona, all_personas, light_personas, persona_by_name, shadow_personas};

/// Behavioral archetype of a node, zone, or walker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Lightning,
    Earth,
    Diamond,
    Water,
    Air,
    /// Evolved Earth, never stored in the trait table
    Iron,
}

impl Element {
    /// Lowercase name as used in pipeline YAML
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Lightning => "lightning",
            Element::Earth => "earth",
            Element::Diamond => "diamond",
            Element::Water => "water",
            Element::Air => "air",
            Element::Iron => "iron",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Element {
    type Err = OrigamiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fire" => Ok(Element::Fire),
            "lightning" => Ok(Element::Lightning),
            "earth" => Ok(Element::Earth),
            "diamond" => Ok(Element::Diamond),
            "water" => Ok(Element::Water),
            "air" => Ok(Element::Air),
            "iron" => Ok(Element::Iron),
            _ => Err(OrigamiError::UnknownElement(s.to_string())),
        }
    }
}

/// Processing velocity of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedClass {
    Fastest,
    Fast,
    Steady,
    Precise,
    Deep,
    Holistic,
}

/// Quantified behavioral characteristics of an element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementTraits {
    pub element: Element,
    pub speed: SpeedClass,
    pub max_loops: u32,
    pub convergence_threshold: f64,
    /// 0.0-1.0
    pub shortcut_affinity: f64,
    pub evidence_depth: u32,
    pub failure_mode: &'static str,
}

const CORE_ELEMENTS: [Element; 6] = [
    Element::Fire,
    Element::Lightning,
    Element::Earth,
    Element::Diamond,
    Element::Water,
    Element::Air,
];

const TRAITS: [ElementTraits; 6] = [
    ElementTraits {
        element: Element::Fire,
        speed: SpeedClass::Fast,
        max_loops: 0,
        convergence_threshold: 0.50,
        shortcut_affinity: 0.9,
        evidence_depth: 2,
        failure_mode: "burns out (token waste)",
    },
    ElementTraits {
        element: Element::Lightning,
        speed: SpeedClass::Fastest,
        max_loops: 0,
        convergence_threshold: 0.40,
        shortcut_affinity: 1.0,
        evidence_depth: 1,
        failure_mode: "brittle (wrong path, no recovery)",
    },
    ElementTraits {
        element: Element::Earth,
        speed: SpeedClass::Steady,
        max_loops: 1,
        convergence_threshold: 0.70,
        shortcut_affinity: 0.1,
        evidence_depth: 5,
        failure_mode: "bloat (too many steps)",
    },
    ElementTraits {
        element: Element::Diamond,
        speed: SpeedClass::Precise,
        max_loops: 0,
        convergence_threshold: 0.95,
        shortcut_affinity: 0.5,
        evidence_depth: 10,
        failure_mode: "shatters (ambiguity kills it)",
    },
    ElementTraits {
        element: Element::Water,
        speed: SpeedClass::Deep,
        max_loops: 3,
        convergence_threshold: 0.85,
        shortcut_affinity: 0.1,
        evidence_depth: 8,
        failure_mode: "slow (analysis paralysis)",
    },
    ElementTraits {
        element: Element::Air,
        speed: SpeedClass::Holistic,
        max_loops: 1,
        convergence_threshold: 0.60,
        shortcut_affinity: 0.6,
        evidence_depth: 3,
        failure_mode: "floaty (vague, no evidence)",
    },
];

/// Canonical traits for a core element. Iron has no stored entry.
pub fn default_traits(element: Element) -> Option<ElementTraits> {
    TRAITS.iter().find(|t| t.element == element).cloned()
}

/// The six core elements, in table order. Iron is excluded.
pub fn all_elements() -> Vec<Element> {
    CORE_ELEMENTS.to_vec()
}

/// Derive Iron traits from Earth adjusted by historical accuracy (0.0-1.0).
///
/// `max_loops = max(0, earth - floor(accuracy * 2))`,
/// `convergence_threshold = earth + (1 - accuracy) * 0.1`.
pub fn iron_from_earth(accuracy: f64) -> ElementTraits {
    let earth = &TRAITS[2];
    let reduction = (accuracy * 2.0).floor().max(0.0) as u32;
    ElementTraits {
        element: Element::Iron,
        speed: earth.speed,
        max_loops: earth.max_loops.saturating_sub(reduction),
        convergence_threshold: earth.convergence_threshold + (1.0 - accuracy) * 0.1,
        shortcut_affinity: earth.shortcut_affinity,
        evidence_depth: earth.evidence_depth,
        failure_mode: "rigid (over-calibrated to past data)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_elements_excludes_iron() {
        let all = all_elements();
        assert_eq!(all.len(), 6);
        assert!(!all.contains(&Element::Iron));
        assert_eq!(all[0], Element::Fire);
        assert_eq!(all[5], Element::Air);
    }

    #[test]
    fn test_default_traits_table() {
        let water = default_traits(Element::Water).unwrap();
        assert_eq!(water.speed, SpeedClass::Deep);
        assert_eq!(water.max_loops, 3);
        assert_eq!(water.evidence_depth, 8);
        assert_eq!(water.failure_mode, "slow (analysis paralysis)");

        let lightning = default_traits(Element::Lightning).unwrap();
        assert_eq!(lightning.shortcut_affinity, 1.0);
        assert_eq!(lightning.convergence_threshold, 0.40);

        for element in all_elements() {
            assert_eq!(default_traits(element).unwrap().element, element);
        }
    }

    #[test]
    fn test_default_traits_iron_absent() {
        assert!(default_traits(Element::Iron).is_none());
    }

    #[test]
    fn test_iron_from_perfect_accuracy() {
        let iron = iron_from_earth(1.0);
        assert_eq!(iron.element, Element::Iron);
        assert_eq!(iron.max_loops, 0);
        assert!((iron.convergence_threshold - 0.70).abs() < 1e-9);
        assert_eq!(iron.speed, SpeedClass::Steady);
        assert_eq!(iron.evidence_depth, 5);
    }

    #[test]
    fn test_iron_from_low_accuracy() {
        let iron = iron_from_earth(0.4);
        assert_eq!(iron.max_loops, 1);
        assert!((iron.convergence_threshold - 0.76).abs() < 1e-9);
    }

    #[test]
    fn test_element_from_str() {
        assert_eq!("fire".parse::<Element>().unwrap(), Element::Fire);
        assert_eq!("Water".parse::<Element>().unwrap(), Element::Water);
        assert_eq!("iron".parse::<Element>().unwrap(), Element::Iron);
        let err = "plasma".parse::<Element>().unwrap_err();
        assert!(matches!(err, OrigamiError::UnknownElement(ref s) if s == "plasma"));
    }

    #[test]
    fn test_element_serialization() {
        assert_eq!(serde_json::to_string(&Element::Lightning).unwrap(), "\"lightning\"");
        let parsed: Element = serde_json::from_str("\"diamond\"").unwrap();
        assert_eq!(parsed, Element::Diamond);
        assert_eq!(Element::Air.to_string(), "air");
    }
}
