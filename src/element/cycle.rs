//! Generative and destructive interaction cycles between elements.
//!
//! The generative cycle orders the four main elements (Fire, Earth, Water,
//! Air); Lightning and Diamond act as modifiers on any generative step. The
//! destructive cycle pairs each core element with the one it challenges.

use serde::Serialize;

use super::Element;

/// Interaction mode between two elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleType {
    Generative,
    Destructive,
}

/// Directed interaction between two elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleRule {
    pub cycle: CycleType,
    pub from: Element,
    pub to: Element,
    pub interaction: &'static str,
}

const fn rule(cycle: CycleType, from: Element, to: Element, interaction: &'static str) -> CycleRule {
    CycleRule {
        cycle,
        from,
        to,
        interaction,
    }
}

const GENERATIVE: [CycleRule; 6] = [
    rule(
        CycleType::Generative,
        Element::Fire,
        Element::Earth,
        "classification provides structure for steady investigation",
    ),
    rule(
        CycleType::Generative,
        Element::Earth,
        Element::Water,
        "stable selection enables deep investigation",
    ),
    rule(
        CycleType::Generative,
        Element::Water,
        Element::Air,
        "deep evidence enables holistic synthesis",
    ),
    rule(
        CycleType::Generative,
        Element::Air,
        Element::Fire,
        "synthesis reveals patterns for re-classification",
    ),
    rule(
        CycleType::Generative,
        Element::Lightning,
        Element::Lightning,
        "lightning shortcuts any generative step",
    ),
    rule(
        CycleType::Generative,
        Element::Diamond,
        Element::Diamond,
        "diamond validates any generative step",
    ),
];

const DESTRUCTIVE: [CycleRule; 6] = [
    rule(
        CycleType::Destructive,
        Element::Fire,
        Element::Water,
        "aggressive challenge forces deeper evidence",
    ),
    rule(
        CycleType::Destructive,
        Element::Water,
        Element::Earth,
        "depth destabilizes stable conclusions",
    ),
    rule(
        CycleType::Destructive,
        Element::Earth,
        Element::Fire,
        "methodical evidence extinguishes hasty challenges",
    ),
    rule(
        CycleType::Destructive,
        Element::Lightning,
        Element::Diamond,
        "speed exposes brittleness to ambiguity",
    ),
    rule(
        CycleType::Destructive,
        Element::Diamond,
        Element::Air,
        "precision grounds vague synthesis",
    ),
    rule(
        CycleType::Destructive,
        Element::Air,
        Element::Lightning,
        "breadth covers narrow shortcut mistakes",
    ),
];

/// Generative rules: four main transitions plus the Lightning and Diamond modifiers
pub fn generative_cycle() -> Vec<CycleRule> {
    GENERATIVE.to_vec()
}

/// Destructive rules: six adversarial pairings
pub fn destructive_cycle() -> Vec<CycleRule> {
    DESTRUCTIVE.to_vec()
}

/// Element that naturally follows `from` in the main generative cycle.
///
/// Lightning and Diamond are modifiers rather than members of the main
/// sequence, so they (and Iron) yield `None`.
pub fn next_generative(from: Element) -> Option<Element> {
    GENERATIVE
        .iter()
        .find(|r| r.from == from && r.to != from)
        .map(|r| r.to)
}

/// Element that `from` challenges in the destructive cycle
pub fn challenges(from: Element) -> Option<Element> {
    DESTRUCTIVE.iter().find(|r| r.from == from).map(|r| r.to)
}

/// Element that challenges `target` in the destructive cycle
pub fn challenged_by(target: Element) -> Option<Element> {
    DESTRUCTIVE.iter().find(|r| r.to == target).map(|r| r.from)
}
