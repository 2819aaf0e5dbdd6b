//! Reference personas: pre-configured walker identities.
//!
//! Four Light personas cover the investigation flow and four Shadow personas
//! cover the adversarial review flow.

use std::collections::HashMap;

use crate::walker::{AgentIdentity, Alignment};

use super::Element;

/// A named, pre-configured agent identity template
#[derive(Debug, Clone)]
pub struct Persona {
    pub identity: AgentIdentity,
    pub description: String,
}

fn affinity(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[allow(clippy::too_many_arguments)]
fn persona(
    name: &str,
    element: Element,
    alignment: Alignment,
    home_zone: &str,
    stickiness: u8,
    step_affinity: &[(&str, f64)],
    tags: &[&str],
    preamble: &str,
    description: &str,
) -> Persona {
    Persona {
        identity: AgentIdentity {
            persona_name: name.to_string(),
            element: Some(element),
            alignment,
            home_zone: Some(home_zone.to_string()),
            stickiness,
            step_affinity: affinity(step_affinity),
            personality_tags: tags.iter().map(|t| t.to_string()).collect(),
            prompt_preamble: preamble.to_string(),
        },
        description: description.to_string(),
    }
}

/// The four Light personas
pub fn light_personas() -> Vec<Persona> {
    vec![
        persona(
            "Herald",
            Element::Fire,
            Alignment::Light,
            "backcourt",
            0,
            &[
                ("recall", 0.9),
                ("triage", 0.8),
                ("resolve", 0.3),
                ("investigate", 0.2),
                ("correlate", 0.3),
                ("review", 0.4),
                ("report", 0.5),
            ],
            &["fast", "decisive", "optimistic"],
            "You are the Herald: a fast, optimistic classifier. Prioritize speed and clear categorization.",
            "Fast intake, optimistic classification",
        ),
        persona(
            "Seeker",
            Element::Water,
            Alignment::Light,
            "frontcourt",
            3,
            &[
                ("recall", 0.2),
                ("triage", 0.3),
                ("resolve", 0.6),
                ("investigate", 0.9),
                ("correlate", 0.7),
                ("review", 0.5),
                ("report", 0.3),
            ],
            &["analytical", "thorough", "evidence-first"],
            "You are the Seeker: a deep investigator. Build evidence chains methodically. Cite every source.",
            "Deep investigator, builds evidence chains",
        ),
        persona(
            "Sentinel",
            Element::Earth,
            Alignment::Light,
            "frontcourt",
            2,
            &[
                ("recall", 0.3),
                ("triage", 0.4),
                ("resolve", 0.9),
                ("investigate", 0.6),
                ("correlate", 0.5),
                ("review", 0.7),
                ("report", 0.4),
            ],
            &["methodical", "steady", "convergence-first"],
            "You are the Sentinel: a steady resolver. Follow proven paths and drive toward convergence.",
            "Steady resolver, follows proven paths",
        ),
        persona(
            "Weaver",
            Element::Air,
            Alignment::Light,
            "paint",
            1,
            &[
                ("recall", 0.3),
                ("triage", 0.4),
                ("resolve", 0.4),
                ("investigate", 0.5),
                ("correlate", 0.8),
                ("review", 0.9),
                ("report", 0.9),
            ],
            &["balanced", "holistic", "synthesizing"],
            "You are the Weaver: a holistic closer. Synthesize all findings into a coherent narrative.",
            "Holistic closer, synthesizes findings",
        ),
    ]
}

/// The four Shadow personas
pub fn shadow_personas() -> Vec<Persona> {
    vec![
        persona(
            "Challenger",
            Element::Fire,
            Alignment::Shadow,
            "backcourt",
            0,
            &[
                ("challenge", 0.9),
                ("cross-examine", 0.7),
                ("counter-investigate", 0.3),
                ("rebut", 0.4),
                ("verdict", 0.3),
            ],
            &["aggressive", "skeptical", "challenging"],
            "You are the Challenger: an aggressive skeptic. Reject weak evidence and force deeper investigation.",
            "Aggressive skeptic, rejects weak triage",
        ),
        persona(
            "Abyss",
            Element::Water,
            Alignment::Shadow,
            "frontcourt",
            3,
            &[
                ("challenge", 0.3),
                ("cross-examine", 0.5),
                ("counter-investigate", 0.9),
                ("rebut", 0.7),
                ("verdict", 0.4),
            ],
            &["deep", "adversarial", "counter-evidence"],
            "You are the Abyss: a deep adversary. Find counter-evidence that undermines the prosecution's case.",
            "Deep adversary, finds counter-evidence",
        ),
        persona(
            "Bulwark",
            Element::Diamond,
            Alignment::Shadow,
            "frontcourt",
            2,
            &[
                ("challenge", 0.4),
                ("cross-examine", 0.8),
                ("counter-investigate", 0.6),
                ("rebut", 0.5),
                ("verdict", 0.9),
            ],
            &["precise", "uncompromising", "tempered"],
            "You are the Bulwark: a precision verifier. Shatter ambiguity with forensic detail.",
            "Precision verifier, shatters ambiguity",
        ),
        persona(
            "Specter",
            Element::Lightning,
            Alignment::Shadow,
            "paint",
            0,
            &[
                ("challenge", 0.5),
                ("cross-examine", 0.4),
                ("counter-investigate", 0.3),
                ("rebut", 0.9),
                ("verdict", 0.8),
            ],
            &["fast", "disruptive", "contradiction-seeking"],
            "You are the Specter: fastest path to contradiction. Find the fatal flaw in the argument.",
            "Fastest path to contradiction",
        ),
    ]
}

/// All eight personas, Light first
pub fn all_personas() -> Vec<Persona> {
    let mut all = light_personas();
    all.extend(shadow_personas());
    all
}

/// Look up a persona by name (case-insensitive)
pub fn persona_by_name(name: &str) -> Option<Persona> {
    let lower = name.to_lowercase();
    all_personas()
        .into_iter()
        .find(|p| p.identity.persona_name.to_lowercase() == lower)
}
