/// Entities whose domains are indexed by [`super::EntityDirectory`]
///
/// Each name has a `thirdParties.<name>.blocked` feature in the predictor
/// vocabulary; adding an entity here requires a coefficient for it.
pub const RELEVANT_ENTITIES: [&str; 16] = [
    "Google Analytics",
    "Google/Doubleclick Ads",
    "Google Tag Manager",
    "Facebook",
    "Twitter",
    "Amazon Ads",
    "Criteo",
    "AppNexus",
    "Rubicon Project",
    "PubMatic",
    "Taboola",
    "Outbrain",
    "Hotjar",
    "Yandex Metrica",
    "Scorecard Research",
    "Quantcast",
];

/// Whether `name` is on the relevant entity allow-list
pub fn is_relevant_entity(name: &str) -> bool {
    RELEVANT_ENTITIES.contains(&name)
}
