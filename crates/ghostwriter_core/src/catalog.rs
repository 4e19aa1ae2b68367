/// A generation model the service knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    pub id: &'static str,
    pub name: &'static str,
}

pub const MODEL_CATALOG: &[ModelSpec] = &[
    ModelSpec {
        id: "solar-pro3",
        name: "Solar Pro 3 (Powerful MoE 102B)",
    },
    ModelSpec {
        id: "solar-pro2",
        name: "Solar Pro 2 (Reasoning High)",
    },
    ModelSpec {
        id: "upstage/solar-1-mini-chat",
        name: "Solar Mini (Efficient KO/EN)",
    },
];

pub fn default_model() -> &'static ModelSpec {
    &MODEL_CATALOG[0]
}

pub fn find_model(id: &str) -> Option<&'static ModelSpec> {
    MODEL_CATALOG.iter().find(|model| model.id == id)
}

pub fn resolve_label(id: &str) -> Option<&'static str> {
    find_model(id).map(|model| model.name)
}

/// Display name without the parenthesised description, e.g. `Solar Pro 3`.
pub fn short_label(name: &str) -> &str {
    name.split('(').next().unwrap_or(name).trim()
}
