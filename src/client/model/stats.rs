use serde::Deserialize;

/// Body of `GET /api/restaurant/{id}/stats`. Every array may be empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub(crate) struct SalesStats {
    #[serde(default)]
    pub dishes_names: Vec<String>,
    #[serde(default)]
    pub dishes_values: Vec<f64>,
    #[serde(default)]
    pub levels_data: Vec<LevelShare>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct LevelShare {
    pub name: String,
    pub value: f64,
}
