use serde::{Deserialize, Serialize};

/// Running possession totals a patient already holds, in the units the MMCC
/// limits are expressed in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Possession {
    #[serde(default)]
    pub flower_grams: f64,
    #[serde(default)]
    pub concentrate_grams: f64,
    #[serde(default)]
    pub thc_mg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub mmcc_id: String,
    #[serde(default)]
    pub current_possession: Possession,
}
