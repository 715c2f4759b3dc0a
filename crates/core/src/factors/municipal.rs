use crate::domain::crop::CropId;

use super::NEUTRAL_FACTOR;

type CropFactors = &'static [(&'static str, f64)];

pub const MUNICIPAL_FACTORS: &[(&str, CropFactors)] = &[
    (
        "Facatativá",
        &[
            ("PAPA CRIOLLA", 1.1),
            ("PAPA PASTUSA", 1.05),
            ("ZANAHORIA", 0.95),
            ("CEBOLLA CABEZONA", 1.0),
            ("LECHUGA", 1.05),
            ("CILANTRO", 1.15),
        ],
    ),
    (
        "Madrid",
        &[
            ("PAPA CRIOLLA", 1.05),
            ("PAPA PASTUSA", 1.1),
            ("ZANAHORIA", 1.0),
            ("CEBOLLA CABEZONA", 1.05),
            ("LECHUGA", 1.1),
            ("CILANTRO", 1.0),
        ],
    ),
    (
        "Mosquera",
        &[
            ("PAPA CRIOLLA", 0.95),
            ("PAPA PASTUSA", 1.0),
            ("ZANAHORIA", 1.1),
            ("CEBOLLA CABEZONA", 1.1),
            ("LECHUGA", 0.95),
            ("CILANTRO", 1.05),
        ],
    ),
    (
        "El Rosal",
        &[
            ("PAPA CRIOLLA", 1.0),
            ("PAPA PASTUSA", 0.95),
            ("ZANAHORIA", 1.05),
            ("CEBOLLA CABEZONA", 0.95),
            ("LECHUGA", 1.0),
            ("CILANTRO", 1.1),
        ],
    ),
    (
        "Subachoque",
        &[
            ("PAPA CRIOLLA", 1.15),
            ("PAPA PASTUSA", 1.1),
            ("ZANAHORIA", 0.9),
            ("CEBOLLA CABEZONA", 0.9),
            ("LECHUGA", 0.95),
            ("CILANTRO", 1.05),
        ],
    ),
    (
        "Bojacá",
        &[
            ("PAPA CRIOLLA", 1.05),
            ("PAPA PASTUSA", 1.0),
            ("ZANAHORIA", 1.05),
            ("CEBOLLA CABEZONA", 1.0),
            ("LECHUGA", 1.05),
            ("CILANTRO", 0.95),
        ],
    ),
    (
        "Funza",
        &[
            ("PAPA CRIOLLA", 1.02),
            ("PAPA PASTUSA", 1.00),
            ("ZANAHORIA", 1.12),
            ("CEBOLLA CABEZONA", 1.08),
            ("CEBOLLA LARGA", 1.05),
            ("LECHUGA", 1.06),
            ("CILANTRO", 1.10),
            ("BRÓCOLI", 0.98),
            ("COLIFLOR", 0.95),
            ("APIO", 1.08),
            ("PEREJIL", 1.05),
            ("ACELGA", 1.03),
        ],
    ),
];

/// Location advantage of `municipality` for `crop`. Municipality names match
/// case-insensitively after trimming.
pub fn municipal_factor(municipality: &str, crop: &CropId) -> f64 {
    let wanted = municipality.trim().to_lowercase();
    MUNICIPAL_FACTORS
        .iter()
        .find(|(name, _)| name.to_lowercase() == wanted)
        .and_then(|(_, crops)| crops.iter().find(|(name, _)| *name == crop.as_str()))
        .map(|(_, factor)| *factor)
        .unwrap_or(NEUTRAL_FACTOR)
}
