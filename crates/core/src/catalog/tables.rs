use crate::domain::crop::{CostModel, CropProfile, Difficulty, PriceRange};

#[allow(clippy::too_many_arguments)]
const fn profile(
    name: &'static str,
    base_price: f64,
    market_price: f64,
    unit: &'static str,
    packaging: &'static str,
    min: i64,
    max: i64,
    volatility: f64,
) -> CropProfile {
    CropProfile {
        name,
        base_price,
        market_price,
        unit,
        packaging,
        price_range: PriceRange { min, max },
        volatility,
    }
}

/// Sabana Occidental crops quoted at Corabastos.
pub const CROP_PROFILES: &[CropProfile] = &[
    profile("PAPA CRIOLLA", 2_500.0, 2_800.0, "KILO", "BULTO 50KG", 2_200, 3_500, 0.15),
    profile("PAPA PASTUSA", 1_800.0, 1_900.0, "KILO", "BULTO 50KG", 1_500, 2_400, 0.12),
    profile("ZANAHORIA", 1_200.0, 1_400.0, "KILO", "BULTO 25KG", 1_000, 1_800, 0.18),
    profile("CEBOLLA CABEZONA", 2_200.0, 2_600.0, "KILO", "BULTO 25KG", 2_000, 3_200, 0.20),
    profile("CEBOLLA LARGA", 3_500.0, 4_200.0, "KILO", "ATADO", 3_500, 5_000, 0.16),
    profile("LECHUGA", 800.0, 900.0, "UNIDAD", "CANASTILLA", 700, 1_200, 0.22),
    profile("REPOLLO", 1_000.0, 1_100.0, "KILO", "BULTO 25KG", 800, 1_500, 0.19),
    profile("CILANTRO", 4_000.0, 4_800.0, "KILO", "ATADO", 4_000, 6_000, 0.25),
    profile("PEREJIL", 3_800.0, 4_200.0, "KILO", "ATADO", 3_500, 5_200, 0.23),
    profile("APIO", 2_800.0, 3_200.0, "KILO", "ATADO", 2_800, 4_000, 0.17),
    profile("ACELGA", 1_500.0, 1_800.0, "KILO", "ATADO", 1_400, 2_300, 0.21),
    profile("ESPINACA", 2_000.0, 2_400.0, "KILO", "ATADO", 2_000, 3_000, 0.20),
    profile("BRÓCOLI", 3_200.0, 3_600.0, "KILO", "CANASTILLA", 3_000, 4_500, 0.18),
    profile("COLIFLOR", 2_800.0, 3_200.0, "KILO", "CANASTILLA", 2_700, 4_000, 0.19),
    profile("REMOLACHA", 1_800.0, 2_000.0, "KILO", "BULTO 25KG", 1_600, 2_500, 0.16),
];

#[allow(clippy::too_many_arguments)]
const fn costs(
    seed: f64,
    fertilizer: f64,
    pesticide: f64,
    labor: f64,
    machinery: f64,
    other: f64,
    yield_kg_per_hectare: f64,
    cycle_months: f64,
    risk_factor: f64,
    difficulty: Difficulty,
    market_volatility: f64,
    base_profitability: f64,
) -> CostModel {
    CostModel {
        seed,
        fertilizer,
        pesticide,
        labor,
        machinery,
        other,
        yield_kg_per_hectare,
        cycle_months,
        risk_factor,
        difficulty,
        market_volatility,
        base_profitability,
    }
}

// Costs are COP per hectare.
pub const COST_MODELS: &[(&str, CostModel)] = &[
    (
        "PAPA CRIOLLA",
        costs(
            2_800_000.0, 2_200_000.0, 1_600_000.0, 4_200_000.0, 1_100_000.0, 800_000.0,
            16_000.0, 5.0, 0.80, Difficulty::Medium, 0.25, 45.0,
        ),
    ),
    (
        "PAPA PASTUSA",
        costs(
            2_400_000.0, 1_900_000.0, 1_400_000.0, 3_800_000.0, 1_000_000.0, 700_000.0,
            18_000.0, 4.0, 0.85, Difficulty::Low, 0.20, 55.0,
        ),
    ),
    (
        "ZANAHORIA",
        costs(
            1_200_000.0, 1_800_000.0, 1_300_000.0, 3_200_000.0, 800_000.0, 500_000.0,
            22_000.0, 4.0, 0.90, Difficulty::Low, 0.15, 65.0,
        ),
    ),
    (
        "CEBOLLA CABEZONA",
        costs(
            1_600_000.0, 2_200_000.0, 1_800_000.0, 3_600_000.0, 900_000.0, 600_000.0,
            20_000.0, 5.0, 0.70, Difficulty::High, 0.30, 35.0,
        ),
    ),
    (
        "CEBOLLA LARGA",
        costs(
            1_400_000.0, 2_000_000.0, 1_600_000.0, 4_200_000.0, 700_000.0, 500_000.0,
            12_000.0, 4.0, 0.60, Difficulty::VeryHigh, 0.40, 25.0,
        ),
    ),
    (
        "LECHUGA",
        costs(
            800_000.0, 1_200_000.0, 900_000.0, 2_400_000.0, 500_000.0, 300_000.0,
            10_000.0, 3.0, 0.95, Difficulty::VeryLow, 0.12, 75.0,
        ),
    ),
    (
        "CILANTRO",
        costs(
            1_000_000.0, 1_600_000.0, 1_200_000.0, 3_000_000.0, 600_000.0, 400_000.0,
            5_000.0, 2.0, 0.50, Difficulty::Extreme, 0.60, 15.0,
        ),
    ),
    (
        "BRÓCOLI",
        costs(
            2_000_000.0, 2_600_000.0, 2_000_000.0, 3_800_000.0, 1_000_000.0, 700_000.0,
            13_000.0, 4.0, 0.75, Difficulty::Medium, 0.22, 40.0,
        ),
    ),
];

pub const DEFAULT_COST_MODEL: CostModel = costs(
    1_600_000.0, 2_000_000.0, 1_500_000.0, 3_400_000.0, 800_000.0, 600_000.0,
    15_000.0, 4.0, 0.75, Difficulty::Medium, 0.25, 45.0,
);
