use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

use crate::request::format_timestamp;

/// Value used for an intensity figure the API did not report.
///
/// Future periods have a forecast but no actual, for instance.
pub const NOT_AVAILABLE: i32 = -1;

/// Coarse qualitative bucket summarising an intensity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum IntensityIndex {
    #[serde(rename = "very low")]
    VeryLow,
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "moderate")]
    Moderate,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "very high")]
    VeryHigh,
}

impl IntensityIndex {
    /// Wire spelling, e.g. `"very low"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityIndex::VeryLow => "very low",
            IntensityIndex::Low => "low",
            IntensityIndex::Moderate => "moderate",
            IntensityIndex::High => "high",
            IntensityIndex::VeryHigh => "very high",
        }
    }
}

impl fmt::Display for IntensityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Forecast and estimated actual carbon intensity for one half-hour period.
///
/// Figures are in gCO2/kWh. For periods in the future `actual` is
/// [`NOT_AVAILABLE`] and `index` is derived from the forecast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intensity {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub forecast: i32,
    pub actual: i32,
    pub index: IntensityIndex,
}

impl Intensity {
    /// Whether the API reported an actual figure for this period.
    pub fn has_actual(&self) -> bool {
        self.actual != NOT_AVAILABLE
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} {{forecast: {}, actual: {}, index: {}}}",
            format_timestamp(&self.from),
            format_timestamp(&self.to),
            self.forecast,
            self.actual,
            self.index
        )
    }
}

/// Intensity statistics (gCO2/kWh) aggregated over `from..to`.
///
/// Past periods are computed from actual data, future ones from forecasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub max: i32,
    pub average: i32,
    pub min: i32,
    pub index: IntensityIndex,
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} {{max: {}, average: {}, min: {}, index: {}}}",
            format_timestamp(&self.from),
            format_timestamp(&self.to),
            self.max,
            self.average,
            self.min,
            self.index
        )
    }
}

/// Generation fuel types with a published emission factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuelType {
    Biomass,
    Coal,
    DutchImports,
    FrenchImports,
    IrishImports,
    GasCombinedCycle,
    GasOpenCycle,
    Hydro,
    Nuclear,
    Oil,
    Other,
    PumpedStorage,
    Solar,
    Wind,
}

impl FuelType {
    pub const ALL: [FuelType; 14] = [
        FuelType::Biomass,
        FuelType::Coal,
        FuelType::DutchImports,
        FuelType::FrenchImports,
        FuelType::IrishImports,
        FuelType::GasCombinedCycle,
        FuelType::GasOpenCycle,
        FuelType::Hydro,
        FuelType::Nuclear,
        FuelType::Oil,
        FuelType::Other,
        FuelType::PumpedStorage,
        FuelType::Solar,
        FuelType::Wind,
    ];

    /// Key used for this fuel in the `/intensity/factors` payload.
    pub fn key(&self) -> &'static str {
        match self {
            FuelType::Biomass => "Biomass",
            FuelType::Coal => "Coal",
            FuelType::DutchImports => "Dutch Imports",
            FuelType::FrenchImports => "French Imports",
            FuelType::IrishImports => "Irish Imports",
            FuelType::GasCombinedCycle => "Gas (Combined Cycle)",
            FuelType::GasOpenCycle => "Gas (Open Cycle)",
            FuelType::Hydro => "Hydro",
            FuelType::Nuclear => "Nuclear",
            FuelType::Oil => "Oil",
            FuelType::Other => "Other",
            FuelType::PumpedStorage => "Pumped Storage",
            FuelType::Solar => "Solar",
            FuelType::Wind => "Wind",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

/// Emission factors (gCO2/kWh) used by the intensity estimation for each fuel type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityFactors {
    pub biomass: i32,
    pub coal: i32,
    pub dutch_imports: i32,
    pub french_imports: i32,
    pub irish_imports: i32,
    pub gas_combined_cycle: i32,
    pub gas_open_cycle: i32,
    pub hydro: i32,
    pub nuclear: i32,
    pub oil: i32,
    pub other: i32,
    pub pumped_storage: i32,
    pub solar: i32,
    pub wind: i32,
}

impl IntensityFactors {
    /// Emission factor for `fuel`.
    pub fn get(&self, fuel: FuelType) -> i32 {
        match fuel {
            FuelType::Biomass => self.biomass,
            FuelType::Coal => self.coal,
            FuelType::DutchImports => self.dutch_imports,
            FuelType::FrenchImports => self.french_imports,
            FuelType::IrishImports => self.irish_imports,
            FuelType::GasCombinedCycle => self.gas_combined_cycle,
            FuelType::GasOpenCycle => self.gas_open_cycle,
            FuelType::Hydro => self.hydro,
            FuelType::Nuclear => self.nuclear,
            FuelType::Oil => self.oil,
            FuelType::Other => self.other,
            FuelType::PumpedStorage => self.pumped_storage,
            FuelType::Solar => self.solar,
            FuelType::Wind => self.wind,
        }
    }

    /// Every fuel with its factor, in [`FuelType::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (FuelType, i32)> + '_ {
        FuelType::ALL.iter().map(move |fuel| (*fuel, self.get(*fuel)))
    }
}
