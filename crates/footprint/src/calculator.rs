//! Annual footprint computation.
//!
//! Each raw input is annualized with a fixed multiplier, multiplied by the
//! country's coefficient and converted from kg to tonnes. The total is the
//! sum of the five category values.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::factors::{Category, EmissionFactors};

/// Kilograms per metric tonne.
pub const KG_PER_TONNE: f64 = 1000.0;

/// Raw per-period inputs for one questionnaire submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Key into the emission factor table.
    pub country: String,
    /// Daily commute distance in km.
    pub daily_distance_km: f64,
    /// Monthly electricity use in kWh.
    pub monthly_electricity_kwh: f64,
    /// Weekly waste in kg.
    pub weekly_waste_kg: f64,
    /// Meals eaten per day.
    pub meals_per_day: u32,
    /// Daily water use in liters.
    pub daily_water_liters: f64,
}

impl CalculationInput {
    /// Create an input value. Ranges are checked by [`CalculationInput::validate`].
    #[must_use]
    pub fn new(
        country: impl Into<String>,
        daily_distance_km: f64,
        monthly_electricity_kwh: f64,
        weekly_waste_kg: f64,
        meals_per_day: u32,
        daily_water_liters: f64,
    ) -> Self {
        Self {
            country: country.into(),
            daily_distance_km,
            monthly_electricity_kwh,
            weekly_waste_kg,
            meals_per_day,
            daily_water_liters,
        }
    }

    /// Check that every numeric input is in range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a quantity is negative or not finite, or if
    /// fewer than one meal per day is given.
    pub fn validate(&self) -> Result<()> {
        check_quantity("daily_distance_km", self.daily_distance_km)?;
        check_quantity("monthly_electricity_kwh", self.monthly_electricity_kwh)?;
        check_quantity("weekly_waste_kg", self.weekly_waste_kg)?;
        check_quantity("daily_water_liters", self.daily_water_liters)?;
        if self.meals_per_day < 1 {
            return Err(Error::invalid_input(
                "meals_per_day",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// The raw per-period input feeding the given category.
    #[must_use]
    pub fn raw(&self, category: Category) -> f64 {
        match category {
            Category::Transportation => self.daily_distance_km,
            Category::Electricity => self.monthly_electricity_kwh,
            Category::Diet => f64::from(self.meals_per_day),
            Category::Waste => self.weekly_waste_kg,
            Category::Water => self.daily_water_liters,
        }
    }

    /// The yearly activity for the given category.
    #[must_use]
    pub fn annualized(&self, category: Category) -> f64 {
        self.raw(category) * category.annualization()
    }
}

fn check_quantity(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::invalid_input(field, format!("must be a finite number, got {value}")));
    }
    if value < 0.0 {
        return Err(Error::invalid_input(field, format!("must not be negative, got {value}")));
    }
    Ok(())
}

/// Annual emissions per category, in tonnes CO2e per year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// Transportation emissions.
    pub transportation: f64,
    /// Electricity emissions.
    pub electricity: f64,
    /// Diet emissions.
    pub diet: f64,
    /// Waste emissions.
    pub waste: f64,
    /// Water emissions.
    pub water: f64,
    /// Sum of the five categories.
    pub total: f64,
}

impl CalculationResult {
    /// Build a result from per-category values, computing the total.
    #[must_use]
    pub fn from_categories(transportation: f64, electricity: f64, diet: f64, waste: f64, water: f64) -> Self {
        Self {
            transportation,
            electricity,
            diet,
            waste,
            water,
            total: transportation + electricity + diet + waste + water,
        }
    }

    /// Emissions for one category.
    #[must_use]
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Transportation => self.transportation,
            Category::Electricity => self.electricity,
            Category::Diet => self.diet,
            Category::Waste => self.waste,
            Category::Water => self.water,
        }
    }

    /// Per-category emissions in canonical order.
    pub fn per_category(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Percentage of the total contributed by a category.
    ///
    /// Returns 0 when the total is zero.
    #[must_use]
    pub fn share(&self, category: Category) -> f64 {
        if self.total > 0.0 {
            self.get(category) / self.total * 100.0
        } else {
            0.0
        }
    }

    /// One-line human readable summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Your total footprint: {:.2} tonnes CO2 per year", self.total)
    }
}

/// Computes footprints against a fixed factor table.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    factors: EmissionFactors,
}

impl Calculator {
    /// Create a calculator over the given table.
    #[must_use]
    pub fn new(factors: EmissionFactors) -> Self {
        Self { factors }
    }

    /// The factor table in use.
    #[must_use]
    pub fn factors(&self) -> &EmissionFactors {
        &self.factors
    }

    /// Compute the annual footprint for an input.
    ///
    /// # Errors
    ///
    /// See [`compute`].
    pub fn compute(&self, input: &CalculationInput) -> Result<CalculationResult> {
        compute(&self.factors, input)
    }
}

/// Compute the annual footprint for an input.
///
/// # Errors
///
/// Returns `InvalidInput` for out-of-range inputs and `UnknownCountry` if the
/// country is not in `factors`. Inputs are validated first, so an invalid
/// input for an unknown country reports `InvalidInput`.
pub fn compute(factors: &EmissionFactors, input: &CalculationInput) -> Result<CalculationResult> {
    input.validate()?;
    let coefficients = factors.lookup(&input.country)?;

    let emission = |category: Category| {
        coefficients.get(category) * input.annualized(category) / KG_PER_TONNE
    };

    let result = CalculationResult::from_categories(
        emission(Category::Transportation),
        emission(Category::Electricity),
        emission(Category::Diet),
        emission(Category::Waste),
        emission(Category::Water),
    );

    trace!(country = %input.country, total = result.total, "computed footprint");
    Ok(result)
}
