//! Per-country emission factors.
//!
//! Coefficients are kg CO2e per unit of activity: per km travelled, per kWh
//! consumed, per meal, per kg of waste and per liter of water.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An emission category.
///
/// The declaration order is the canonical order used for iteration,
/// summation and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Daily commute distance.
    Transportation,
    /// Monthly electricity use.
    Electricity,
    /// Meals eaten per day.
    Diet,
    /// Weekly household waste.
    Waste,
    /// Daily water use.
    Water,
}

impl Category {
    /// All categories in canonical order.
    pub const ALL: [Category; 5] = [
        Self::Transportation,
        Self::Electricity,
        Self::Diet,
        Self::Waste,
        Self::Water,
    ];

    /// Multiplier that scales the raw per-period input to a yearly figure.
    ///
    /// These are fixed, not calendar-accurate: 365 days, 12 months, 52 weeks.
    #[must_use]
    pub fn annualization(self) -> f64 {
        match self {
            Self::Transportation | Self::Diet | Self::Water => DAYS_PER_YEAR,
            Self::Electricity => MONTHS_PER_YEAR,
            Self::Waste => WEEKS_PER_YEAR,
        }
    }

    /// Unit of the raw input this category consumes.
    #[must_use]
    pub fn input_unit(self) -> &'static str {
        match self {
            Self::Transportation => "km/day",
            Self::Electricity => "kWh/month",
            Self::Diet => "meals/day",
            Self::Waste => "kg/week",
            Self::Water => "liters/day",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transportation => write!(f, "Transportation"),
            Self::Electricity => write!(f, "Electricity"),
            Self::Diet => write!(f, "Diet"),
            Self::Waste => write!(f, "Waste"),
            Self::Water => write!(f, "Water"),
        }
    }
}

/// Days per year used for daily inputs.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Months per year used for monthly inputs.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Weeks per year used for weekly inputs.
pub const WEEKS_PER_YEAR: f64 = 52.0;

/// The five coefficients for one country.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountryFactors {
    /// kg CO2e per km.
    pub transportation: f64,
    /// kg CO2e per kWh.
    pub electricity: f64,
    /// kg CO2e per meal.
    pub diet: f64,
    /// kg CO2e per kg of waste.
    pub waste: f64,
    /// kg CO2e per liter of water.
    pub water: f64,
}

impl CountryFactors {
    /// Create a coefficient set.
    #[must_use]
    pub const fn new(transportation: f64, electricity: f64, diet: f64, waste: f64, water: f64) -> Self {
        Self {
            transportation,
            electricity,
            diet,
            waste,
            water,
        }
    }

    /// Coefficient for the given category.
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

    fn validate(&self, country: &str) -> Result<()> {
        for category in Category::ALL {
            let value = self.get(category);
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_input(
                    "emission_factor",
                    format!("{country}/{category} coefficient must be a non-negative number, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

const BUILTIN_FACTORS: &[(&str, CountryFactors)] = &[
    ("India", CountryFactors::new(0.14, 0.82, 1.25, 0.1, 0.02)),
    ("United States", CountryFactors::new(0.41, 0.45, 1.77, 0.18, 0.03)),
    ("China", CountryFactors::new(0.12, 0.57, 1.02, 0.13, 0.01)),
    ("Germany", CountryFactors::new(0.25, 0.42, 1.5, 0.15, 0.02)),
    ("France", CountryFactors::new(0.2, 0.08, 1.3, 0.12, 0.02)),
    ("Brazil", CountryFactors::new(0.18, 0.1, 1.6, 0.14, 0.02)),
    ("United Kingdom", CountryFactors::new(0.23, 0.3, 1.4, 0.1, 0.02)),
    ("Canada", CountryFactors::new(0.45, 0.2, 1.8, 0.17, 0.03)),
    ("Australia", CountryFactors::new(0.5, 0.55, 1.75, 0.15, 0.03)),
    ("Russia", CountryFactors::new(0.3, 0.6, 1.1, 0.13, 0.02)),
    ("Japan", CountryFactors::new(0.25, 0.5, 1.2, 0.1, 0.02)),
    ("South Korea", CountryFactors::new(0.27, 0.65, 1.3, 0.12, 0.02)),
    ("South Africa", CountryFactors::new(0.3, 0.85, 1.4, 0.14, 0.02)),
    ("Mexico", CountryFactors::new(0.22, 0.35, 1.5, 0.13, 0.02)),
    ("Italy", CountryFactors::new(0.19, 0.25, 1.35, 0.12, 0.02)),
    ("Spain", CountryFactors::new(0.2, 0.3, 1.4, 0.13, 0.02)),
    ("Argentina", CountryFactors::new(0.21, 0.4, 1.6, 0.12, 0.02)),
    ("Turkey", CountryFactors::new(0.23, 0.45, 1.3, 0.14, 0.02)),
    ("Indonesia", CountryFactors::new(0.2, 0.7, 1.3, 0.12, 0.02)),
];

/// Immutable mapping from country name to its coefficients.
///
/// Countries keep their insertion order so front ends can offer them in a
/// stable list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionFactors {
    entries: Vec<(String, CountryFactors)>,
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EmissionFactors {
    /// The built-in table of 19 countries.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_FACTORS
                .iter()
                .map(|(name, factors)| ((*name).to_string(), *factors))
                .collect(),
        }
    }

    /// Build a table from custom entries.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty or duplicate country name, or a
    /// negative or non-finite coefficient.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, CountryFactors)>,
        S: Into<String>,
    {
        let mut table: Vec<(String, CountryFactors)> = Vec::new();
        for (name, factors) in entries {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(Error::invalid_input("country", "country name must not be empty"));
            }
            if table.iter().any(|(existing, _)| *existing == name) {
                return Err(Error::invalid_input(
                    "country",
                    format!("duplicate country: {name}"),
                ));
            }
            factors.validate(&name)?;
            table.push((name, factors));
        }
        Ok(Self { entries: table })
    }

    /// Look up the coefficients for a country.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCountry` if the country is not in the table.
    pub fn lookup(&self, country: &str) -> Result<&CountryFactors> {
        self.entries
            .iter()
            .find(|(name, _)| name == country)
            .map(|(_, factors)| factors)
            .ok_or_else(|| Error::unknown_country(country))
    }

    /// Check whether the table has an entry for the country.
    #[must_use]
    pub fn contains(&self, country: &str) -> bool {
        self.entries.iter().any(|(name, _)| name == country)
    }

    /// Country names in table order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CountryFactors)> {
        self.entries.iter().map(|(name, factors)| (name.as_str(), factors))
    }

    /// Number of countries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no countries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
