//! Weekly carbon footprint estimation.
//!
//! Every category is a linear, memoryless term of one questionnaire answer. The
//! breakdown keeps the categories in a fixed order so charts render a stable
//! legend, and `total` is always the plain sum of the category values.

use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{GaiaError, Result};

// Emission factors, kg CO2e
const TRANSPORT_PER_KM: f64 = 0.21;
const ELECTRICITY_PER_KWH: f64 = 0.9;
const WEEKS_PER_MONTH: f64 = 4.0;
const KG_PER_FLIGHT: f64 = 250.0;
const WEEKS_PER_YEAR: f64 = 52.0;
const WASTE_RECYCLING: f64 = 5.0;
const WASTE_NOT_RECYCLING: f64 = 15.0;
const WATER_PER_LITER: f64 = 0.0015;
const DIGITAL_PER_HOUR: f64 = 1.2;
const DAYS_PER_WEEK: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diet {
    Vegetarian,
    Mixed,
    NonVegetarian,
}

impl Diet {
    pub fn label(self) -> &'static str {
        match self {
            Diet::Vegetarian => "Vegetarian",
            Diet::Mixed => "Mixed",
            Diet::NonVegetarian => "Non-Vegetarian",
        }
    }

    fn weekly_kg(self) -> f64 {
        match self {
            Diet::Vegetarian => 35.0,
            Diet::Mixed => 50.0,
            Diet::NonVegetarian => 65.0,
        }
    }
}

impl FromStr for Diet {
    type Err = GaiaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vegetarian" => Ok(Diet::Vegetarian),
            "mixed" => Ok(Diet::Mixed),
            "non-vegetarian" => Ok(Diet::NonVegetarian),
            _ => Err(GaiaError::InvalidCategory {
                kind: "diet",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recycling {
    Yes,
    No,
}

impl FromStr for Recycling {
    type Err = GaiaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Recycling::Yes),
            "no" => Ok(Recycling::No),
            _ => Err(GaiaError::InvalidCategory {
                kind: "recycling answer",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShoppingHabit {
    Minimal,
    Average,
    Frequent,
}

impl ShoppingHabit {
    pub fn label(self) -> &'static str {
        match self {
            ShoppingHabit::Minimal => "Minimal",
            ShoppingHabit::Average => "Average",
            ShoppingHabit::Frequent => "Frequent",
        }
    }

    fn weekly_kg(self) -> f64 {
        match self {
            ShoppingHabit::Minimal => 5.0,
            ShoppingHabit::Average => 15.0,
            ShoppingHabit::Frequent => 30.0,
        }
    }
}

impl FromStr for ShoppingHabit {
    type Err = GaiaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(ShoppingHabit::Minimal),
            "average" => Ok(ShoppingHabit::Average),
            "frequent" => Ok(ShoppingHabit::Frequent),
            _ => Err(GaiaError::InvalidCategory {
                kind: "shopping habit",
                value: s.to_string(),
            }),
        }
    }
}

/// Footprint categories in chart order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Transport,
    Electricity,
    Food,
    Flights,
    Waste,
    Water,
    Shopping,
    Digital,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Transport,
        Category::Electricity,
        Category::Food,
        Category::Flights,
        Category::Waste,
        Category::Water,
        Category::Shopping,
        Category::Digital,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Transport => "Transport",
            Category::Electricity => "Electricity",
            Category::Food => "Food",
            Category::Flights => "Flights",
            Category::Waste => "Waste",
            Category::Water => "Water",
            Category::Shopping => "Shopping",
            Category::Digital => "Digital",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Questionnaire answers as submitted by a form, with enum fields still as labels.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionnaireForm {
    pub km_per_week: f64,
    pub electricity_kwh_per_month: f64,
    pub diet: String,
    pub flights_per_year: u32,
    pub recycles: String,
    pub water_liters_per_day: f64,
    pub shopping_habit: String,
    pub digital_hours_per_day: f64,
}

/// One validated set of lifestyle answers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Questionnaire {
    pub km_per_week: f64,
    pub electricity_kwh_per_month: f64,
    pub diet: Diet,
    pub flights_per_year: u32,
    pub recycles: Recycling,
    pub water_liters_per_day: f64,
    pub shopping_habit: ShoppingHabit,
    pub digital_hours_per_day: f64,
}

impl TryFrom<QuestionnaireForm> for Questionnaire {
    type Error = GaiaError;

    fn try_from(form: QuestionnaireForm) -> Result<Self> {
        let questionnaire = Questionnaire {
            km_per_week: form.km_per_week,
            electricity_kwh_per_month: form.electricity_kwh_per_month,
            diet: form.diet.parse()?,
            flights_per_year: form.flights_per_year,
            recycles: form.recycles.parse()?,
            water_liters_per_day: form.water_liters_per_day,
            shopping_habit: form.shopping_habit.parse()?,
            digital_hours_per_day: form.digital_hours_per_day,
        };
        questionnaire.validate()?;
        Ok(questionnaire)
    }
}

fn check_range(field: &'static str, value: f64, max: f64, domain: &'static str) -> Result<()> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(GaiaError::InvalidInput {
            field,
            value: value.to_string(),
            domain,
        })
    }
}

impl Questionnaire {
    /// Reject answers outside the questionnaire's domains. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        check_range("km_per_week", self.km_per_week, 5000.0, "0..=5000")?;
        check_range(
            "electricity_kwh_per_month",
            self.electricity_kwh_per_month,
            2000.0,
            "0..=2000",
        )?;
        if self.flights_per_year > 100 {
            return Err(GaiaError::InvalidInput {
                field: "flights_per_year",
                value: self.flights_per_year.to_string(),
                domain: "0..=100",
            });
        }
        check_range(
            "water_liters_per_day",
            self.water_liters_per_day,
            1000.0,
            "0..=1000",
        )?;
        check_range(
            "digital_hours_per_day",
            self.digital_hours_per_day,
            24.0,
            "0..=24",
        )?;
        Ok(())
    }
}

/// Weekly kg CO2e per category plus their sum.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintBreakdown {
    values: [f64; 8],
    total: f64,
}

impl FootprintBreakdown {
    fn from_values(values: [f64; 8]) -> Self {
        let total = values.iter().sum();
        Self { values, total }
    }

    pub fn get(&self, category: Category) -> f64 {
        self.values[category.index()]
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    /// Categories and values in chart order.
    pub fn entries(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.iter().map(|c| (*c, self.values[c.index()]))
    }
}

impl Serialize for FootprintBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("breakdown", &BreakdownEntries(self))?;
        map.serialize_entry("total", &self.total)?;
        map.end()
    }
}

struct BreakdownEntries<'a>(&'a FootprintBreakdown);

impl Serialize for BreakdownEntries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (category, value) in self.0.entries() {
            map.serialize_entry(category.label(), &value)?;
        }
        map.end()
    }
}

/// Estimate the weekly footprint for one questionnaire.
pub fn estimate(input: &Questionnaire) -> Result<FootprintBreakdown> {
    input.validate()?;

    let waste = match input.recycles {
        Recycling::Yes => WASTE_RECYCLING,
        Recycling::No => WASTE_NOT_RECYCLING,
    };

    Ok(FootprintBreakdown::from_values([
        input.km_per_week * TRANSPORT_PER_KM,
        (input.electricity_kwh_per_month / WEEKS_PER_MONTH) * ELECTRICITY_PER_KWH,
        input.diet.weekly_kg(),
        (f64::from(input.flights_per_year) * KG_PER_FLIGHT) / WEEKS_PER_YEAR,
        waste,
        (input.water_liters_per_day * DAYS_PER_WEEK) * WATER_PER_LITER,
        input.shopping_habit.weekly_kg(),
        input.digital_hours_per_day * DAYS_PER_WEEK * DIGITAL_PER_HOUR,
    ]))
}
