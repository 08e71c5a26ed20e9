//! Home page content: slogan of the day and footprint chart data.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::footprint::FootprintBreakdown;

pub const SLOGANS: [&str; 5] = [
    "Small Steps, Big Impact \u{1F331}",
    "Act Now, Save Tomorrow \u{1F30D}",
    "Be Cool, Go Green \u{1F49A}",
    "Climate Action Starts With You \u{1F525}\u{27A1}\u{FE0F}\u{2744}\u{FE0F}",
    "Sustainable Today, Livable Tomorrow \u{1F6E4}\u{FE0F}",
];

const DEFAULT_SLICES: [(&str, f64); 5] = [
    ("Transport", 2.5),
    ("Electricity", 1.8),
    ("Food", 1.2),
    ("Waste", 0.6),
    ("Others", 0.4),
];

pub fn slogan_for(date: NaiveDate) -> &'static str {
    SLOGANS[date.ordinal() as usize % SLOGANS.len()]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub slices: Vec<ChartSlice>,
    /// False while the chart shows placeholder numbers.
    pub personal: bool,
}

impl ChartData {
    pub fn from_breakdown(breakdown: &FootprintBreakdown) -> Self {
        Self {
            title: "Your Latest Weekly Carbon Footprint Distribution".to_string(),
            slices: breakdown
                .entries()
                .map(|(category, value)| ChartSlice {
                    category: category.label().to_string(),
                    value,
                })
                .collect(),
            personal: true,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            title: "Your Default Weekly Carbon Footprint Distribution".to_string(),
            slices: DEFAULT_SLICES
                .iter()
                .map(|(category, value)| ChartSlice {
                    category: category.to_string(),
                    value: *value,
                })
                .collect(),
            personal: false,
        }
    }

    /// The session's latest breakdown, or the placeholder chart before the first estimate.
    pub fn for_session(breakdown: Option<&FootprintBreakdown>) -> Self {
        breakdown.map_or_else(Self::placeholder, Self::from_breakdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::{Diet, Questionnaire, Recycling, ShoppingHabit, estimate};

    #[test]
    fn test_slogan_rotates_by_day_of_year() {
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let jan5 = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let jan6 = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        assert_eq!(slogan_for(jan1), SLOGANS[1]);
        assert_eq!(slogan_for(jan5), SLOGANS[0]);
        assert_eq!(slogan_for(jan6), slogan_for(jan1));
    }

    #[test]
    fn test_placeholder_until_estimated() {
        let chart = ChartData::for_session(None);
        assert!(!chart.personal);
        assert_eq!(chart.slices.len(), 5);
        assert_eq!(chart.slices[4].category, "Others");

        let breakdown = estimate(&Questionnaire {
            km_per_week: 10.0,
            electricity_kwh_per_month: 0.0,
            diet: Diet::Mixed,
            flights_per_year: 0,
            recycles: Recycling::Yes,
            water_liters_per_day: 0.0,
            shopping_habit: ShoppingHabit::Average,
            digital_hours_per_day: 1.0,
        })
        .unwrap();
        let chart = ChartData::for_session(Some(&breakdown));
        assert!(chart.personal);
        assert_eq!(chart.slices.len(), 8);
        assert_eq!(chart.slices[0].category, "Transport");
        let sum: f64 = chart.slices.iter().map(|s| s.value).sum();
        assert_eq!(sum, breakdown.total());
    }
}
