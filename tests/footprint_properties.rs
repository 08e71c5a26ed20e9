//! Properties of the weekly footprint estimate across the questionnaire domain

use gaia::error::GaiaError;
use gaia::footprint::{
    Category, Diet, Questionnaire, QuestionnaireForm, Recycling, ShoppingHabit, estimate,
};

fn grid() -> Vec<Questionnaire> {
    let mut out = Vec::new();
    for km in [0.0, 12.5, 100.0, 5000.0] {
        for kwh in [0.0, 333.3, 2000.0] {
            for diet in [Diet::Vegetarian, Diet::Mixed, Diet::NonVegetarian] {
                for flights in [0, 3, 100] {
                    for recycles in [Recycling::Yes, Recycling::No] {
                        for shopping in [
                            ShoppingHabit::Minimal,
                            ShoppingHabit::Average,
                            ShoppingHabit::Frequent,
                        ] {
                            out.push(Questionnaire {
                                km_per_week: km,
                                electricity_kwh_per_month: kwh,
                                diet,
                                flights_per_year: flights,
                                recycles,
                                water_liters_per_day: kwh / 2.0,
                                shopping_habit: shopping,
                                digital_hours_per_day: (km / 250.0).min(24.0),
                            });
                        }
                    }
                }
            }
        }
    }
    out
}

#[test]
fn test_total_is_exact_sum_of_categories() {
    for q in grid() {
        let b = estimate(&q).unwrap();
        let sum: f64 = b.entries().map(|(_, v)| v).sum();
        assert_eq!(b.total(), sum, "total drifted for {q:?}");
        assert!(b.entries().all(|(_, v)| v >= 0.0));
    }
}

#[test]
fn test_estimate_is_deterministic() {
    for q in grid().into_iter().step_by(7) {
        let first = estimate(&q).unwrap();
        let second = estimate(&q).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_each_category_depends_on_its_own_answer_only() {
    let base = Questionnaire {
        km_per_week: 10.0,
        electricity_kwh_per_month: 100.0,
        diet: Diet::Mixed,
        flights_per_year: 2,
        recycles: Recycling::Yes,
        water_liters_per_day: 100.0,
        shopping_habit: ShoppingHabit::Average,
        digital_hours_per_day: 2.0,
    };
    let before = estimate(&base).unwrap();
    let after = estimate(&Questionnaire {
        km_per_week: 20.0,
        ..base
    })
    .unwrap();
    for category in Category::ALL {
        if category == Category::Transport {
            assert!((after.get(category) - 2.0 * before.get(category)).abs() < 1e-12);
        } else {
            assert_eq!(after.get(category), before.get(category));
        }
    }
}

#[test]
fn test_form_labels_map_to_closed_enums() {
    let form = QuestionnaireForm {
        km_per_week: 100.0,
        electricity_kwh_per_month: 200.0,
        diet: "Mixed".into(),
        flights_per_year: 12,
        recycles: "No".into(),
        water_liters_per_day: 150.0,
        shopping_habit: "Average".into(),
        digital_hours_per_day: 4.0,
    };
    let b = estimate(&Questionnaire::try_from(form.clone()).unwrap()).unwrap();
    assert!((b.total() - 238.867).abs() < 1e-3);

    let bad_shopping = QuestionnaireForm {
        shopping_habit: "Sometimes".into(),
        ..form.clone()
    };
    assert!(matches!(
        Questionnaire::try_from(bad_shopping),
        Err(GaiaError::InvalidCategory {
            kind: "shopping habit",
            ..
        })
    ));

    let too_much_water = QuestionnaireForm {
        water_liters_per_day: 1000.5,
        ..form
    };
    assert!(matches!(
        Questionnaire::try_from(too_much_water),
        Err(GaiaError::InvalidInput {
            field: "water_liters_per_day",
            ..
        })
    ));
}
