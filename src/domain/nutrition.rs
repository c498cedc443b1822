use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-serving nutrition facts. Missing fields deserialize as zero so that
/// sparsely filled ingredient records still sum cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, ToSchema)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fats: f64,
}

impl Nutrition {
    pub fn new(calories: f64, protein: f64, carbs: f64, fats: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fats,
        }
    }

    pub fn add(self, other: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fats: self.fats + other.fats,
        }
    }

    pub fn sub(self, other: Nutrition) -> Nutrition {
        Nutrition {
            calories: self.calories - other.calories,
            protein: self.protein - other.protein,
            carbs: self.carbs - other.carbs,
            fats: self.fats - other.fats,
        }
    }

    /// Rounding policy for persisted totals: calories to the nearest
    /// integer, macros to one decimal.
    pub fn rounded(self) -> Nutrition {
        Nutrition {
            calories: self.calories.round(),
            protein: round1(self.protein),
            carbs: round1(self.carbs),
            fats: round1(self.fats),
        }
    }
}

/// Base item plus an optional single add-on. Identity when no add-on is
/// selected.
pub fn combine(base: Nutrition, addon: Option<Nutrition>) -> Nutrition {
    match addon {
        Some(extra) => base.add(extra),
        None => base,
    }
}

/// Sum an iterator of nutrition facts.
pub fn sum<I: IntoIterator<Item = Nutrition>>(items: I) -> Nutrition {
    items
        .into_iter()
        .fold(Nutrition::default(), |acc, n| acc.add(n))
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_without_addon_is_identity() {
        let base = Nutrition::new(360.0, 6.6, 79.5, 0.6);
        assert_eq!(combine(base, None), base);
    }

    #[test]
    fn combine_adds_componentwise() {
        let base = Nutrition::new(300.0, 20.0, 30.0, 10.0);
        let addon = Nutrition::new(120.0, 2.5, 26.0, 0.3);
        let combined = combine(base, Some(addon));
        assert_eq!(combined, Nutrition::new(420.0, 22.5, 56.0, 10.3));
        // additive in both orders
        assert_eq!(combine(addon, Some(base)), combined);
    }

    #[test]
    fn rounding_policy() {
        let n = Nutrition::new(359.6, 6.64, 79.55, 0.349).rounded();
        assert_eq!(n.calories, 360.0);
        assert_eq!(n.protein, 6.6);
        assert_eq!(n.carbs, 79.6);
        assert_eq!(n.fats, 0.3);
    }

    #[test]
    fn sum_treats_empty_as_zero() {
        assert_eq!(sum([]), Nutrition::default());
        let total = sum([
            Nutrition::new(100.0, 1.0, 2.0, 3.0),
            Nutrition::new(50.0, 0.5, 1.0, 1.5),
        ]);
        assert_eq!(total, Nutrition::new(150.0, 1.5, 3.0, 4.5));
    }
}
