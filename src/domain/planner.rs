use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::nutrition::{self, Nutrition};

/// Meal slots with their fixed time-of-day labels, in assignment order.
pub const MEAL_SLOTS: [(&str, &str); 3] = [
    ("breakfast", "07:00"),
    ("lunch", "12:30"),
    ("dinner", "19:00"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DietGoal {
    LoseWeight,
    GainMuscle,
    MaintainWeight,
    HealthyLifestyle,
}

impl DietGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietGoal::LoseWeight => "lose_weight",
            DietGoal::GainMuscle => "gain_muscle",
            DietGoal::MaintainWeight => "maintain_weight",
            DietGoal::HealthyLifestyle => "healthy_lifestyle",
        }
    }

    /// Goal predicate over a menu's aggregate nutrition.
    pub fn admits(&self, n: &Nutrition) -> bool {
        match self {
            DietGoal::LoseWeight => n.calories < 450.0,
            DietGoal::GainMuscle => n.protein > 25.0,
            DietGoal::MaintainWeight => (400.0..=600.0).contains(&n.calories),
            DietGoal::HealthyLifestyle => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanCandidate {
    pub menu_id: Uuid,
    pub name: String,
    pub nutrition: Nutrition,
}

#[derive(Debug, Clone)]
pub struct ChosenMeal {
    pub slot: &'static str,
    pub time: &'static str,
    pub menu: PlanCandidate,
}

#[derive(Debug)]
pub struct PlanSelection {
    pub meals: Vec<ChosenMeal>,
    pub totals: Nutrition,
    /// True when the goal filter left fewer than three menus and the full
    /// catalog was used instead.
    pub fell_back: bool,
}

#[derive(Debug, Error)]
#[error("menu catalog has fewer than three items")]
pub struct NotEnoughMenus;

/// Pick one menu per meal slot: filter by goal, shuffle uniformly, take the
/// first three. A thin filtered pool degrades to the full catalog; a catalog
/// with fewer than three menus overall refuses outright.
pub fn select_meals<R: Rng>(
    catalog: &[PlanCandidate],
    goal: DietGoal,
    rng: &mut R,
) -> Result<PlanSelection, NotEnoughMenus> {
    if catalog.len() < 3 {
        return Err(NotEnoughMenus);
    }

    let filtered: Vec<&PlanCandidate> = catalog.iter().filter(|c| goal.admits(&c.nutrition)).collect();

    let (mut pool, fell_back): (Vec<&PlanCandidate>, bool) = if filtered.len() < 3 {
        (catalog.iter().collect(), true)
    } else {
        (filtered, false)
    };

    pool.shuffle(rng);

    let meals: Vec<ChosenMeal> = MEAL_SLOTS
        .iter()
        .zip(pool.into_iter())
        .map(|(&(slot, time), candidate)| ChosenMeal {
            slot,
            time,
            menu: candidate.clone(),
        })
        .collect();

    let totals = nutrition::sum(meals.iter().map(|m| m.menu.nutrition));

    Ok(PlanSelection {
        meals,
        totals,
        fell_back,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn menu(name: &str, calories: f64, protein: f64) -> PlanCandidate {
        PlanCandidate {
            menu_id: Uuid::new_v4(),
            name: name.to_string(),
            nutrition: Nutrition::new(calories, protein, 0.0, 0.0),
        }
    }

    #[test]
    fn goal_predicates() {
        let light = Nutrition::new(420.0, 10.0, 0.0, 0.0);
        let heavy = Nutrition::new(700.0, 40.0, 0.0, 0.0);
        assert!(DietGoal::LoseWeight.admits(&light));
        assert!(!DietGoal::LoseWeight.admits(&heavy));
        assert!(DietGoal::GainMuscle.admits(&heavy));
        assert!(!DietGoal::GainMuscle.admits(&light));
        assert!(DietGoal::MaintainWeight.admits(&Nutrition::new(400.0, 0.0, 0.0, 0.0)));
        assert!(DietGoal::MaintainWeight.admits(&Nutrition::new(600.0, 0.0, 0.0, 0.0)));
        assert!(!DietGoal::MaintainWeight.admits(&Nutrition::new(601.0, 0.0, 0.0, 0.0)));
        assert!(DietGoal::HealthyLifestyle.admits(&heavy));
    }

    #[test]
    fn refuses_with_fewer_than_three_menus() {
        let catalog = vec![menu("a", 400.0, 20.0), menu("b", 500.0, 20.0)];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(select_meals(&catalog, DietGoal::HealthyLifestyle, &mut rng).is_err());
    }

    #[test]
    fn picks_three_distinct_menus() {
        let catalog = vec![
            menu("a", 300.0, 10.0),
            menu("b", 350.0, 12.0),
            menu("c", 400.0, 14.0),
            menu("d", 420.0, 16.0),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let plan = select_meals(&catalog, DietGoal::LoseWeight, &mut rng).unwrap();
        assert_eq!(plan.meals.len(), 3);
        assert!(!plan.fell_back);
        let ids: Vec<Uuid> = plan.meals.iter().map(|m| m.menu.menu_id).collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
        assert_eq!(plan.meals[0].slot, "breakfast");
        assert_eq!(plan.meals[1].slot, "lunch");
        assert_eq!(plan.meals[2].slot, "dinner");
    }

    #[test]
    fn falls_back_to_full_catalog_when_filter_is_thin() {
        let catalog = vec![
            menu("a", 300.0, 10.0),
            menu("b", 700.0, 12.0),
            menu("c", 800.0, 14.0),
            menu("d", 900.0, 16.0),
        ];
        let mut rng = StdRng::seed_from_u64(3);
        // only one menu is under 450 kcal, so the whole catalog is used
        let plan = select_meals(&catalog, DietGoal::LoseWeight, &mut rng).unwrap();
        assert!(plan.fell_back);
        assert_eq!(plan.meals.len(), 3);
    }

    #[test]
    fn totals_sum_the_three_slots() {
        let catalog = vec![
            menu("a", 100.0, 1.0),
            menu("b", 200.0, 2.0),
            menu("c", 300.0, 3.0),
        ];
        let mut rng = StdRng::seed_from_u64(11);
        let plan = select_meals(&catalog, DietGoal::HealthyLifestyle, &mut rng).unwrap();
        assert_eq!(plan.totals.calories, 600.0);
        assert_eq!(plan.totals.protein, 6.0);
    }
}
