//! Delta bookkeeping for the daily nutrition log. The running totals on a
//! `daily_logs` row must always equal the sum of its meal entries; every
//! mutation computes the delta here and the service applies it to both rows
//! inside one transaction.

use uuid::Uuid;

use crate::domain::nutrition::Nutrition;

/// Delta to apply to the totals when an entry changes from `old` to `new`.
pub fn edit_delta(old: Nutrition, new: Nutrition) -> Nutrition {
    new.sub(old)
}

/// Totals after inserting an entry.
pub fn apply_insert(totals: Nutrition, entry: Nutrition) -> Nutrition {
    totals.add(entry)
}

/// Totals after editing an entry.
pub fn apply_edit(totals: Nutrition, old: Nutrition, new: Nutrition) -> Nutrition {
    totals.add(edit_delta(old, new))
}

/// Totals after removing an entry, floored at zero per field.
pub fn apply_removal(totals: Nutrition, entry: Nutrition) -> Nutrition {
    let n = totals.sub(entry);
    Nutrition {
        calories: n.calories.max(0.0),
        protein: n.protein.max(0.0),
        carbs: n.carbs.max(0.0),
        fats: n.fats.max(0.0),
    }
}

/// Back-references to items already logged for the day, used to derive
/// "consumed" status. Never stored on the source documents.
#[derive(Debug, Default, PartialEq)]
pub struct ConsumedRefs {
    pub plan_slots: Vec<String>,
    pub order_items: Vec<(Uuid, i32)>,
}

pub struct EntryRef<'a> {
    pub source: &'a str,
    pub meal_slot: Option<&'a str>,
    pub order_id: Option<Uuid>,
    pub order_item_index: Option<i32>,
}

pub fn consumed_refs<'a, I: IntoIterator<Item = EntryRef<'a>>>(entries: I) -> ConsumedRefs {
    let mut refs = ConsumedRefs::default();
    for entry in entries {
        match entry.source {
            "diet_plan" => {
                if let Some(slot) = entry.meal_slot {
                    refs.plan_slots.push(slot.to_string());
                }
            }
            "purchase" => {
                if let (Some(order_id), Some(index)) = (entry.order_id, entry.order_item_index) {
                    refs.order_items.push((order_id, index));
                }
            }
            _ => {}
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cal(calories: f64) -> Nutrition {
        Nutrition::new(calories, 0.0, 0.0, 0.0)
    }

    #[test]
    fn insert_edit_delete_sequence_keeps_totals_in_step() {
        // insert 300, insert 500 -> 800
        let mut totals = Nutrition::default();
        totals = apply_insert(totals, cal(300.0));
        totals = apply_insert(totals, cal(500.0));
        assert_eq!(totals.calories, 800.0);

        // edit first entry to 350 -> 850
        totals = apply_edit(totals, cal(300.0), cal(350.0));
        assert_eq!(totals.calories, 850.0);

        // delete second entry -> 350
        totals = apply_removal(totals, cal(500.0));
        assert_eq!(totals.calories, 350.0);
    }

    #[test]
    fn removal_floors_each_field_at_zero() {
        let totals = Nutrition::new(100.0, 5.0, 0.0, 2.0);
        let gone = apply_removal(totals, Nutrition::new(150.0, 3.0, 1.0, 2.0));
        assert_eq!(gone, Nutrition::new(0.0, 2.0, 0.0, 0.0));
    }

    #[test]
    fn edit_delta_is_per_field() {
        let delta = edit_delta(
            Nutrition::new(300.0, 10.0, 20.0, 5.0),
            Nutrition::new(350.0, 8.0, 20.0, 6.0),
        );
        assert_eq!(delta, Nutrition::new(50.0, -2.0, 0.0, 1.0));
    }

    #[test]
    fn consumed_refs_are_derived_from_tagged_entries() {
        let order = Uuid::new_v4();
        let entries = [
            EntryRef {
                source: "manual",
                meal_slot: None,
                order_id: None,
                order_item_index: None,
            },
            EntryRef {
                source: "diet_plan",
                meal_slot: Some("lunch"),
                order_id: None,
                order_item_index: None,
            },
            EntryRef {
                source: "purchase",
                meal_slot: None,
                order_id: Some(order),
                order_item_index: Some(0),
            },
        ];
        let refs = consumed_refs(entries);
        assert_eq!(refs.plan_slots, vec!["lunch".to_string()]);
        assert_eq!(refs.order_items, vec![(order, 0)]);
    }
}
