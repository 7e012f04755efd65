//! Property tests for the derived visible rows of a CRUD screen.

use formation_console::CrudController;
use formation_core::{compare, matches, FilterValue, SortDirection, Training, User};
use formation_test_utils::generators::{arb_role, arb_trainings, arb_users};
use formation_test_utils::MockEntityApi;
use proptest::prelude::*;
use std::cmp::Ordering;
use std::sync::Arc;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn loaded<E: formation_core::Entity>(rows: Vec<E>) -> CrudController<E, MockEntityApi<E>> {
    let api = Arc::new(MockEntityApi::with_records(rows));
    let mut controller = CrudController::new(api);
    runtime().block_on(controller.load()).unwrap();
    controller
}

fn id_number(user: &User) -> i64 {
    match user.id {
        formation_core::EntityId::Int(id) => id,
        formation_core::EntityId::Text(_) => 0,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_sorted_rows_are_ordered_and_stable(users in arb_users(25), flip in any::<bool>()) {
        let mut controller = loaded(users);
        if flip {
            controller.set_sort("login").unwrap();
        }
        let direction = controller.sort().direction;
        let rows = controller.visible_rows();
        for pair in rows.windows(2) {
            let ordering = compare(pair[0], pair[1], "login", direction);
            prop_assert_ne!(ordering, Ordering::Greater);
            if ordering == Ordering::Equal {
                prop_assert!(id_number(pair[0]) < id_number(pair[1]));
            }
        }
    }

    #[test]
    fn prop_descending_reverses_ascending_keys(trainings in arb_trainings(15)) {
        let mut controller = loaded(trainings);
        controller.set_sort("budget").unwrap();
        let ascending: Vec<Option<i64>> =
            controller.visible_rows().iter().map(|t| t.budget.or(Some(0))).collect();
        controller.set_sort("budget").unwrap();
        prop_assert_eq!(controller.sort().direction, SortDirection::Desc);
        let mut descending: Vec<Option<i64>> =
            controller.visible_rows().iter().map(|t| t.budget.or(Some(0))).collect();
        descending.reverse();
        prop_assert_eq!(ascending, descending);
    }

    #[test]
    fn prop_visible_rows_are_exactly_the_matching_rows(
        users in arb_users(25),
        role in arb_role(),
        query in "[a-zé]{0,2}",
    ) {
        let mut controller = loaded(users.clone());
        controller.set_filter("role", FilterValue::text(role.as_str())).unwrap();
        controller.set_search(query.clone());

        let visible = controller.visible_rows();
        let expected = users
            .iter()
            .filter(|u| matches(*u, controller.filters(), &query))
            .count();
        prop_assert_eq!(visible.len(), expected);
        for user in &visible {
            prop_assert_eq!(user.role, role);
            prop_assert!(user.login.to_lowercase().contains(&query)
                || user.role.as_str().contains(&query));
        }
    }

    #[test]
    fn prop_clearing_filters_restores_everything(trainings in arb_trainings(15), min in 0i64..50_000) {
        let mut controller: CrudController<Training, _> = loaded(trainings);
        controller.set_filter("budget", FilterValue::range(Some(min), None)).unwrap();
        controller.set_search("x");
        controller.clear_filters();
        prop_assert_eq!(controller.visible_count(), controller.total_count());
        controller.clear_filters();
        prop_assert_eq!(controller.visible_count(), controller.total_count());
    }
}
