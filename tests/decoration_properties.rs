//! Property tests for add-on ordering and input width preservation.

use fieldkit::{Decorations, RowItem};
use proptest::prelude::*;

fn weights() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-50i32..50, 0..24)
}

fn row_weights(decorations: &Decorations) -> (Vec<i32>, Vec<i32>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut before_input = true;
    for item in decorations.row() {
        match item {
            RowItem::Input => before_input = false,
            RowItem::AddOn(id) => {
                let weight = decorations.get(*id).map(|d| d.weight()).unwrap_or_default();
                if before_input {
                    left.push(weight);
                } else {
                    right.push(weight);
                }
            }
        }
    }
    (left, right)
}

proptest! {
    /// The row reads in non-decreasing weight order, split at the input by sign.
    #[test]
    fn prop_add_on_row_is_sorted(weights in weights()) {
        let mut decorations = Decorations::new(20);
        for weight in &weights {
            decorations.add_on(*weight, "x", None);
        }
        let (left, right) = row_weights(&decorations);

        prop_assert_eq!(left.len() + right.len(), weights.len());
        prop_assert!(left.iter().all(|weight| *weight < 0));
        prop_assert!(right.iter().all(|weight| *weight >= 0));
        prop_assert!(left.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!(right.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    /// Exactly the leftmost row item carries the first marker.
    #[test]
    fn prop_first_marker_is_leftmost(weights in weights()) {
        let mut decorations = Decorations::new(20);
        for weight in &weights {
            decorations.add_on(*weight, "x", None);
            prop_assert_eq!(Some(&decorations.first()), decorations.row().first());
        }
    }

    /// Adding and toggling decorations never resizes the input itself.
    #[test]
    fn prop_input_width_is_preserved(
        width in 5usize..40,
        add_ons in prop::collection::vec((-5i32..5, "[a-z]{1,6}"), 0..6),
        add_ins in prop::collection::vec((-3i32..4, "[a-z]{1,4}", any::<bool>()), 1..6),
        toggles in prop::collection::vec(any::<bool>(), 0..10),
    ) {
        let mut decorations = Decorations::new(width);
        for (weight, content) in &add_ons {
            decorations.add_on(*weight, content.as_str(), None);
            prop_assert_eq!(decorations.input_width(), width);
        }
        let mut ids = Vec::new();
        for (weight, content, fixed) in &add_ins {
            ids.push(decorations.add_in(content.as_str(), *weight, None, *fixed));
            prop_assert_eq!(decorations.input_width(), width);
        }
        for (step, visible) in toggles.iter().enumerate() {
            let id = ids[step % ids.len()];
            decorations.toggle_add_in(id, Some(*visible));
            prop_assert_eq!(decorations.input_width(), width);
        }
    }
}
