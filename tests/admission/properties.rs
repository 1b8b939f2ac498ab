use bouncer::{
    admission::{AdmissionController, AdmissionState, ScoringPolicy, StrategyConfig, WindowUnit},
    population::PopulationModel,
    types::{Candidate, ConstraintSet},
};
use proptest::prelude::*;

use crate::{constraints, marginals_model, state};

const ATTRIBUTES: [&str; 3] = ["a", "b", "c"];

#[derive(Debug, Clone)]
struct Fixture {
    capacity: u32,
    admitted: u32,
    rejected: u32,
    counts: [u32; 3],
    mins: [u32; 3],
    presence: [bool; 3],
}

impl Fixture {
    fn state(&self) -> AdmissionState {
        let counts: Vec<(&str, u32)> = ATTRIBUTES.iter().copied().zip(self.counts).collect();
        state(self.capacity, self.admitted, self.rejected, &counts)
    }

    fn constraints(&self, model: &PopulationModel) -> ConstraintSet {
        let mins: Vec<(&str, u32)> = ATTRIBUTES.iter().copied().zip(self.mins).collect();
        constraints(model, &mins)
    }
}

fn model() -> PopulationModel {
    marginals_model(&[("a", 0.3), ("b", 0.2), ("c", 0.1)])
}

fn candidate_from(index: u64, presence: [bool; 3]) -> Candidate {
    Candidate::new(
        index,
        ATTRIBUTES
            .iter()
            .zip(presence)
            .map(|(name, present)| (name.to_string(), present))
            .collect(),
    )
}

fn arb_strategy() -> impl Strategy<Value = StrategyConfig> {
    prop_oneof![
        Just(StrategyConfig::ScarcityScore),
        (0u64..50, any::<bool>()).prop_map(|(window, by_admissions)| {
            StrategyConfig::PhaseWindow {
                window,
                window_unit: if by_admissions {
                    WindowUnit::Admissions
                } else {
                    WindowUnit::Decisions
                },
            }
        }),
        (0u32..3).prop_map(|reserve_margin| StrategyConfig::FixedPriorityAttribute {
            priority_attributes: vec!["a".to_string()],
            reserved_attribute: Some("b".to_string()),
            reserve_margin,
        }),
    ]
}

fn arb_any_state() -> impl Strategy<Value = Fixture> {
    (1u32..40)
        .prop_flat_map(|capacity| {
            (
                Just(capacity),
                0..=capacity,
                0u32..100,
                prop::array::uniform3(0..=capacity),
                any::<[bool; 3]>(),
            )
        })
        .prop_flat_map(|(capacity, admitted, rejected, mins, presence)| {
            (
                Just(capacity),
                Just(admitted),
                Just(rejected),
                prop::array::uniform3(0..=admitted),
                Just(mins),
                Just(presence),
            )
        })
        .prop_map(|(capacity, admitted, rejected, counts, mins, presence)| Fixture {
            capacity,
            admitted,
            rejected,
            counts,
            mins,
            presence,
        })
}

fn arb_saturated_state() -> impl Strategy<Value = Fixture> {
    (1u32..40)
        .prop_flat_map(|capacity| (Just(capacity), 0..capacity, 0u32..100, any::<[bool; 3]>()))
        .prop_flat_map(|(capacity, admitted, rejected, presence)| {
            (
                Just(capacity),
                Just(admitted),
                Just(rejected),
                prop::array::uniform3(0..=admitted),
                Just(presence),
            )
        })
        .prop_flat_map(|(capacity, admitted, rejected, counts, presence)| {
            (
                Just(capacity),
                Just(admitted),
                Just(rejected),
                Just(counts),
                (0..=counts[0], 0..=counts[1], 0..=counts[2]),
                Just(presence),
            )
        })
        .prop_map(
            |(capacity, admitted, rejected, counts, (min_a, min_b, min_c), presence)| Fixture {
                capacity,
                admitted,
                rejected,
                counts,
                mins: [min_a, min_b, min_c],
                presence,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_infeasible_accept_is_always_rejected(
        fixture in arb_any_state(),
        strategy in arb_strategy(),
    ) {
        let model = model();
        let constraints = fixture.constraints(&model);
        let state = fixture.state();
        let controller = AdmissionController::from_config(&strategy, ScoringPolicy::default());

        let remaining_after = i64::from(fixture.capacity) - i64::from(fixture.admitted) - 1;
        let infeasible = remaining_after < 0
            || (0..ATTRIBUTES.len()).any(|slot| {
                let needed = fixture.mins[slot].saturating_sub(fixture.counts[slot]);
                let needed_after = if fixture.presence[slot] {
                    needed.saturating_sub(1)
                } else {
                    needed
                };
                i64::from(needed_after) > remaining_after
            });
        prop_assume!(infeasible);

        let candidate = candidate_from(0, fixture.presence);
        prop_assert!(!controller.decide(&candidate, &state, &constraints, &model));
    }

    #[test]
    fn prop_saturated_run_accepts_everyone_until_full(
        fixture in arb_saturated_state(),
        strategy in arb_strategy(),
    ) {
        let model = model();
        let constraints = fixture.constraints(&model);
        let state = fixture.state();
        let controller = AdmissionController::from_config(&strategy, ScoringPolicy::default());

        let candidate = candidate_from(0, fixture.presence);
        prop_assert!(controller.decide(&candidate, &state, &constraints, &model));
    }

    #[test]
    fn prop_controller_never_overfills_and_full_venue_meets_every_minimum(
        capacity in 1u32..30,
        min_fractions in prop::array::uniform3(0.0f64..=1.0),
        arrivals in prop::collection::vec(any::<[bool; 3]>(), 0..300),
        strategy in arb_strategy(),
    ) {
        let model = model();
        let mins: Vec<(&str, u32)> = ATTRIBUTES
            .iter()
            .copied()
            .zip(min_fractions.map(|fraction| (fraction * f64::from(capacity)).floor() as u32))
            .collect();
        let constraints = constraints(&model, &mins);
        let mut state = AdmissionState::new(capacity, model.attribute_set())
            .expect("state should build");
        let controller = AdmissionController::from_config(&strategy, ScoringPolicy::default());

        for (index, presence) in arrivals.into_iter().enumerate() {
            let candidate = candidate_from(index as u64, presence);
            let accept = controller.decide(&candidate, &state, &constraints, &model);
            prop_assert!(state.apply(&candidate, accept).is_ok());
            prop_assert!(state.admitted_count() <= capacity);
        }

        if state.is_full() {
            prop_assert!(state.all_constraints_met(&constraints));
        }
    }
}
