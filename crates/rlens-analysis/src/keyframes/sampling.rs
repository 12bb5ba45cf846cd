//! Bounded keyframe sampling policy.
//!
//! Decides which reps of a set get sampled into which collage. The output
//! is bounded regardless of set length: at most two collages of at most
//! four reps each, so a 50-rep set costs the same to render as an 8-rep
//! set.

use rlens_models::{CollageGroup, CollageLabel, CollagePlan};
use tracing::debug;

use crate::config::REPS_PER_COLLAGE;

/// Plan the collages for a set of `total_reps` reps.
///
/// - 0 reps: an empty plan, nothing gets rendered.
/// - Up to 4 reps: a single `full` collage covering every rep.
/// - 5 or more reps: a `first4` and a `last4` collage. Below 8 reps the
///   two windows overlap in the middle; from 8 reps up they are disjoint.
pub fn plan_collages(total_reps: usize) -> CollagePlan {
    if total_reps == 0 {
        return CollagePlan::empty();
    }

    let groups = if total_reps <= REPS_PER_COLLAGE {
        vec![CollageGroup::new(
            CollageLabel::Full,
            (1..=total_reps as u32).collect(),
        )]
    } else {
        let last_start = (total_reps - REPS_PER_COLLAGE + 1) as u32;
        vec![
            CollageGroup::new(CollageLabel::First4, (1..=REPS_PER_COLLAGE as u32).collect()),
            CollageGroup::new(CollageLabel::Last4, (last_start..=total_reps as u32).collect()),
        ]
    };

    let plan = CollagePlan { groups };
    debug!(
        total_reps,
        collages = plan.groups.len(),
        frame_budget = plan.frame_budget(),
        "Planned keyframe collages"
    );
    plan
}
