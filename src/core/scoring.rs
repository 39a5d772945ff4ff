use crate::models::{Availability, Profile, ScoreBreakdown, ScoringWeights};
use std::collections::BTreeSet;

/// Calculate the compatibility score (0-100) of `candidate` as seen by `viewer`
///
/// Scoring formula (default weights):
/// score = round((
///     skill_score * 0.40 +         # 100 minus 25 per point of skill gap
///     location * 25 +              # same place = 1.0, both set but different = 0.3
///     game_type_overlap * 20 +     # shared game types / larger set
///     availability_overlap * 15    # shared slots / larger slot count per shared day
/// ) / 100 * 100)
///
/// Every weight counts toward the denominator even when its factor has
/// nothing to compare, so a missing location still costs 25 points.
pub fn calculate_match_score(
    viewer: &Profile,
    candidate: &Profile,
    weights: &ScoringWeights,
) -> u8 {
    let breakdown = calculate_score_breakdown(viewer, candidate, weights);
    normalize_score(breakdown.sum(), weights.total())
}

/// Weighted contribution of each factor before normalization
pub fn calculate_score_breakdown(
    viewer: &Profile,
    candidate: &Profile,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let skill = calculate_skill_score(
        viewer.skill_level,
        candidate.skill_level,
        weights.skill_gap_penalty,
    );

    let location = calculate_location_score(
        viewer.location(),
        candidate.location(),
        weights.location_partial_credit,
    );

    let game_types = calculate_game_type_overlap(
        &viewer.preferred_game_types,
        &candidate.preferred_game_types,
    );

    let availability = calculate_availability_overlap(&viewer.availability, &candidate.availability);

    ScoreBreakdown {
        skill: skill * (weights.skill / 100.0),
        location: location * weights.location,
        game_types: game_types * weights.game_types,
        availability: availability * weights.availability,
    }
}

/// Skill sub-score (0-100)
/// A gap of `100 / penalty` levels or more scores zero
#[inline]
pub fn calculate_skill_score(viewer_skill: f64, candidate_skill: f64, penalty: f64) -> f64 {
    let diff = (viewer_skill - candidate_skill).abs();
    let score = 100.0 - diff * penalty;

    if score.is_nan() {
        return 0.0;
    }

    score.clamp(0.0, 100.0)
}

/// Location factor (0-1)
#[inline]
pub fn calculate_location_score(
    viewer_location: Option<&str>,
    candidate_location: Option<&str>,
    partial_credit: f64,
) -> f64 {
    match (viewer_location, candidate_location) {
        (Some(a), Some(b)) if a == b => 1.0,
        (Some(_), Some(_)) => partial_credit,
        _ => 0.0,
    }
}

/// Game type factor (0-1): shared types over the larger of the two sets
#[inline]
pub fn calculate_game_type_overlap(viewer: &BTreeSet<String>, candidate: &BTreeSet<String>) -> f64 {
    let common = viewer.intersection(candidate).count();
    if common == 0 {
        return 0.0;
    }

    common as f64 / viewer.len().max(candidate.len()) as f64
}

/// Availability factor (0-1)
///
/// Only days in the viewer's map that the candidate also lists are compared.
/// Each shared day adds its common slots to the overlap and the larger slot
/// count to the total.
pub fn calculate_availability_overlap(viewer: &Availability, candidate: &Availability) -> f64 {
    let (overlap, total) = viewer
        .iter()
        .filter_map(|(day, slots)| candidate.get(day).map(|other| (slots, other)))
        .fold((0usize, 0usize), |(overlap, total), (mine, theirs)| {
            (
                overlap + mine.intersection(theirs).count(),
                total + mine.len().max(theirs.len()),
            )
        });

    if total == 0 {
        return 0.0;
    }

    overlap as f64 / total as f64
}

/// Scale the raw weighted sum to an integer 0-100
#[inline]
fn normalize_score(raw: f64, total_weight: f64) -> u8 {
    if total_weight <= 0.0 || !total_weight.is_finite() {
        return 0;
    }

    let score = ((raw / total_weight) * 100.0).round();
    if score.is_nan() {
        return 0;
    }

    score.clamp(0.0, 100.0) as u8
}
