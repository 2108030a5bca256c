/// Pure game rules: scoring, difficulty escalation, and the HUD clock.
///
/// No state lives here. `sim::step` calls these at stage transitions.

/// Points for clearing `stage` after `elapsed_secs` on it.
/// Every stage is worth its number, plus a time bonus of `3 * stage`
/// that drains by one point per whole second.
pub fn stage_score(stage: u32, elapsed_secs: f32) -> u32 {
    let secs = elapsed_secs.max(0.0).trunc() as u64;
    let bonus = (3 * stage as u64).saturating_sub(secs);
    stage + bonus as u32
}

/// How much the enemy speed bounds grow when leaving `stage`.
pub fn rate_increment(stage: u32, rate_step: f32) -> f32 {
    stage as f32 * rate_step
}

pub fn is_final_stage(stage: u32, max_stages: u32) -> bool {
    stage >= max_stages
}

/// `MM: SS` clock for the HUD.
pub fn format_clock(secs: f32) -> String {
    let total = secs.max(0.0).floor() as u64;
    format!("{:02}: {:02}", total / 60, total % 60)
}
