//! Rule rotation, chaos accounting and classification

use glam::Vec2;

use super::fish::{Fish, FishColor, FishShape, ORDER_NAMES};
use super::rng::RandomSource;
use super::state::{GameState, Message, Rule, Viewport};
use crate::consts::*;

/// Count the active rule down by one frame, rotating it when it expires.
///
/// On rotation a fresh rule is drawn from [`Rule::ROTATION`]. Above the chaos
/// gate there is a 30% chance it is replaced by [`Rule::Soul`], which costs
/// more chaos and raises the anomaly warning.
pub fn advance_rule_timer(state: GameState, rng: &mut dyn RandomSource) -> GameState {
    let remaining = state.rule_timer - FRAME_DT;

    if remaining > 0.0 {
        let message = match state.message {
            Some(Message::RuleShifting) if remaining < RULE_NOTICE_CLEAR_AT => None,
            other => other,
        };
        return GameState {
            rule_timer: remaining,
            message,
            ..state
        };
    }

    let drawn = Rule::ROTATION[rng.index(Rule::ROTATION.len())];
    let (rule, message, chaos_cost) = if state.chaos > SOUL_CHAOS_GATE && rng.unit() > SOUL_ROLL {
        (Rule::Soul, Message::Anomaly, SOUL_CHAOS)
    } else {
        (drawn, Message::RuleShifting, ROTATION_CHAOS)
    };
    log::debug!("Rule rotated to {:?} (chaos {} +{})", rule, state.chaos, chaos_cost);

    GameState {
        rule,
        rule_timer: RULE_DURATION,
        message: Some(message),
        ..state
    }
    .with_more_chaos(chaos_cost)
}

/// Does `fish` satisfy `rule`? Nothing satisfies [`Rule::Soul`].
pub fn rule_accepts(rule: Rule, fish: &Fish) -> bool {
    match rule {
        Rule::CollectRed => fish.color == FishColor::Red,
        Rule::CollectBlue => fish.color == FishColor::Blue,
        Rule::CollectRound => fish.shape == FishShape::Round,
        Rule::CollectSharp => fish.shape == FishShape::Sharp,
        Rule::Soul => false,
    }
}

/// What a drop into the archive zone means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The mirror fish was captured, no rule applies
    Ending,
    Correct,
    Wrong,
}

pub fn judge(state: &GameState, fish: &Fish) -> Verdict {
    if fish.is_mirror() {
        Verdict::Ending
    } else if rule_accepts(state.rule, fish) {
        Verdict::Correct
    } else {
        Verdict::Wrong
    }
}

/// Score and chaos after a correct sort
pub fn reward(state: GameState) -> GameState {
    GameState {
        score: state.score + CORRECT_SCORE,
        message: Some(Message::Verified),
        ..state
    }
    .with_less_chaos(CORRECT_CALM)
}

/// Chaos after a wrong sort
pub fn penalize(state: GameState) -> GameState {
    state
        .with_more_chaos(WRONG_CHAOS)
        .with_message(Some(Message::Invalid))
}

/// A correctly sorted fish: named, calmed and settled into the archive band
pub fn archive(fish: &Fish, viewport: &Viewport, rng: &mut dyn RandomSource) -> Fish {
    let name = ORDER_NAMES[rng.index(ORDER_NAMES.len())];
    let vel = Vec2::new(rng.jitter(0.25), rng.jitter(0.25));
    let settle = viewport.height * ARCHIVE_SETTLE_FRACTION;
    let y = fish.pos.y.min(settle).max(ARCHIVE_EDGE_MARGIN);

    Fish {
        locked: false,
        collected: true,
        name: Some(name.to_string()),
        vel,
        pos: Vec2::new(fish.pos.x, y),
        ..fish.clone()
    }
}

/// A wrongly sorted fish: thrown back below the band
pub fn reject(fish: &Fish, viewport: &Viewport, rng: &mut dyn RandomSource) -> Fish {
    Fish {
        locked: false,
        vel: Vec2::new(rng.jitter(2.5), 5.0),
        pos: Vec2::new(fish.pos.x, viewport.height * REJECT_DEPTH_FRACTION),
        ..fish.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fish::{FishId, FishKind};
    use crate::sim::rng::ScriptedRng;
    use crate::sim::state::GamePhase;
    use proptest::prelude::*;

    fn playing() -> GameState {
        GameState::baseline().with_phase(GamePhase::Playing)
    }

    fn fish(color: FishColor, shape: FishShape) -> Fish {
        let mut rng = ScriptedRng::constant(0.9);
        Fish {
            color,
            shape,
            ..Fish::spawn(FishId(3), FishKind::Normal, 0, &Viewport::new(800.0, 600.0), &mut rng)
        }
    }

    #[test]
    fn test_timer_counts_down_one_frame() {
        let mut rng = ScriptedRng::constant(0.0);
        let next = advance_rule_timer(playing(), &mut rng);
        assert!((next.rule_timer - (60.0 - 1.0 / 60.0)).abs() < 1e-5);
        assert_eq!(next.rule, Rule::CollectRed);
        assert_eq!(next.chaos, 20);
    }

    #[test]
    fn test_ordinary_rotation() {
        let state = GameState { rule_timer: 0.01, ..playing() };
        // index draw 0.6 -> CollectRound
        let mut rng = ScriptedRng::new(vec![0.6]);
        let next = advance_rule_timer(state, &mut rng);
        assert_eq!(next.rule, Rule::CollectRound);
        assert_eq!(next.chaos, 22);
        assert_eq!(next.rule_timer, 60.0);
        assert_eq!(next.message, Some(Message::RuleShifting));
    }

    #[test]
    fn test_soul_rotation_clamps_chaos() {
        let state = GameState { rule_timer: 0.0, chaos: 95, ..playing() };
        // index draw, then soul roll 0.8 > 0.7
        let mut rng = ScriptedRng::new(vec![0.1, 0.8]);
        let next = advance_rule_timer(state, &mut rng);
        assert_eq!(next.rule, Rule::Soul);
        assert_eq!(next.chaos, 100);
        assert_eq!(next.message, Some(Message::Anomaly));
        assert_eq!(next.rule_timer, 60.0);
    }

    #[test]
    fn test_soul_needs_chaos_above_gate() {
        let state = GameState { rule_timer: 0.0, chaos: 50, ..playing() };
        let mut rng = ScriptedRng::new(vec![0.1, 0.99]);
        let next = advance_rule_timer(state, &mut rng);
        assert_eq!(next.rule, Rule::CollectRed);
        assert_eq!(next.chaos, 52);
    }

    #[test]
    fn test_soul_roll_miss() {
        let state = GameState { rule_timer: 0.0, chaos: 80, ..playing() };
        let mut rng = ScriptedRng::new(vec![0.3, 0.7]);
        let next = advance_rule_timer(state, &mut rng);
        assert_eq!(next.rule, Rule::CollectBlue);
        assert_eq!(next.chaos, 82);
        assert_eq!(next.message, Some(Message::RuleShifting));
    }

    #[test]
    fn test_rule_notice_clears_after_two_seconds() {
        let state = GameState {
            rule_timer: 58.01,
            message: Some(Message::RuleShifting),
            ..playing()
        };
        let mut rng = ScriptedRng::constant(0.0);
        let next = advance_rule_timer(state, &mut rng);
        assert_eq!(next.message, None);

        // The anomaly warning lingers
        let state = GameState { message: Some(Message::Anomaly), ..state };
        let next = advance_rule_timer(state, &mut rng);
        assert_eq!(next.message, Some(Message::Anomaly));
    }

    #[test]
    fn test_rule_matching() {
        let red_sharp = fish(FishColor::Red, FishShape::Sharp);
        assert!(rule_accepts(Rule::CollectRed, &red_sharp));
        assert!(!rule_accepts(Rule::CollectBlue, &red_sharp));
        assert!(rule_accepts(Rule::CollectSharp, &red_sharp));
        assert!(!rule_accepts(Rule::CollectRound, &red_sharp));

        let green_round = fish(FishColor::Green, FishShape::Round);
        assert!(rule_accepts(Rule::CollectRound, &green_round));
        assert!(!rule_accepts(Rule::CollectRed, &green_round));
    }

    #[test]
    fn test_mirror_judged_as_ending_under_any_rule() {
        let mut mirror = fish(FishColor::Red, FishShape::Round);
        mirror.kind = FishKind::Mirror;
        for rule in [Rule::CollectRed, Rule::Soul, Rule::CollectSharp] {
            let state = GameState { rule, ..playing() };
            assert_eq!(judge(&state, &mirror), Verdict::Ending);
        }
    }

    #[test]
    fn test_glitch_sorts_like_normal() {
        let mut glitch = fish(FishColor::Blue, FishShape::Round);
        glitch.kind = FishKind::Glitch;
        let state = GameState { rule: Rule::CollectBlue, ..playing() };
        assert_eq!(judge(&state, &glitch), Verdict::Correct);
    }

    #[test]
    fn test_reward_and_penalty() {
        let rewarded = reward(playing());
        assert_eq!(rewarded.score, 10);
        assert_eq!(rewarded.chaos, 15);
        assert_eq!(rewarded.message, Some(Message::Verified));

        let calm = GameState { chaos: 2, ..playing() };
        assert_eq!(reward(calm).chaos, 0);

        let penalized = penalize(GameState { chaos: 95, ..playing() });
        assert_eq!(penalized.chaos, 100);
        assert_eq!(penalized.score, 0);
        assert_eq!(penalized.message, Some(Message::Invalid));
    }

    #[test]
    fn test_archive_names_and_settles() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut held = fish(FishColor::Red, FishShape::Round);
        held.locked = true;
        held.pos = Vec2::new(300.0, 100.0);
        // name index 0.0 -> SEQUENCE, then jitter draws
        let mut rng = ScriptedRng::new(vec![0.0, 1.0, 0.0]);
        let archived = archive(&held, &viewport, &mut rng);
        assert_eq!(archived.name.as_deref(), Some("SEQUENCE"));
        assert!(archived.collected);
        assert!(!archived.locked);
        assert_eq!(archived.pos, Vec2::new(300.0, 90.0));
        assert_eq!(archived.vel, Vec2::new(0.25, -0.25));
    }

    #[test]
    fn test_reject_drops_below_band() {
        let viewport = Viewport::new(800.0, 600.0);
        let mut held = fish(FishColor::Red, FishShape::Round);
        held.locked = true;
        held.pos = Vec2::new(300.0, 40.0);
        let mut rng = ScriptedRng::constant(0.5);
        let rejected = reject(&held, &viewport, &mut rng);
        assert!(!rejected.locked);
        assert!(!rejected.collected);
        assert_eq!(rejected.pos, Vec2::new(300.0, 150.0));
        assert_eq!(rejected.vel, Vec2::new(0.0, 5.0));
    }

    proptest! {
        #[test]
        fn prop_chaos_stays_bounded(
            chaos in 0u32..=100,
            timer in 0.0f32..0.05,
            draws in proptest::collection::vec(0.0f32..1.0, 1..8),
        ) {
            let state = GameState { chaos, rule_timer: timer, ..playing() };
            let mut rng = ScriptedRng::new(draws);
            let next = advance_rule_timer(state, &mut rng);
            prop_assert!(next.chaos <= 100);
            prop_assert!(penalize(next).chaos <= 100);
            prop_assert!(reward(next).chaos <= 100);
        }
    }
}
