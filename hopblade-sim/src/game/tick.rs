//! Simulation Tick
//!
//! One fixed-timestep step of the game. Pure function of the state and one
//! input snapshot: same state + same snapshot = same result, bit for bit.

use crate::game::collision::{clamp_to_screen, resolve_ground};
use crate::game::config::PhysicsConfig;
use crate::game::events::SimEvent;
use crate::game::input::{InputRecording, InputSnapshot};
use crate::game::state::{Facing, JumpState, Mode, SimulationState, SwingPhase};
use crate::game::timing::TimingConstants;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<SimEvent>,
    /// Mode changed this tick
    pub mode_changed: bool,
}

/// Run one simulation tick.
///
/// # Order
///
/// Stages run in this order every tick; later stages override earlier
/// ones (collision overrides gravity):
///
/// 1. Mode gate (main menu: only `confirm` does anything)
/// 2. Horizontal movement
/// 3. Jump state machine
/// 4. Swing state machine
/// 5. Gravity and integration
/// 6. Ground collision
/// 7. Screen bounds clamp
pub fn tick(
    state: &mut SimulationState,
    input: &InputSnapshot,
    timing: &TimingConstants,
    config: &PhysicsConfig,
) -> TickResult {
    let mut result = TickResult::default();

    // 1. Mode gate
    match state.mode {
        Mode::MainMenu => {
            if input.confirm_pressed() {
                state.mode = Mode::Playing;
                result.mode_changed = true;
                result
                    .events
                    .push(SimEvent::mode_changed(state.tick, Mode::MainMenu, Mode::Playing));
            }
            return result;
        }
        Mode::Playing => {}
    }

    let was_airborne = !state.grounded;

    // 2. Horizontal movement
    apply_horizontal(state, input, config);

    // 3. Jump
    update_jump(state, input, timing, config, &mut result);

    // 4. Swing
    update_swing(state, input, timing, &mut result);

    // 5. Gravity, applied even when grounded; step 6 undoes it
    state.vertical_velocity += config.gravity;
    state.position.y += state.vertical_velocity;

    // 6. Ground collision
    let fall_speed = state.vertical_velocity;
    if resolve_ground(state, config) && was_airborne {
        result.events.push(SimEvent::landed(state.tick, fall_speed));
    }

    // 7. Bounds
    clamp_to_screen(state, config);

    state.tick = state.tick.wrapping_add(1);

    result
}

/// Right then left, independently.
///
/// Holding both sums to zero displacement and leaves the character facing
/// left.
fn apply_horizontal(state: &mut SimulationState, input: &InputSnapshot, config: &PhysicsConfig) {
    if input.move_right() {
        state.position.x += config.move_speed;
        state.facing = Facing::Right;
    }
    if input.move_left() {
        state.position.x -= config.move_speed;
        state.facing = Facing::Left;
    }
}

/// Variable-height jump.
///
/// Holding after take-off decays the upward thrust linearly over
/// `max_jump_frames` ticks. Releasing early caps upward speed at
/// `min_jump_speed` (short hop).
fn update_jump(
    state: &mut SimulationState,
    input: &InputSnapshot,
    timing: &TimingConstants,
    config: &PhysicsConfig,
    result: &mut TickResult,
) {
    if input.jump_pressed_this_tick() && state.grounded {
        state.vertical_velocity = config.jump_speed;
        state.jump = JumpState {
            active: true,
            held: true,
            elapsed_frames: 0,
        };
        state.grounded = false;
        result
            .events
            .push(SimEvent::jump_started(state.tick, state.vertical_velocity));
    } else if input.jump_held() && state.jump.active && state.jump.held {
        state.jump.elapsed_frames = state.jump.elapsed_frames.saturating_add(1);

        let max = timing.max_jump_frames.max(1);
        let elapsed = state.jump.elapsed_frames;
        if elapsed < max {
            state.vertical_velocity = config.jump_speed * f64::from(max - elapsed) / f64::from(max);
        }
    } else if !input.jump_held() {
        if state.jump.active && state.jump.held {
            let clamped = state.vertical_velocity < config.min_jump_speed;
            if clamped {
                state.vertical_velocity = config.min_jump_speed;
            }
            result.events.push(SimEvent::jump_released(
                state.tick,
                clamped,
                state.jump.elapsed_frames,
            ));
        }
        state.jump.held = false;
        state.jump.active = false;
    }
}

/// Swing, then cooldown, then idle again.
///
/// Dispatches on the phase at the start of the step, so a swing started on
/// tick `t` is active through `t + swing_duration - 1`.
fn update_swing(
    state: &mut SimulationState,
    input: &InputSnapshot,
    timing: &TimingConstants,
    result: &mut TickResult,
) {
    let now = state.tick;
    let swing = &mut state.swing;

    match swing.phase() {
        SwingPhase::Swinging => {
            swing.elapsed_frames = swing.elapsed_frames.saturating_add(1);
            if swing.elapsed_frames >= timing.swing_duration {
                swing.active = false;
                swing.cooldown_remaining = timing.swing_cooldown;
                result.events.push(SimEvent::swing_ended(now, timing.swing_cooldown));
            }
        }
        SwingPhase::Cooldown => {
            swing.cooldown_remaining -= 1;
            if swing.cooldown_remaining == 0 {
                result.events.push(SimEvent::swing_ready(now));
            }
        }
        SwingPhase::Idle => {
            if input.swing_pressed() {
                swing.active = true;
                swing.elapsed_frames = 0;
                result.events.push(SimEvent::swing_started(now));
            }
        }
    }
}

/// Re-run a sequence of snapshots from `initial`.
///
/// Frames past the end of `inputs` are idle. Returns the final state and
/// every event produced.
pub fn replay(
    initial: SimulationState,
    inputs: &[InputSnapshot],
    timing: &TimingConstants,
    config: &PhysicsConfig,
    tick_count: u32,
) -> (SimulationState, Vec<SimEvent>) {
    let mut state = initial;
    let mut all_events = Vec::new();

    for t in 0..tick_count {
        let input = inputs.get(t as usize).copied().unwrap_or_default();
        let result = tick(&mut state, &input, timing, config);
        all_events.extend(result.events);
    }

    (state, all_events)
}

/// Re-run a delta-compressed recording from `initial`.
pub fn replay_recording(
    initial: SimulationState,
    recording: &InputRecording,
    timing: &TimingConstants,
    config: &PhysicsConfig,
) -> (SimulationState, Vec<SimEvent>) {
    let mut state = initial;
    let mut all_events = Vec::new();

    for (_, input) in recording.replay_iter() {
        let result = tick(&mut state, &input, timing, config);
        all_events.extend(result.events);
    }

    (state, all_events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::Profile;
    use crate::game::events::SimEventData;
    use crate::game::state::JumpPhase;

    const EPS: f64 = 1e-9;

    fn setup(profile: Profile) -> (SimulationState, TimingConstants, PhysicsConfig) {
        let config = profile.config();
        let timing = TimingConstants::calibrate(60, &config);
        (SimulationState::new_playing(&config), timing, config)
    }

    fn held() -> InputSnapshot {
        InputSnapshot::from_flags(InputSnapshot::JUMP_HELD)
    }

    fn flags(bits: u8) -> InputSnapshot {
        InputSnapshot::from_flags(bits)
    }

    #[test]
    fn test_idle_grounded_is_stable() {
        let (mut state, timing, config) = setup(Profile::Classic);
        let start = state.position;

        for _ in 0..10 {
            let result = tick(&mut state, &InputSnapshot::new(), &timing, &config);
            assert!(result.events.is_empty());
            assert!(state.grounded);
            assert_eq!(state.vertical_velocity, 0.0);
            assert_eq!(state.position, start);
        }
        assert_eq!(state.tick, 10);
    }

    #[test]
    fn test_main_menu_freezes_physics() {
        let config = PhysicsConfig::default();
        let timing = TimingConstants::calibrate(60, &config);
        let mut state = SimulationState::new(&config);
        let start = state.clone();

        let input = flags(InputSnapshot::MOVE_RIGHT | InputSnapshot::SWING).with(InputSnapshot::JUMP_PRESSED);
        let result = tick(&mut state, &input, &timing, &config);
        assert!(result.events.is_empty());
        assert_eq!(state, start);

        // Confirm switches mode and still skips physics on that tick
        let input = flags(InputSnapshot::CONFIRM | InputSnapshot::MOVE_RIGHT);
        let result = tick(&mut state, &input, &timing, &config);
        assert!(result.mode_changed);
        assert_eq!(state.mode, Mode::Playing);
        assert_eq!(state.position, start.position);
        assert_eq!(state.tick, 0);
        assert!(matches!(
            result.events[0].data,
            SimEventData::ModeChanged { old_mode: Mode::MainMenu, new_mode: Mode::Playing }
        ));

        tick(&mut state, &flags(InputSnapshot::MOVE_RIGHT), &timing, &config);
        assert_eq!(state.position.x, start.position.x + 5.0);
    }

    #[test]
    fn test_horizontal_movement_and_facing() {
        let (mut state, timing, config) = setup(Profile::Classic);
        let x0 = state.position.x;

        tick(&mut state, &flags(InputSnapshot::MOVE_LEFT), &timing, &config);
        assert_eq!(state.position.x, x0 - 5.0);
        assert_eq!(state.facing, Facing::Left);

        // Facing persists while idle
        tick(&mut state, &InputSnapshot::new(), &timing, &config);
        assert_eq!(state.facing, Facing::Left);

        tick(&mut state, &flags(InputSnapshot::MOVE_RIGHT), &timing, &config);
        assert_eq!(state.position.x, x0);
        assert_eq!(state.facing, Facing::Right);
    }

    #[test]
    fn test_both_directions_cancel_and_face_left() {
        let (mut state, timing, config) = setup(Profile::Classic);
        let x0 = state.position.x;

        let both = flags(InputSnapshot::MOVE_LEFT | InputSnapshot::MOVE_RIGHT);
        tick(&mut state, &both, &timing, &config);

        assert_eq!(state.position.x, x0);
        assert_eq!(state.facing, Facing::Left);
    }

    #[test]
    fn test_jump_start() {
        let (mut state, timing, config) = setup(Profile::Classic);
        let y0 = state.position.y;

        let result = tick(&mut state, &InputSnapshot::jump_press(), &timing, &config);

        assert!(!state.grounded);
        assert!(state.jump.active);
        assert!(state.jump.held);
        assert_eq!(state.jump.elapsed_frames, 0);
        assert!((state.vertical_velocity - (-12.0 + 0.9)).abs() < EPS);
        assert!((state.position.y - (y0 - 11.1)).abs() < EPS);
        assert_eq!(state.jump_phase(&timing), JumpPhase::JumpRising);
        assert!(matches!(result.events[0].data, SimEventData::JumpStarted { velocity } if velocity == -12.0));
    }

    #[test]
    fn test_jump_edge_required() {
        let (mut state, timing, config) = setup(Profile::Classic);

        // Held without an edge never starts a jump
        for _ in 0..5 {
            tick(&mut state, &held(), &timing, &config);
            assert!(state.grounded);
            assert!(!state.jump.active);
        }
    }

    #[test]
    fn test_jump_decay_while_held() {
        let (mut state, timing, config) = setup(Profile::Snappy);
        let max = timing.max_jump_frames;
        assert_eq!(max, 20);

        tick(&mut state, &InputSnapshot::jump_press(), &timing, &config);

        for k in 1..max {
            tick(&mut state, &held(), &timing, &config);
            let expected = -12.0 * f64::from(max - k) / f64::from(max) + 0.9;
            assert_eq!(state.jump.elapsed_frames, k);
            assert!(
                (state.vertical_velocity - expected).abs() < EPS,
                "tick {k}: {} vs {}",
                state.vertical_velocity,
                expected
            );
        }

        // At max the decay stops overriding; gravity alone acts
        let before = state.vertical_velocity;
        tick(&mut state, &held(), &timing, &config);
        assert_eq!(state.jump.elapsed_frames, max);
        assert_eq!(state.jump_phase(&timing), JumpPhase::JumpHeld);
        assert!((state.vertical_velocity - (before + 0.9)).abs() < EPS);
    }

    #[test]
    fn test_short_hop_clamps_on_release() {
        let (mut state, timing, config) = setup(Profile::Classic);

        tick(&mut state, &InputSnapshot::jump_press(), &timing, &config);
        tick(&mut state, &held(), &timing, &config);
        assert!(state.vertical_velocity < config.min_jump_speed);

        let result = tick(&mut state, &InputSnapshot::new(), &timing, &config);

        // Clamped to -3, then gravity
        assert!((state.vertical_velocity - (-3.0 + 0.9)).abs() < EPS);
        assert!(!state.jump.active);
        assert!(!state.jump.held);
        assert_eq!(state.jump_phase(&timing), JumpPhase::Released);
        assert!(matches!(
            result.events[0].data,
            SimEventData::JumpReleased { clamped: true, held_frames: 1 }
        ));
    }

    #[test]
    fn test_late_release_does_not_clamp() {
        let (mut state, timing, config) = setup(Profile::Snappy);

        tick(&mut state, &InputSnapshot::jump_press(), &timing, &config);
        for _ in 0..18 {
            tick(&mut state, &held(), &timing, &config);
        }
        // -12 * 2/20 + 0.9 = -0.3: already slower than the cap
        let before = state.vertical_velocity;
        assert!(before > config.min_jump_speed);

        let result = tick(&mut state, &InputSnapshot::new(), &timing, &config);
        assert!((state.vertical_velocity - (before + 0.9)).abs() < EPS);
        assert!(matches!(
            result.events[0].data,
            SimEventData::JumpReleased { clamped: false, .. }
        ));
    }

    #[test]
    fn test_no_double_jump_in_air() {
        let (mut state, timing, config) = setup(Profile::Classic);

        tick(&mut state, &InputSnapshot::jump_press(), &timing, &config);
        tick(&mut state, &InputSnapshot::new(), &timing, &config);
        let vy = state.vertical_velocity;

        let result = tick(&mut state, &InputSnapshot::jump_press(), &timing, &config);
        assert!(result.events.is_empty());
        assert!(!state.jump.active);
        assert!((state.vertical_velocity - (vy + 0.9)).abs() < EPS);
    }

    #[test]
    fn test_landing_resets_jump() {
        let (mut state, timing, config) = setup(Profile::Classic);

        tick(&mut state, &InputSnapshot::jump_press(), &timing, &config);

        // Keep holding until back on the ground
        let mut landed_at = None;
        for t in 1..500u32 {
            let result = tick(&mut state, &held(), &timing, &config);
            if let Some(event) = result
                .events
                .iter()
                .find(|e| matches!(e.data, SimEventData::Landed { .. }))
            {
                if let SimEventData::Landed { fall_speed } = event.data {
                    assert!(fall_speed > 0.0);
                }
                landed_at = Some(t);
                break;
            }
        }

        assert!(landed_at.is_some(), "character never landed");
        assert!(state.grounded);
        assert_eq!(state.vertical_velocity, 0.0);
        assert_eq!(state.jump, JumpState::default());
        assert_eq!(state.position.y, config.platform_y() - config.character_height);

        // Still holding: no new jump without a fresh press
        tick(&mut state, &held(), &timing, &config);
        assert!(state.grounded);
    }

    #[test]
    fn test_swing_timeline_at_60hz() {
        let (mut state, timing, config) = setup(Profile::Classic);
        assert_eq!(timing.swing_duration, 15);

        let swing = flags(InputSnapshot::SWING);
        for t in 0..=30u32 {
            let input = if t == 0 { swing } else { InputSnapshot::new() };
            tick(&mut state, &input, &timing, &config);

            match t {
                0..=14 => {
                    assert!(state.swing.active, "tick {t}");
                    assert_eq!(state.swing.elapsed_frames, t);
                }
                15 => {
                    assert!(!state.swing.active);
                    assert_eq!(state.swing.cooldown_remaining, 15);
                    assert_eq!(state.swing_phase(), SwingPhase::Cooldown);
                }
                16..=29 => assert_eq!(state.swing.cooldown_remaining, 30 - t),
                _ => assert_eq!(state.swing_phase(), SwingPhase::Idle),
            }
        }
    }

    #[test]
    fn test_swing_cannot_retrigger() {
        let (mut state, timing, config) = setup(Profile::Classic);
        let swing = flags(InputSnapshot::SWING);

        tick(&mut state, &swing, &timing, &config);
        let mut mashed = state.clone();
        let mut idle = state.clone();

        // Mashing swing during the swing and the cooldown changes nothing
        for _ in 1..=30 {
            let a = tick(&mut mashed, &swing, &timing, &config);
            let b = tick(&mut idle, &InputSnapshot::new(), &timing, &config);
            assert_eq!(mashed.swing, idle.swing);
            assert_eq!(a.events, b.events);
        }

        // Cooldown ran out on tick 30: the held button swings again
        assert_eq!(mashed.swing_phase(), SwingPhase::Idle);
        let result = tick(&mut mashed, &swing, &timing, &config);
        assert!(mashed.swing.active);
        assert!(matches!(result.events[0].data, SimEventData::SwingStarted));
    }

    #[test]
    fn test_swing_events() {
        let (mut state, timing, config) = setup(Profile::Classic);
        let (_, events) = replay(
            state.clone(),
            &[flags(InputSnapshot::SWING)],
            &timing,
            &config,
            31,
        );
        let kinds: Vec<_> = events.iter().map(|e| (e.tick, e.data.clone())).collect();
        assert_eq!(
            kinds,
            vec![
                (0, SimEventData::SwingStarted),
                (15, SimEventData::SwingEnded { cooldown: 15 }),
                (30, SimEventData::SwingReady),
            ]
        );

        // Swinging in the air works the same
        tick(&mut state, &InputSnapshot::jump_press().with(InputSnapshot::SWING), &timing, &config);
        assert!(state.swing.active);
        assert!(!state.grounded);
    }

    #[test]
    fn test_zero_cooldown_goes_straight_to_idle() {
        let config = PhysicsConfig::default();
        let timing = TimingConstants {
            tick_rate: 60,
            max_jump_frames: 50,
            swing_duration: 2,
            swing_cooldown: 0,
        };
        let mut state = SimulationState::new_playing(&config);
        let swing = flags(InputSnapshot::SWING);

        tick(&mut state, &swing, &timing, &config);
        tick(&mut state, &swing, &timing, &config);
        tick(&mut state, &swing, &timing, &config);
        assert_eq!(state.swing_phase(), SwingPhase::Idle);
        tick(&mut state, &swing, &timing, &config);
        assert!(state.swing.active);
    }

    #[test]
    fn test_left_edge_clamp() {
        let (mut state, timing, config) = setup(Profile::Classic);
        state.position.x = 0.0;

        for _ in 0..20 {
            tick(&mut state, &flags(InputSnapshot::MOVE_LEFT), &timing, &config);
            assert_eq!(state.position.x, 0.0);
        }
    }

    #[test]
    fn test_right_edge_clamp() {
        let (mut state, timing, config) = setup(Profile::Classic);

        for _ in 0..400 {
            tick(&mut state, &flags(InputSnapshot::MOVE_RIGHT), &timing, &config);
            assert!(state.position.x <= config.max_x());
        }
        assert_eq!(state.position.x, config.max_x());
    }

    #[test]
    fn test_replay_determinism() {
        let (state, timing, config) = setup(Profile::Floaty);

        let inputs: Vec<InputSnapshot> = (0..240u32)
            .map(|t| {
                let mut input = InputSnapshot::new();
                input.set_move_right(t % 50 < 30);
                input.set_move_left(t % 70 > 55);
                input.set_jump_held(t % 40 < 12);
                input.set_jump_pressed(t % 40 == 0);
                input.set_swing(t % 33 == 5);
                input
            })
            .collect();

        let (final1, events1) = replay(state.clone(), &inputs, &timing, &config, 240);
        let (final2, events2) = replay(state, &inputs, &timing, &config, 240);

        assert_eq!(final1.compute_hash(), final2.compute_hash());
        assert_eq!(events1, events2);
        assert_eq!(final1.tick, 240);
    }

    #[test]
    fn test_replay_empty_recording_is_a_no_op() {
        let (state, timing, config) = setup(Profile::Classic);

        let (after, events) = replay_recording(state.clone(), &InputRecording::new(), &timing, &config);
        assert_eq!(after, state);
        assert!(events.is_empty());
    }

    #[test]
    fn test_replay_recording_started_late() {
        let (mut live, timing, config) = setup(Profile::Classic);
        let initial = live.clone();
        let right = InputSnapshot::from_flags(InputSnapshot::MOVE_RIGHT);

        // Recording joins a session already 100 ticks in
        let mut recording = InputRecording::new();
        for t in 100..110u32 {
            recording.record(t, right);
            tick(&mut live, &right, &timing, &config);
        }

        let (replayed, _) = replay_recording(initial, &recording, &timing, &config);
        assert_eq!(replayed.tick, 10);
        assert_eq!(replayed, live);
    }

    #[test]
    fn test_replay_recording_matches_live_run() {
        let (mut live, timing, config) = setup(Profile::Classic);
        let initial = live.clone();
        let mut recording = InputRecording::new();

        for t in 0..90u32 {
            let mut input = InputSnapshot::new();
            input.set_move_left(t < 40);
            input.set_jump_held((10..25).contains(&t));
            input.set_jump_pressed(t == 10);
            input.set_swing(t == 50);

            recording.record(t, input);
            tick(&mut live, &input, &timing, &config);
        }

        let (replayed, _) = replay_recording(initial, &recording, &timing, &config);
        assert_eq!(replayed.compute_hash(), live.compute_hash());
        assert_eq!(replayed, live);
    }
}
