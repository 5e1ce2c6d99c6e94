//! Button gestures, setpoint persistence and power-cycle behaviour, with the
//! NVS simulation backend standing in for flash.

use incubator::app::events::AppEvent;
use incubator::app::ports::{Button, StorageError};
use incubator::config::{SetpointBounds, SetpointEncoding, ThermostatConfig};
use incubator::control::setpoint::{SENTINEL_FULL, SENTINEL_WHOLE_DEGREE, SaveOutcome};
use incubator::display::TextLayout;

use crate::mock_hw::Rig;

fn adjustments(rig: &Rig) -> usize {
    rig.sink
        .count(|e| matches!(e, AppEvent::SetpointAdjusted { .. }))
}

fn saves(rig: &Rig) -> Vec<(f32, SaveOutcome)> {
    rig.sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::SetpointSaved {
                setpoint_c,
                outcome,
            } => Some((*setpoint_c, *outcome)),
            _ => None,
        })
        .collect()
}

// ── First boot ────────────────────────────────────────────────

#[test]
fn first_boot_writes_default_record() {
    let rig = Rig::boot(ThermostatConfig::default(), 20.0);

    assert_eq!(rig.app.setpoint(), 22.0);
    let region = rig.nvs.committed_region().unwrap();
    assert_eq!(region[..2], [SENTINEL_WHOLE_DEGREE, 22]);
    assert_eq!(rig.nvs.commit_count(), 1);
    assert_eq!(
        rig.sink.events.first(),
        Some(&AppEvent::Started { setpoint_c: 22.0 })
    );
}

#[test]
fn later_boot_restores_without_rewriting() {
    let rig = Rig::boot(ThermostatConfig::default(), 20.0);
    let nvs = rig.nvs.power_cycle();
    let rig = Rig::boot_with(ThermostatConfig::default(), 20.0, nvs);

    assert_eq!(rig.app.setpoint(), 22.0);
    assert_eq!(rig.nvs.commit_count(), 1);
}

// ── Single presses ────────────────────────────────────────────

#[test]
fn clicks_adjust_in_memory_only() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    rig.click(Button::Up);
    rig.click(Button::Up);
    rig.click(Button::Down);

    assert_eq!(rig.app.setpoint(), 23.0);
    assert_eq!(adjustments(&rig), 3);
    assert_eq!(rig.display.rows[TextLayout::SETPOINT_ROW], "Set:  23.0C");
    // Still the first-boot record.
    assert_eq!(rig.nvs.committed_region().unwrap()[1], 22);
}

#[test]
fn press_fires_on_release_not_while_held() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    rig.hw.up = true;
    rig.run_for(3_000);
    assert_eq!(rig.app.setpoint(), 22.0);

    rig.hw.up = false;
    rig.run_for(100);
    assert_eq!(rig.app.setpoint(), 23.0);
}

#[test]
fn unsaved_adjustment_is_lost_on_power_cycle() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    rig.click(Button::Up);
    let nvs = rig.nvs.power_cycle();
    let rig = Rig::boot_with(ThermostatConfig::default(), 20.0, nvs);

    assert_eq!(rig.app.setpoint(), 22.0);
}

#[test]
fn bounds_clamp_when_configured() {
    let config = ThermostatConfig {
        setpoint_bounds: Some(SetpointBounds {
            min_c: 20.0,
            max_c: 24.0,
        }),
        ..ThermostatConfig::default()
    };
    let mut rig = Rig::boot(config, 20.0);
    for _ in 0..5 {
        rig.click(Button::Up);
    }

    assert_eq!(rig.app.setpoint(), 24.0);
    // Presses at the limit do not count as adjustments.
    assert_eq!(adjustments(&rig), 2);
}

#[test]
fn unbounded_by_default() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    for _ in 0..30 {
        rig.click(Button::Down);
    }
    assert_eq!(rig.app.setpoint(), -8.0);
}

// ── Combined hold ─────────────────────────────────────────────

#[test]
fn combined_hold_persists_setpoint() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    rig.click(Button::Up);
    rig.hold_both(2_500);

    assert_eq!(saves(&rig), vec![(23.0, SaveOutcome::Written)]);
    assert_eq!(rig.nvs.committed_region().unwrap()[1], 23);
    // Releasing after the hold is not a press.
    assert_eq!(adjustments(&rig), 1);

    let nvs = rig.nvs.power_cycle();
    let rig = Rig::boot_with(ThermostatConfig::default(), 20.0, nvs);
    assert_eq!(rig.app.setpoint(), 23.0);
}

#[test]
fn short_dual_press_does_nothing() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    rig.hold_both(1_000);

    assert!(saves(&rig).is_empty());
    assert_eq!(adjustments(&rig), 0);
    assert_eq!(rig.app.setpoint(), 22.0);
}

#[test]
fn long_hold_fires_once() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    rig.hold_both(10_000);
    assert_eq!(saves(&rig).len(), 1);
}

#[test]
fn partial_release_restarts_hold_timer() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    rig.hw.up = true;
    rig.hw.down = true;
    rig.run_for(1_500);

    rig.hw.down = false;
    rig.run_for(100);
    rig.hw.down = true;
    rig.run_for(1_500);
    assert!(saves(&rig).is_empty());

    rig.run_for(700);
    assert_eq!(saves(&rig).len(), 1);

    rig.hw.up = false;
    rig.hw.down = false;
    rig.run_for(100);
    assert_eq!(adjustments(&rig), 0);
}

#[test]
fn repeated_save_leaves_storage_untouched() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    rig.click(Button::Down);
    rig.hold_both(2_500);
    let commits = rig.nvs.commit_count();
    let region = rig.nvs.committed_region();

    rig.hold_both(2_500);

    assert_eq!(
        saves(&rig),
        vec![(21.0, SaveOutcome::Written), (21.0, SaveOutcome::Unchanged)]
    );
    assert_eq!(rig.nvs.commit_count(), commits);
    assert_eq!(rig.nvs.committed_region(), region);
}

#[test]
fn failed_commit_is_reported_and_next_save_writes() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    rig.click(Button::Up);
    rig.nvs.fail_next_commit();
    rig.hold_both(2_500);

    assert_eq!(
        rig.sink
            .count(|e| *e == AppEvent::SaveFailed(StorageError::IoError)),
        1
    );
    assert!(saves(&rig).is_empty());
    assert_eq!(rig.nvs.committed_region().unwrap()[1], 22);

    rig.hold_both(2_500);
    assert_eq!(saves(&rig), vec![(23.0, SaveOutcome::Written)]);

    let nvs = rig.nvs.power_cycle();
    let rig = Rig::boot_with(ThermostatConfig::default(), 20.0, nvs);
    assert_eq!(rig.app.setpoint(), 23.0);
}

// ── Encodings ─────────────────────────────────────────────────

#[test]
fn whole_degree_encoding_truncates_across_power_cycle() {
    let config = ThermostatConfig {
        setpoint_step_c: 0.5,
        ..ThermostatConfig::default()
    };
    let mut rig = Rig::boot(config.clone(), 20.0);
    rig.click(Button::Up);
    rig.hold_both(2_500);
    assert_eq!(rig.app.setpoint(), 22.5);

    let nvs = rig.nvs.power_cycle();
    let rig = Rig::boot_with(config, 20.0, nvs);
    assert_eq!(rig.app.setpoint(), 22.0);
}

#[test]
fn full_encoding_keeps_fractional_setpoint() {
    let config = ThermostatConfig {
        setpoint_step_c: 0.5,
        setpoint_encoding: SetpointEncoding::Full,
        ..ThermostatConfig::default()
    };
    let mut rig = Rig::boot(config.clone(), 20.0);
    rig.click(Button::Up);
    rig.hold_both(2_500);
    assert_eq!(rig.nvs.committed_region().unwrap()[0], SENTINEL_FULL);

    let nvs = rig.nvs.power_cycle();
    let rig = Rig::boot_with(config, 20.0, nvs);
    assert_eq!(rig.app.setpoint(), 22.5);
}

#[test]
fn whole_degree_record_survives_switch_to_full_encoding() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 20.0);
    rig.click(Button::Up);
    rig.hold_both(2_500);

    let config = ThermostatConfig {
        setpoint_encoding: SetpointEncoding::Full,
        ..ThermostatConfig::default()
    };
    let nvs = rig.nvs.power_cycle();
    let rig = Rig::boot_with(config, 20.0, nvs);
    assert_eq!(rig.app.setpoint(), 23.0);
}
