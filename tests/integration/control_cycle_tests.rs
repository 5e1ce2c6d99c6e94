//! End-to-end control cycle tests: heater regimes, sampling cadence,
//! sensor-fault handling and display refresh, driven through
//! `Thermostat::tick` against mock hardware.

use incubator::app::events::AppEvent;
use incubator::config::{SensorFaultPolicy, ThermostatConfig};
use incubator::control::heater::{HeaterState, SwitchReason};
use incubator::display::TextLayout;

use crate::mock_hw::Rig;

fn reasons(rig: &Rig) -> Vec<(u32, HeaterState, SwitchReason)> {
    rig.sink
        .transitions()
        .iter()
        .map(|t| (t.at_ms, t.to, t.reason))
        .collect()
}

// ── Heater regimes ────────────────────────────────────────────

#[test]
fn far_below_setpoint_heats_on_first_cycle() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 19.0);
    rig.tick();

    assert_eq!(rig.app.heater_state(), HeaterState::On);
    // start() drives the relay off before the first decision.
    assert_eq!(rig.hw.relay_calls, vec![false, true]);
    assert_eq!(reasons(&rig), vec![(0, HeaterState::On, SwitchReason::FastRecovery)]);
}

#[test]
fn near_setpoint_without_threshold_margin_stays_off() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 21.8);
    rig.run_for(40_000);

    assert_eq!(rig.app.heater_state(), HeaterState::Off);
    assert!(rig.sink.transitions().is_empty());
    assert!(!rig.hw.relay_on());
}

#[test]
fn reaching_setpoint_switches_off_at_next_sample() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 19.0);
    rig.tick();
    rig.hw.temperature_c = 22.5;
    rig.run_for(5_000);

    assert_eq!(
        reasons(&rig),
        vec![
            (0, HeaterState::On, SwitchReason::FastRecovery),
            (5_000, HeaterState::Off, SwitchReason::ReachedSetpoint),
        ]
    );
    assert!(!rig.hw.relay_on());
}

#[test]
fn safety_cutoff_cycles_heater_in_recovery_zone() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 19.0);
    rig.run_for(30_150);

    assert_eq!(
        reasons(&rig),
        vec![
            (0, HeaterState::On, SwitchReason::FastRecovery),
            (30_050, HeaterState::Off, SwitchReason::MaxOnTime),
            (30_100, HeaterState::On, SwitchReason::FastRecovery),
        ]
    );
}

#[test]
fn guard_band_heating_respects_dwell_both_ways() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 21.0);
    rig.run_for(95_000);

    assert_eq!(
        reasons(&rig),
        vec![
            (30_050, HeaterState::On, SwitchReason::BelowThreshold),
            (60_100, HeaterState::Off, SwitchReason::MaxOnTime),
            (90_150, HeaterState::On, SwitchReason::BelowThreshold),
        ]
    );
}

#[test]
fn relay_mirrors_heater_state_after_every_cycle() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 21.0);
    for _ in 0..2_000 {
        rig.tick();
        assert_eq!(rig.hw.relay_on(), rig.app.heater_state().is_on());
    }
}

#[test]
fn stuck_relay_holds_heater_state_until_write_succeeds() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 19.0);
    rig.hw.relay_broken = true;
    rig.run_for(1_000);

    assert_eq!(rig.app.heater_state(), HeaterState::Off);
    assert!(rig.sink.transitions().is_empty());

    rig.hw.relay_broken = false;
    rig.tick();
    assert_eq!(rig.app.heater_state(), HeaterState::On);
    assert!(rig.hw.relay_on());
    assert_eq!(reasons(&rig), vec![(1_000, HeaterState::On, SwitchReason::FastRecovery)]);
}

// ── Sampling ──────────────────────────────────────────────────

#[test]
fn probe_is_sampled_once_per_interval() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 21.0);
    rig.run_for(10_000);

    assert_eq!(rig.hw.probe_requests, 2);
    assert_eq!(rig.app.latest_reading().map(|r| r.taken_at_ms), Some(5_000));
}

// ── Sensor faults ─────────────────────────────────────────────

#[test]
fn disconnected_probe_flows_into_controller_by_default() {
    let mut rig = Rig::boot(ThermostatConfig::default(), -127.0);
    rig.tick();

    assert!(rig.app.sensor_fault());
    assert_eq!(rig.app.heater_state(), HeaterState::On);
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::SensorFault { celsius } if *celsius == -127.0)),
        1
    );
    assert_eq!(rig.display.rows[TextLayout::TEMPERATURE_ROW], "Temp: PROBE FAULT");
}

#[test]
fn freeze_policy_holds_heater_off_on_fault() {
    let config = ThermostatConfig {
        sensor_fault_policy: SensorFaultPolicy::FreezeHeater,
        ..ThermostatConfig::default()
    };
    let mut rig = Rig::boot(config, -127.0);
    rig.run_for(40_000);

    assert_eq!(rig.app.heater_state(), HeaterState::Off);
    assert_eq!(rig.hw.relay_calls, vec![false]);
}

#[test]
fn freeze_policy_resumes_control_on_recovery() {
    let config = ThermostatConfig {
        sensor_fault_policy: SensorFaultPolicy::FreezeHeater,
        ..ThermostatConfig::default()
    };
    let mut rig = Rig::boot(config, 19.0);
    rig.tick();
    assert_eq!(rig.app.heater_state(), HeaterState::On);

    rig.hw.temperature_c = -127.0;
    rig.run_for(40_000);
    assert_eq!(rig.app.heater_state(), HeaterState::On);
    assert_eq!(rig.sink.transitions().len(), 1);

    // The first plausible reading re-enters the controller, which applies
    // the overdue on-time cutoff immediately.
    rig.hw.temperature_c = 21.0;
    rig.run_for(5_000);
    assert!(!rig.app.sensor_fault());
    assert_eq!(
        rig.sink
            .count(|e| matches!(e, AppEvent::SensorRecovered { .. })),
        1
    );
    let last = rig.sink.transitions().last().copied().unwrap();
    assert_eq!(last.to, HeaterState::Off);
    assert_eq!(last.reason, SwitchReason::MaxOnTime);
}

// ── Display refresh ───────────────────────────────────────────

#[test]
fn first_render_draws_every_row() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 21.0);
    rig.tick();

    assert_eq!(rig.display.renders.len(), 1);
    assert_eq!(rig.display.rows[TextLayout::TEMPERATURE_ROW], "Temp: 21.0C");
    assert_eq!(rig.display.rows[TextLayout::HEATER_ROW], "Heater: OFF");
    assert_eq!(rig.display.rows[TextLayout::SETPOINT_ROW], "Set:  22.0C");
    assert_eq!(rig.display.rows[TextLayout::CLOCK_ROW], "Up: 0d 00:00:00");
}

#[test]
fn unchanged_readings_do_not_redraw_temperature() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 21.8);
    rig.run_for(20_000);

    let temperature_redraws = rig.display.renders.iter().filter(|d| d.temperature).count();
    assert_eq!(temperature_redraws, 1);

    rig.hw.temperature_c = 21.9;
    rig.run_for(5_000);
    let temperature_redraws = rig.display.renders.iter().filter(|d| d.temperature).count();
    assert_eq!(temperature_redraws, 2);
    assert_eq!(rig.display.rows[TextLayout::TEMPERATURE_ROW], "Temp: 21.9C");
}

#[test]
fn idle_cycles_only_redraw_the_clock() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 21.8);
    rig.tick();
    let before = rig.display.renders.len();

    // 950 ms of cycles inside the first second: nothing changes.
    rig.run_for(950);
    assert_eq!(rig.display.renders.len(), before);

    rig.tick();
    let last = rig.display.renders.last().copied().unwrap();
    assert!(last.clock);
    assert!(!last.temperature && !last.heater && !last.setpoint);
    assert_eq!(rig.display.rows[TextLayout::CLOCK_ROW], "Up: 0d 00:00:01");
}

#[test]
fn heater_switch_marks_heater_row_dirty() {
    let mut rig = Rig::boot(ThermostatConfig::default(), 19.0);
    rig.tick();
    assert_eq!(rig.display.rows[TextLayout::HEATER_ROW], "Heater: ON");
}
