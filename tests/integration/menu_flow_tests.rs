//! Menu flows that reach past the settings store: the activity log pager,
//! log clearing, the About screen, and the NVS-backed log end to end.

use super::controller_tests::Rig;
use super::mock_hw::{HwCall, LogSink, MockHardware};

use superlights::adapters::event_log::NvsEventLog;
use superlights::adapters::nvs::NvsAdapter;
use superlights::app::commands::ButtonId::{Back, Down, Enter, Up};
use superlights::app::commands::ControlInput;
use superlights::app::events::AppEvent;
use superlights::app::ports::EventLogPort;
use superlights::app::service::LightController;
use superlights::config::SystemConfig;
use superlights::menu::Mode;

fn screen(rig: &Rig) -> (String, String) {
    rig.hw.screen()
}

#[test]
fn view_log_pages_header_then_entries() {
    let mut rig = Rig::start();
    rig.press(&[Down, Enter, Enter]);
    assert!(matches!(rig.ctl.menu().mode(), Mode::Paging(_)));
    assert_eq!(
        screen(&rig),
        ("Log 64/16384B".into(), "time: 00:00:00 -".into())
    );

    rig.press(&[Down, Down]);
    assert_eq!(screen(&rig).0, " Power on");
    // Already on the last line.
    rig.press(&[Down]);
    assert_eq!(screen(&rig), (" Power on".into(), String::new()));
    rig.press(&[Up]);
    assert_eq!(screen(&rig).0, "time: 00:00:00 -");

    rig.press(&[Enter]);
    assert!(rig.ctl.menu().is_browsing());
    assert_eq!(screen(&rig), ("View log".into(), "Clear log".into()));
}

#[test]
fn clear_log_empties_and_rearms_full_warning() {
    let mut rig = Rig::start();
    rig.log.capacity = 1;
    rig.press(&[Enter, Enter, Enter]);
    assert!(rig.sink.contains(&AppEvent::ActivityLogFull));

    // Light settings → Settings → Main → Activity log → Clear log.
    rig.press(&[Back, Back, Down, Enter, Down, Enter]);
    assert!(rig.log.lines.is_empty());
    assert!(rig.sink.contains(&AppEvent::ActivityLogCleared));
    assert_eq!(rig.ctl.notifier().dropped(), 0);

    rig.press(&[Up, Enter]);
    assert_eq!(screen(&rig), ("Log 0/64B".into(), "(empty)".into()));
    rig.press(&[Back]);

    // Back to the light toggle; one line fits, the second reports full again.
    rig.press(&[Back, Enter, Enter, Enter, Enter]);
    let full = rig
        .sink
        .events
        .iter()
        .filter(|e| **e == AppEvent::ActivityLogFull)
        .count();
    assert_eq!(full, 2);
    assert_eq!(rig.log.events(), ["Light OFF"]);
}

#[test]
fn about_pager_opens_and_closes() {
    let mut rig = Rig::start();
    rig.press(&[Down, Down, Enter]);
    assert_eq!(
        screen(&rig),
        ("Super Lights 1.0".into(), "By: Alzner".into())
    );
    assert!(rig.hw.calls.contains(&HwCall::CursorOff));

    rig.hw.clear_calls();
    rig.press(&[Back]);
    assert!(rig.ctl.menu().is_browsing());
    assert_eq!(
        rig.hw.calls[..2],
        [HwCall::CursorOn, HwCall::Clear],
        "closing an overlay re-enables the cursor and clears the panel"
    );
    // Scroll position survives the overlay.
    assert_eq!(screen(&rig), ("Activity log".into(), "About".into()));
    assert_eq!(rig.ctl.menu().cursor_row(), 2);
}

#[test]
fn live_rows_follow_light_state() {
    let mut rig = Rig::start();
    rig.press(&[Enter, Enter]);
    assert_eq!(screen(&rig), ("Light: Off".into(), "Brightness: 50%".into()));

    // Motion switches the light while the row is visible.
    rig.ir(true, 14);
    assert_eq!(screen(&rig).0, "Light: On");
}

#[test]
fn back_at_root_is_a_redraw() {
    let mut rig = Rig::start();
    rig.hw.clear_calls();
    rig.press(&[Back]);
    assert_eq!(rig.ctl.menu().stack_depth(), 0);
    assert!(matches!(rig.hw.calls[0], HwCall::Render(..)));
}

#[test]
fn nvs_backed_log_records_power_on_and_edges() {
    let nvs = NvsAdapter::new().expect("host nvs");
    let mut log = NvsEventLog::open(nvs, 8);
    let mut hw = MockHardware::new();
    let mut sink = LogSink::new();
    let mut ctl = LightController::new(&SystemConfig::default());

    ctl.start(0, &mut hw, &mut log, &mut sink);
    for button in [Enter, Enter, Enter] {
        ctl.handle(
            ControlInput::Button(button),
            61_000,
            &mut hw,
            &mut log,
            &mut sink,
        );
    }

    assert_eq!(
        log.read_all(),
        ["time: 00:00:00 - Power on", "time: 00:01:01 - Light ON"]
    );
    assert_eq!(log.usage(), (128, 512));
}
