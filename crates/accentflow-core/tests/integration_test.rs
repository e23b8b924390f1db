// AccentFlow Integration Tests
//
// Config file -> mapping table -> pipeline -> sink, with a scripted source.
//
// Run with: cargo test --test integration_test

use std::sync::atomic::AtomicBool;

use accentflow_core::feedback::RecordingFeedback;
use accentflow_core::output::{KeyStroke, MemorySink};
use accentflow_core::{
    default_config_content, AccentError, Action, Config, DisplayMode, EventRouter, Key, Pipeline,
    RawEvent, ReplaySource,
};

fn press(key: Key) -> RawEvent {
    RawEvent::key(key, Action::Press)
}

fn release(key: Key) -> RawEvent {
    RawEvent::key(key, Action::Release)
}

fn with_syn(events: &[RawEvent]) -> Vec<RawEvent> {
    events
        .iter()
        .flat_map(|&event| [event, RawEvent::syn_report()])
        .collect()
}

#[test]
fn test_default_config_drives_pipeline() {
    let config = Config::from_toml_str(default_config_content()).unwrap();
    let events = with_syn(&[
        press(Key::A),
        release(Key::A),
        press(config.trigger),
        press(Key::E),
        release(Key::E),
        press(Key::E),
        release(Key::E),
        release(config.trigger),
        press(Key::SPACE),
        release(Key::SPACE),
    ]);

    let router = EventRouter::new(&config.mappings, MemorySink::new(), RecordingFeedback::new())
        .with_trigger(config.trigger)
        .with_unicode_keys(config.unicode);
    let mut pipeline = Pipeline::new(ReplaySource::new(events), router);
    let stats = pipeline.run(&AtomicBool::new(true)).unwrap();

    assert_eq!(stats.events, 20);
    assert_eq!(stats.committed, 1);
    assert_eq!(stats.previews, 2);

    let (_, sink, feedback) = pipeline.into_parts();
    assert_eq!(feedback.committed(), vec!["è"]);

    // Pass-through keys and every SYN survive, in order.
    let forwarded = sink.forwarded();
    let keys: Vec<RawEvent> = forwarded.iter().copied().filter(RawEvent::is_key).collect();
    assert_eq!(
        keys,
        vec![press(Key::A), release(Key::A), press(Key::SPACE), release(Key::SPACE)]
    );
    assert_eq!(forwarded.len(), 4 + 10);

    // è is U+00E8.
    let strokes = sink.strokes();
    assert_eq!(strokes.len(), 6 + 2 * 3);
    assert_eq!(strokes[6], KeyStroke::press(Key::E));
    assert_eq!(strokes[8], KeyStroke::press(Key(9)));
}

#[test]
fn test_shifted_composition_uses_uppercase_table() {
    let config = Config::from_toml_str(default_config_content()).unwrap();
    let events = vec![
        press(Key::RIGHT_SHIFT),
        press(Key::RIGHT_ALT),
        press(Key::E),
        release(Key::E),
        release(Key::RIGHT_ALT),
        release(Key::RIGHT_SHIFT),
    ];

    let router = EventRouter::new(&config.mappings, MemorySink::new(), RecordingFeedback::new());
    let mut pipeline = Pipeline::new(ReplaySource::new(events), router);
    pipeline.run(&AtomicBool::new(true)).unwrap();

    let (_, sink, feedback) = pipeline.into_parts();
    assert_eq!(feedback.committed(), vec!["É"]);
    assert_eq!(
        sink.forwarded(),
        vec![press(Key::RIGHT_SHIFT), release(Key::RIGHT_SHIFT)]
    );

    // Shift must be up while the hex digits are typed, then down again.
    let strokes = sink.strokes();
    assert_eq!(strokes.first(), Some(&KeyStroke::release(Key::RIGHT_SHIFT)));
    assert_eq!(strokes.last(), Some(&KeyStroke::press(Key::RIGHT_SHIFT)));
    assert!(strokes.contains(&KeyStroke::release(Key::RIGHT_SHIFT)));
}

#[test]
fn test_custom_trigger_from_config() {
    let config = Config::from_toml_str(
        r#"
[general]
trigger_key = "LEFT_ALT"
display_mode = "log"

[mappings]
n = ["ñ"]
"#,
    )
    .unwrap();
    assert_eq!(config.display_mode, DisplayMode::Log);

    let key_n = Key(49);
    let events = vec![
        press(Key::RIGHT_ALT),
        release(Key::RIGHT_ALT),
        press(Key::LEFT_ALT),
        press(key_n),
        release(key_n),
        release(Key::LEFT_ALT),
    ];
    let router = EventRouter::new(&config.mappings, MemorySink::new(), RecordingFeedback::new())
        .with_trigger(config.trigger);
    let mut pipeline = Pipeline::new(ReplaySource::new(events), router);
    let stats = pipeline.run(&AtomicBool::new(true)).unwrap();

    assert_eq!(stats.forwarded, 2);
    assert_eq!(stats.committed, 1);
}

#[test]
fn test_sink_failure_ends_run() {
    let config = Config::from_toml_str(default_config_content()).unwrap();
    let events = vec![
        press(Key::A),
        press(Key::RIGHT_ALT),
        press(Key::E),
        release(Key::RIGHT_ALT),
        press(Key::SPACE),
    ];

    let router = EventRouter::new(
        &config.mappings,
        MemorySink::failing_after(2),
        RecordingFeedback::new(),
    );
    let mut pipeline = Pipeline::new(ReplaySource::new(events), router);
    let err = pipeline.run(&AtomicBool::new(true)).unwrap_err();
    assert!(matches!(err, AccentError::Injection(_)));

    let (source, sink, _) = pipeline.into_parts();
    assert_eq!(source.remaining(), 1);
    assert_eq!(sink.forwarded(), vec![press(Key::A)]);
}

#[cfg(feature = "pure-rust")]
mod devices {
    use accentflow_core::{EvdevSource, OutputError, VirtualDevice};

    #[test]
    fn test_list_keyboards_without_permissions() {
        // Unreadable device nodes are skipped, not reported as errors.
        if let Ok(devices) = EvdevSource::list_keyboards() {
            for device in devices {
                assert!(!device.name.starts_with("AccentFlow (virtual)"));
            }
        }
    }

    #[test]
    fn test_virtual_device_lifecycle() {
        match VirtualDevice::new() {
            Ok(device) => device.close().unwrap(),
            Err(OutputError::DeviceCreation(e)) => {
                println!("Skipping test: cannot create uinput device: {}", e);
            }
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }
}
