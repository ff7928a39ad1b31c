//! End-to-end engine behavior through the headless sink.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use panelfx_core::{EngineConfig, FixedClock, LocalTime, ModeTag};
use panelfx_render::{FontSize, HeadlessSink, MonoFontRenderer, PixelBuffer, Rgb, TextRenderer};
use panelfx_runtime::{CountedTicker, Engine, Runtime, RuntimeError};

fn config(width: u16, height: u16) -> EngineConfig {
    EngineConfig {
        width,
        height,
        seed: Some(42),
        ..EngineConfig::default()
    }
}

fn engine(width: u16, height: u16) -> Engine<HeadlessSink> {
    Engine::new(&config(width, height), HeadlessSink::new(width, height))
        .with_clock(Arc::new(FixedClock::new(LocalTime::new(12, 0, 0))))
}

/// A font that panics while armed.
struct TrapFont {
    armed: Arc<AtomicBool>,
    inner: MonoFontRenderer,
}

impl TextRenderer for TrapFont {
    fn measure_text(&self, text: &str) -> u32 {
        self.inner.measure_text(text)
    }

    fn line_height(&self) -> u32 {
        self.inner.line_height()
    }

    fn draw_text(&self, buf: &mut PixelBuffer, text: &str, x: i32, y: i32, color: Rgb) {
        if self.armed.load(Ordering::SeqCst) {
            panic!("font trap");
        }
        self.inner.draw_text(buf, text, x, y, color);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Mode switching
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn rainbow_then_off_clears_frame() {
    let mut engine = engine(32, 32);
    let control = engine.control();
    control.set_mode(ModeTag::Rainbow);
    for _ in 0..5 {
        engine.tick();
    }
    assert!(engine.sink().last_frame().lit_pixels() > 0);

    control.set_mode(ModeTag::Off);
    let report = engine.tick();
    assert_eq!(report.mode, ModeTag::Off);
    assert_eq!(report.frame, 6);
    assert!(engine.sink().last_frame().is_cleared());
}

#[test]
fn reselecting_mode_keeps_state() {
    let mut engine = engine(32, 32);
    let control = engine.control();
    control.set_mode(ModeTag::Life);
    for _ in 0..20 {
        engine.tick();
    }
    let generation = engine.generators().life.generation();
    assert!(generation > 0);

    control.set_mode(ModeTag::Life);
    engine.tick();
    assert!(engine.generators().life.generation() >= generation);
    assert_eq!(engine.generators().life.width(), 32);
}

#[test]
fn state_survives_other_modes() {
    let mut engine = engine(32, 32);
    let control = engine.control();
    control.set_mode(ModeTag::Life);
    for _ in 0..10 {
        engine.tick();
    }
    let generation = engine.generators().life.generation();

    control.set_mode(ModeTag::Plasma);
    for _ in 0..3 {
        engine.tick();
    }
    control.set_mode(ModeTag::Life);
    engine.tick();
    assert!(engine.generators().life.generation() >= generation);
}

#[test]
fn writes_land_on_next_tick() {
    let mut engine = engine(64, 16);
    let control = engine.control();
    control.set_text("HI");
    assert_eq!(engine.status().mode, ModeTag::Clock);
    engine.tick();
    assert_eq!(engine.status().mode, ModeTag::Text);
    let frame = engine.sink().last_frame();
    assert!(frame.iter().any(|(_, _, c)| c == Rgb::GREEN));
}

// ═════════════════════════════════════════════════════════════════════════
// Failure isolation
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn generator_panic_is_contained() {
    let armed = Arc::new(AtomicBool::new(false));
    let font = TrapFont {
        armed: armed.clone(),
        inner: MonoFontRenderer::new(FontSize::Small),
    };
    let mut engine = engine(32, 32).with_font(Box::new(font));
    let control = engine.control();

    control.set_mode(ModeTag::Life);
    for _ in 0..10 {
        engine.tick();
    }
    let generation = engine.generators().life.generation();

    armed.store(true, Ordering::SeqCst);
    control.set_mode(ModeTag::Text);
    let report = engine.tick();
    assert!(report.panicked);
    assert!(report.committed);
    assert!(engine.sink().last_frame().is_cleared());

    // Scheduling continues and the other generators are untouched.
    armed.store(false, Ordering::SeqCst);
    let report = engine.tick();
    assert!(!report.panicked);
    assert!(engine.sink().last_frame().lit_pixels() > 0);
    control.set_mode(ModeTag::Life);
    engine.tick();
    assert!(engine.generators().life.generation() >= generation);
}

// ═════════════════════════════════════════════════════════════════════════
// Lifecycle
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn stop_leaves_sink_cleared() {
    let mut runtime = Runtime::new(engine(16, 16), Duration::from_millis(5));
    runtime.control().set_mode(ModeTag::Rainbow);
    runtime.start().unwrap();
    thread::sleep(Duration::from_millis(30));
    runtime.stop();
    assert!(!runtime.is_running());

    let (cleared, frame) =
        runtime.with_engine(|e| (e.sink().last_frame().is_cleared(), e.frame()));
    assert!(cleared);
    assert!(frame > 0);

    // No tick lands after stop.
    thread::sleep(Duration::from_millis(20));
    assert_eq!(runtime.with_engine(|e| e.frame()), frame);
    runtime.stop();
}

#[test]
fn restart_does_not_duplicate_loops() {
    let mut runtime = Runtime::new(engine(16, 16), Duration::from_millis(20));
    runtime.start().unwrap();
    runtime.start().unwrap();
    runtime.start().unwrap();
    assert!(runtime.is_running());
    thread::sleep(Duration::from_millis(110));
    runtime.stop();
    // One loop at 50 Hz for ~110 ms runs about 6 ticks, plus one immediate
    // tick from each replaced loop. Three live loops would land near 18.
    let frames = runtime.with_engine(|e| e.frame());
    assert!((1..=12).contains(&frames), "frames = {frames}");
}

#[test]
fn counted_ticks_are_sequential() {
    let mut runtime = Runtime::new(engine(16, 16), Duration::from_millis(100));
    runtime.control().set_mode(ModeTag::Fire);
    runtime.start_with(Box::new(CountedTicker::new(25))).unwrap();
    assert_eq!(runtime.wait(), 25);
    let status = runtime.status();
    assert_eq!(status.frame, 25);
    assert_eq!(status.mode, ModeTag::Fire);
    assert!(!status.running);
}

#[test]
fn shutdown_is_final() {
    let mut runtime = Runtime::new(engine(16, 16), Duration::from_millis(5));
    runtime.start().unwrap();
    runtime.shutdown();
    assert!(matches!(runtime.start(), Err(RuntimeError::ShutDown)));
    assert!(runtime.with_engine(|e| e.sink().last_frame().is_cleared()));
}
