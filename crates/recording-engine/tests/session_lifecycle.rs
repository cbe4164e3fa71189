//! Session lifecycle scenarios driven through the public API.

use heatlens_common::config::{HeatShape, HeatmapConfig};
use heatlens_common::error::{HeatError, HeatResult};
use heatlens_processing_core::pixel::PixelBuffer;
use heatlens_project_model::event::{InteractionEvent, LayoutUpdate};
use heatlens_recording_engine::{HeatmapSession, SessionState, TickOutcome};
use heatlens_render_engine::Surface;

/// Surface that counts render calls and can be switched off.
struct CountingSurface {
    buffer: PixelBuffer,
    acquired: usize,
    available: bool,
}

impl CountingSurface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height),
            acquired: 0,
            available: true,
        }
    }
}

impl Surface for CountingSurface {
    fn acquire(&mut self) -> HeatResult<&mut PixelBuffer> {
        if !self.available {
            return Err(HeatError::surface_unavailable("context lost"));
        }
        self.acquired += 1;
        Ok(&mut self.buffer)
    }
}

fn config() -> HeatmapConfig {
    HeatmapConfig {
        max_cols: 10,
        max_rows: 10,
        cell_height: 20.0,
        idle_ms: 2000,
        draw_interval_ms: 100,
        ..HeatmapConfig::default()
    }
}

fn started() -> HeatmapSession {
    let mut session = HeatmapSession::new(config()).unwrap();
    session.start(&LayoutUpdate::new(200.0, 200.0), 0).unwrap();
    session
}

#[test]
fn idle_window_suppresses_draws_until_next_event() {
    let mut session = started();
    let mut surface = CountingSurface::new(200, 200);

    session.handle_event(&InteractionEvent::new(25.0, 25.0, 0));
    let mut now = 100;
    while now <= 2000 {
        assert!(matches!(
            session.tick(now, &mut surface).unwrap(),
            TickOutcome::Rendered(_)
        ));
        now += 100;
    }
    let draws = surface.acquired;
    assert_eq!(draws, 20);

    // 2100ms without events: no render call.
    assert_eq!(session.tick(2100, &mut surface).unwrap(), TickOutcome::Idle);
    assert_eq!(session.tick(2200, &mut surface).unwrap(), TickOutcome::Idle);
    assert_eq!(surface.acquired, draws);
    assert_eq!(session.state(), SessionState::Paused);
    assert_eq!(session.stats().skipped_idle, 2);

    // The next event wakes the session; the next tick draws again.
    session.handle_event(&InteractionEvent::new(25.0, 25.0, 2250));
    assert_eq!(session.state(), SessionState::Recording);
    assert!(matches!(
        session.tick(2300, &mut surface).unwrap(),
        TickOutcome::Rendered(_)
    ));
    assert_eq!(surface.acquired, draws + 1);
}

#[test]
fn events_are_counted_while_paused() {
    let mut session = started();
    let mut surface = CountingSurface::new(200, 200);

    assert_eq!(session.tick(2500, &mut surface).unwrap(), TickOutcome::Idle);
    assert_eq!(session.state(), SessionState::Paused);

    assert!(session.handle_event(&InteractionEvent::new(5.0, 5.0, 2600)));
    assert_eq!(session.grid().unwrap().cell(0, 0), Some(1.0));
}

#[test]
fn unavailable_surface_does_not_end_session() {
    let mut session = started();
    let mut surface = CountingSurface::new(200, 200);
    session.handle_event(&InteractionEvent::new(25.0, 25.0, 0));

    surface.available = false;
    assert_eq!(
        session.tick(100, &mut surface).unwrap(),
        TickOutcome::SurfaceUnavailable
    );
    assert_eq!(session.state(), SessionState::Recording);
    assert_eq!(session.stats().surface_failures, 1);

    surface.available = true;
    assert!(matches!(
        session.tick(150, &mut surface).unwrap(),
        TickOutcome::Rendered(_)
    ));
    assert_eq!(session.stats().draws, 1);
    assert!(!surface.buffer.is_transparent());
}

#[test]
fn resize_keeps_recording_and_counts() {
    let mut session = HeatmapSession::new(config()).unwrap();
    session.start(&LayoutUpdate::new(200.0, 100.0), 0).unwrap();
    assert_eq!(session.grid().unwrap().rows(), 5);
    let mut surface = CountingSurface::new(400, 400);
    for _ in 0..3 {
        session.handle_event(&InteractionEvent::new(25.0, 25.0, 10));
    }

    // Taller document: more rows, same columns.
    session.resize(&LayoutUpdate::new(200.0, 400.0)).unwrap();
    let grid = session.grid().unwrap();
    assert_eq!((grid.cols(), grid.rows()), (10, 10));

    // Wider viewport: cells widen, counts keep their (row, col) address.
    session.resize(&LayoutUpdate::new(400.0, 400.0)).unwrap();
    let grid = session.grid().unwrap();
    assert_eq!(grid.cell_width(), 40.0);
    assert_eq!(grid.cell(1, 1), Some(3.0));
    assert_eq!(session.state(), SessionState::Recording);

    assert!(session.handle_event(&InteractionEvent::new(395.0, 5.0, 20)));
    assert!(matches!(
        session.tick(100, &mut surface).unwrap(),
        TickOutcome::Rendered(_)
    ));
    assert_eq!(session.stop().unwrap().total_interactions(), 4.0);
}

#[test]
fn stop_then_tick_never_touches_the_surface() {
    let mut session = started();
    let mut surface = CountingSurface::new(200, 200);
    session.handle_event(&InteractionEvent::new(25.0, 25.0, 0));
    session.stop().unwrap();

    assert_eq!(
        session.tick(100, &mut surface).unwrap(),
        TickOutcome::NotRecording
    );
    assert_eq!(surface.acquired, 0);
}

#[test]
fn flat_and_gradient_modes_both_draw() {
    for shape in [HeatShape::FlatCircle, HeatShape::FlatRect, HeatShape::GradientBlur] {
        let mut session = HeatmapSession::new(HeatmapConfig {
            shape,
            ..config()
        })
        .unwrap();
        session.start(&LayoutUpdate::new(200.0, 200.0), 0).unwrap();
        session.handle_event(&InteractionEvent::new(25.0, 25.0, 0));

        let mut surface = CountingSurface::new(200, 200);
        match session.tick(0, &mut surface).unwrap() {
            TickOutcome::Rendered(stats) => {
                assert_eq!(stats.shape, shape);
                assert_eq!(stats.cells_drawn, 1);
            }
            other => panic!("{shape}: unexpected outcome {other:?}"),
        }
        assert!(!surface.buffer.is_transparent(), "{shape}");
    }
}
