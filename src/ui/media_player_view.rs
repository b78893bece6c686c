// SPDX-License-Identifier: MPL-2.0
//! The media player view.
//!
//! Composes the playback state machine, the layout engine, input routing and
//! the hosted video surface into one view driven by a [`PlaybackService`]
//! and embedded in a [`ViewHost`].
//!
//! # Ownership
//!
//! Mutable view state lives in a `Rc<RefCell<ViewCore>>`. The status loop
//! only holds a `Weak` to it, so dropping the view (which also aborts the
//! loop) leaves nothing for a late response to touch.

use crate::application::port::{ChildKey, PlaybackService, SurfaceHandle, ViewHost};
use crate::config::Config;
use crate::domain::playback::{Metadata, PlaybackState, PlayerStatus, StatusVersion};
use crate::error::Result;
use crate::ui::child_view::{ChildViewLifecycle, ChildViewState};
use crate::ui::controls::{paint_controls, ControlsCanvas, ControlsPalette};
use crate::ui::input::{InputAction, InputEvent, InputRouter, KeyBindings};
use crate::ui::layout::{Geometry, LayoutEngine, LayoutMetrics};
use crate::ui::widgets::ControlsSurface;
use crate::video_player::{
    spawn_status_loop, Clock, FrameRateMeter, MonotonicClock, PlaybackStateMachine,
    StatusLoopHandle, StatusSink,
};
use iced_core::{Color, Size};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// State shared between the view and its status loop.
struct ViewCore<H> {
    host: H,
    clock: Rc<dyn Clock>,
    playback: PlaybackStateMachine,
    layout: LayoutEngine,
    container: Option<Size>,
    geometry: Option<Geometry>,
    child: ChildViewLifecycle,
    frame_rate: FrameRateMeter,
    frame_rate_log_interval: Duration,
    palette: ControlsPalette,
    status_version: StatusVersion,
}

impl<H: ViewHost> ViewCore<H> {
    /// Recomputes geometry once the container size is known, updates the
    /// hosted surface and requests a redraw.
    fn relayout(&mut self) {
        if let Some(container) = self.container {
            self.layout_in(container);
        }
        self.host.invalidate_scene();
    }

    fn layout_in(&mut self, container: Size) {
        let pass = self.layout.layout(
            container,
            self.playback.video_size(),
            self.playback.pixel_aspect_ratio(),
        );
        self.geometry = Some(pass.geometry);

        if self.child.has_surface() {
            let key = self.child.key();
            if let Some(size) = pass.child_size {
                self.host.set_child_properties(key, size);
            }
            self.host.set_child_origin(key, pass.geometry.content_rect.position());
        }
    }

    fn progress(&self) -> f32 {
        self.playback.progress_at(self.clock.now())
    }
}

impl<H: ViewHost> StatusSink for ViewCore<H> {
    fn on_status(&mut self, version: StatusVersion, status: Option<PlayerStatus>) {
        self.status_version = version;
        let Some(status) = status else {
            return;
        };

        let effects = self.playback.apply_status(status);
        if effects.state_changed {
            log::debug!(
                "Playback {:?} -> {:?}",
                self.playback.previous_state(),
                self.playback.state()
            );
        }

        if effects.video_size_changed {
            self.relayout();
        } else {
            self.host.invalidate_scene();
        }
    }
}

/// A video view with a play/pause button and a seekable progress bar.
pub struct MediaPlayerView<S, H>
where
    S: PlaybackService + 'static,
    H: ViewHost + 'static,
{
    core: Rc<RefCell<ViewCore<H>>>,
    service: Rc<S>,
    router: InputRouter,
    url: Option<String>,
    status_loop: Option<StatusLoopHandle>,
}

impl<S, H> MediaPlayerView<S, H>
where
    S: PlaybackService + 'static,
    H: ViewHost + 'static,
{
    pub fn new(service: Rc<S>, host: H, config: &Config) -> Self {
        let clock: Rc<dyn Clock> = Rc::new(MonotonicClock);
        let frame_rate_log_interval =
            Duration::from_secs(u64::from(config.frame_rate_log_interval_secs));

        let core = ViewCore {
            host,
            frame_rate: FrameRateMeter::new(clock.now(), frame_rate_log_interval),
            clock,
            playback: PlaybackStateMachine::new(),
            layout: LayoutEngine::new(LayoutMetrics::from(&config.layout)),
            container: None,
            geometry: None,
            child: ChildViewLifecycle::new(ChildKey::VIDEO),
            frame_rate_log_interval,
            palette: ControlsPalette::from(&config.colors),
            status_version: StatusVersion::INITIAL,
        };

        Self {
            core: Rc::new(RefCell::new(core)),
            service,
            router: InputRouter::new(KeyBindings::from(&config.keys)),
            url: config.url.clone(),
            status_loop: None,
        }
    }

    /// Replaces the reference clock used for progress and frame timing.
    #[must_use]
    pub fn with_clock(self, clock: Rc<dyn Clock>) -> Self {
        {
            let mut core = self.core.borrow_mut();
            core.frame_rate = FrameRateMeter::new(clock.now(), core.frame_rate_log_interval);
            core.clock = clock;
        }
        self
    }

    /// Loads the configured media, registers the video surface and starts
    /// listening for status updates.
    ///
    /// The media is paused right after loading so the first frame shows
    /// without playback starting. Calling this again while the status loop
    /// runs only re-sends the media commands.
    ///
    /// # Errors
    ///
    /// Returns an error if a command cannot be queued on the service.
    ///
    /// # Panics
    ///
    /// Panics if called outside a [`tokio::task::LocalSet`].
    pub fn start(&mut self, surface: Option<SurfaceHandle>) -> Result<()> {
        if let Some(url) = &self.url {
            self.service.set_url(url)?;
            self.service.pause()?;
        }

        if let Some(handle) = surface {
            let core = &mut *self.core.borrow_mut();
            core.child.register(&mut core.host, handle);
            core.layout.reset_child_size();
            core.relayout();
        }

        if self
            .status_loop
            .as_ref()
            .is_none_or(StatusLoopHandle::is_finished)
        {
            self.status_loop = Some(spawn_status_loop(
                Rc::clone(&self.service),
                Rc::downgrade(&self.core),
            ));
        }
        Ok(())
    }

    /// Lays the view out for a new container size.
    pub fn set_container_size(&mut self, size: Size) {
        let mut core = self.core.borrow_mut();
        core.container = Some(size);
        core.relayout();
    }

    /// Handles an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let outcome = {
            let core = self.core.borrow();
            self.router.route(&event, core.geometry.as_ref(), &core.playback)
        };

        for action in outcome.actions {
            match action {
                InputAction::Command(command) => {
                    if let Err(err) = self.service.submit(&command) {
                        log::warn!("Dropped {command:?}: {err}");
                    }
                }
                InputAction::Quit => self.core.borrow_mut().host.request_quit(),
            }
        }

        outcome.handled
    }

    /// The host attached the child registered under `key`.
    pub fn on_child_attached(&mut self, key: ChildKey) {
        let core = &mut *self.core.borrow_mut();
        if core.child.on_attached(&mut core.host, key) {
            core.relayout();
        }
    }

    /// The surface registered under `key` went away.
    pub fn on_child_unavailable(&mut self, key: ChildKey) {
        let core = &mut *self.core.borrow_mut();
        if core.child.on_unavailable(&mut core.host, key) {
            core.layout.reset_child_size();
            core.relayout();
        }
    }

    /// Records a presented frame.
    ///
    /// Returns true while playing, meaning the host should schedule another
    /// frame so the progress bar keeps moving.
    pub fn on_frame(&mut self) -> bool {
        let mut core = self.core.borrow_mut();
        let now = core.clock.now();
        let crossed_period = core.frame_rate.record_frame(now);
        let playing = core.playback.state().is_playing();

        if playing && crossed_period {
            log::debug!("frame rate {:.1} fps", core.frame_rate.frame_rate());
        }
        playing
    }

    /// Paints the controls bar. Returns false if no layout happened yet.
    pub fn draw_controls<C: ControlsCanvas + ?Sized>(&self, canvas: &mut C) -> bool {
        let core = self.core.borrow();
        let Some(geometry) = core.geometry else {
            return false;
        };

        paint_controls(
            canvas,
            geometry.controls_rect.size(),
            core.layout.metrics(),
            &core.palette,
            core.playback.state(),
            core.progress(),
        );
        true
    }

    /// Paints the controls into `surface` at the given device scale and
    /// publishes the result.
    pub fn paint(&self, surface: &mut ControlsSurface, scale_x: f32, scale_y: f32) -> bool {
        let Some(controls) = self.geometry().map(|g| g.controls_rect) else {
            return false;
        };
        let Some(mut canvas) =
            surface.acquire_canvas(controls.width, controls.height, scale_x, scale_y)
        else {
            return false;
        };

        let painted = self.draw_controls(&mut canvas);
        drop(canvas);
        surface.release_and_swap();
        painted
    }

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.core.borrow().playback.state()
    }

    /// Played fraction of the media, extrapolated to the current time.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.core.borrow().progress()
    }

    #[must_use]
    pub fn geometry(&self) -> Option<Geometry> {
        self.core.borrow().geometry
    }

    #[must_use]
    pub fn metadata(&self) -> Option<Metadata> {
        self.core.borrow().playback.metadata().cloned()
    }

    /// Last status version received from the service.
    #[must_use]
    pub fn status_version(&self) -> StatusVersion {
        self.core.borrow().status_version
    }

    #[must_use]
    pub fn frame_rate(&self) -> f32 {
        self.core.borrow().frame_rate.frame_rate()
    }

    #[must_use]
    pub fn child_state(&self) -> ChildViewState {
        self.core.borrow().child.state()
    }

    /// Color filling [`Geometry::view_rect`].
    #[must_use]
    pub fn background_color(&self) -> Color {
        self.core.borrow().palette.background
    }

    /// Whether status updates are still being received.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.status_loop
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::playback::{
        PixelAspectRatio, PlayerCommand, Problem, TimelineTransform, VideoSize,
    };
    use crate::test_utils::{HostCall, RecordingHost, RecordingService, F32_EPSILON};
    use crate::ui::controls::{DrawCommand, DrawList};
    use crate::ui::input::{KeyboardEvent, PointerEvent};
    use crate::video_player::ManualClock;
    use iced_core::{Point, Rectangle};

    const SECOND: i64 = 1_000_000_000;

    type TestView = MediaPlayerView<RecordingService, Rc<RefCell<RecordingHost>>>;

    struct Fixture {
        view: TestView,
        service: Rc<RecordingService>,
        host: Rc<RefCell<RecordingHost>>,
        clock: Rc<ManualClock>,
    }

    fn fixture(config: &Config) -> Fixture {
        let service = Rc::new(RecordingService::default());
        let host = Rc::new(RefCell::new(RecordingHost::default()));
        let clock = Rc::new(ManualClock::new(0));
        let view = MediaPlayerView::new(Rc::clone(&service), Rc::clone(&host), config)
            .with_clock(clock.clone());
        Fixture {
            view,
            service,
            host,
            clock,
        }
    }

    fn push_status(view: &TestView, version: u64, status: PlayerStatus) {
        view.core
            .borrow_mut()
            .on_status(StatusVersion::new(version), Some(status));
    }

    fn playing(duration: u64) -> PlayerStatus {
        PlayerStatus {
            timeline_transform: Some(TimelineTransform {
                reference_time: 0,
                subject_time: 0,
                reference_delta: 1,
                subject_delta: 1,
            }),
            video_size: Some(VideoSize::new(640, 480)),
            pixel_aspect_ratio: Some(PixelAspectRatio::SQUARE),
            metadata: Some(Metadata::with_duration(duration)),
            ..PlayerStatus::default()
        }
    }

    fn paused_at(position: i64, duration: u64) -> PlayerStatus {
        PlayerStatus {
            timeline_transform: Some(TimelineTransform {
                reference_time: 0,
                subject_time: position,
                reference_delta: 1,
                subject_delta: 0,
            }),
            ..playing(duration)
        }
    }

    fn started(config: &Config, surface: Option<SurfaceHandle>) -> Fixture {
        let mut fixture = fixture(config);
        let local = tokio::task::LocalSet::new();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        local.block_on(&runtime, async {
            fixture.view.start(surface).expect("start");
            tokio::task::yield_now().await;
        });
        fixture
    }

    #[test]
    fn start_loads_media_paused_and_polls() {
        let config = Config {
            url: Some("file:///clip.mp4".to_string()),
            ..Config::default()
        };
        let fixture = started(&config, None);

        assert_eq!(
            fixture.service.take_commands(),
            vec![
                PlayerCommand::SetUrl("file:///clip.mp4".to_string()),
                PlayerCommand::Pause
            ]
        );
        assert_eq!(
            *fixture.service.status_requests.borrow(),
            vec![StatusVersion::INITIAL]
        );
    }

    #[test]
    fn start_without_url_sends_nothing() {
        let fixture = started(&Config::default(), None);
        assert!(fixture.service.take_commands().is_empty());
        assert_eq!(fixture.view.child_state(), ChildViewState::Absent);
    }

    #[test]
    fn start_registers_surface_and_sizes_it_after_layout() {
        let mut fixture = started(&Config::default(), Some(SurfaceHandle(3)));
        assert_eq!(fixture.view.child_state(), ChildViewState::Pending);
        assert!(fixture
            .host
            .borrow()
            .calls
            .contains(&HostCall::AddChild(ChildKey::VIDEO, SurfaceHandle(3))));

        fixture.view.set_container_size(Size::new(800.0, 600.0));
        push_status(&fixture.view, 1, playing(10 * SECOND as u64));

        let host = fixture.host.borrow();
        assert!(host.calls.contains(&HostCall::SetChildProperties(
            ChildKey::VIDEO,
            Size::new(736.0, 552.0)
        )));
        assert!(host
            .calls
            .contains(&HostCall::SetChildOrigin(ChildKey::VIDEO, Point::new(32.0, 4.0))));
    }

    #[test]
    fn child_size_is_not_resent_when_unchanged() {
        let mut fixture = started(&Config::default(), Some(SurfaceHandle(1)));
        fixture.view.set_container_size(Size::new(800.0, 600.0));
        fixture.view.set_container_size(Size::new(800.0, 600.0));

        let sends = fixture
            .host
            .borrow()
            .count(|call| matches!(call, HostCall::SetChildProperties(..)));
        assert_eq!(sends, 1);
    }

    #[test]
    fn status_drives_state_and_progress() {
        let fixture = fixture(&Config::default());
        assert_eq!(fixture.view.state(), PlaybackState::Paused);
        assert_eq!(fixture.view.progress(), 0.0);

        push_status(&fixture.view, 1, playing(10 * SECOND as u64));
        assert_eq!(fixture.view.state(), PlaybackState::Playing);
        assert_eq!(fixture.view.status_version(), StatusVersion::new(1));

        fixture.clock.set(5 * SECOND);
        assert!((fixture.view.progress() - 0.5).abs() < F32_EPSILON);

        push_status(&fixture.view, 2, paused_at(5 * SECOND, 10 * SECOND as u64));
        fixture.clock.set(9 * SECOND);
        assert_eq!(fixture.view.state(), PlaybackState::Paused);
        assert!((fixture.view.progress() - 0.5).abs() < F32_EPSILON);
    }

    #[test]
    fn every_status_requests_redraw() {
        let mut fixture = fixture(&Config::default());
        fixture.view.set_container_size(Size::new(800.0, 600.0));
        fixture.host.borrow_mut().calls.clear();

        push_status(&fixture.view, 1, PlayerStatus::default());
        push_status(
            &fixture.view,
            2,
            PlayerStatus {
                problem: Some(Problem::new("decoder", None)),
                ..PlayerStatus::default()
            },
        );

        let redraws = fixture
            .host
            .borrow()
            .count(|call| *call == HostCall::Invalidate);
        assert_eq!(redraws, 2);
    }

    #[test]
    fn video_size_before_container_still_redraws() {
        let fixture = fixture(&Config::default());

        push_status(&fixture.view, 1, playing(SECOND as u64));

        let host = fixture.host.borrow();
        assert_eq!(host.count(|call| *call == HostCall::Invalidate), 1);
        assert!(fixture.view.geometry().is_none());
    }

    #[test]
    fn empty_response_only_advances_version() {
        let fixture = fixture(&Config::default());
        fixture
            .view
            .core
            .borrow_mut()
            .on_status(StatusVersion::new(4), None);
        assert_eq!(fixture.view.status_version(), StatusVersion::new(4));
        assert!(fixture.host.borrow().calls.is_empty());
    }

    #[test]
    fn video_size_change_relayouts() {
        let mut fixture = fixture(&Config::default());
        fixture.view.set_container_size(Size::new(800.0, 600.0));
        let before = fixture.view.geometry().expect("geometry");

        push_status(&fixture.view, 1, playing(SECOND as u64));
        let after = fixture.view.geometry().expect("geometry");

        assert_ne!(before.content_rect, after.content_rect);
        assert_eq!(
            after.content_rect,
            Rectangle {
                x: 32.0,
                y: 4.0,
                width: 736.0,
                height: 552.0
            }
        );
    }

    #[test]
    fn click_on_bar_seeks_and_resumes_when_paused() {
        let mut fixture = fixture(&Config::default());
        fixture.view.set_container_size(Size::new(800.0, 600.0));
        push_status(&fixture.view, 1, paused_at(0, 10 * SECOND as u64));

        let bar = fixture.view.geometry().expect("geometry").progress_bar_rect;
        let x = bar.x + bar.width / 2.0;
        let handled = fixture
            .view
            .handle_input(InputEvent::Pointer(PointerEvent::down(x, bar.y + 1.0)));

        assert!(handled);
        assert_eq!(
            fixture.service.take_commands(),
            vec![PlayerCommand::Seek(5 * SECOND), PlayerCommand::Play]
        );
        assert_eq!(fixture.view.state(), PlaybackState::Paused);
    }

    #[test]
    fn toggle_key_after_end_restarts() {
        let mut fixture = fixture(&Config::default());
        push_status(&fixture.view, 1, PlayerStatus {
            end_of_stream: true,
            ..playing(SECOND as u64)
        });

        let handled = fixture
            .view
            .handle_input(InputEvent::Keyboard(KeyboardEvent::pressed(0x2c)));

        assert!(handled);
        assert_eq!(
            fixture.service.take_commands(),
            vec![PlayerCommand::Seek(0), PlayerCommand::Play]
        );
    }

    #[test]
    fn quit_key_asks_host_to_quit() {
        let mut fixture = fixture(&Config::default());
        assert!(fixture
            .view
            .handle_input(InputEvent::Keyboard(KeyboardEvent::pressed(0x14))));
        assert_eq!(fixture.host.borrow().calls, vec![HostCall::Quit]);
        assert!(!fixture
            .view
            .handle_input(InputEvent::Keyboard(KeyboardEvent::pressed(0x05))));
    }

    #[test]
    fn losing_the_surface_keeps_controls_working() {
        let mut fixture = started(&Config::default(), Some(SurfaceHandle(2)));
        fixture.view.set_container_size(Size::new(800.0, 600.0));
        fixture.view.on_child_attached(ChildKey::VIDEO);
        assert_eq!(fixture.view.child_state(), ChildViewState::Attached);
        fixture.host.borrow_mut().calls.clear();

        fixture.view.on_child_unavailable(ChildKey::VIDEO);

        assert_eq!(fixture.view.child_state(), ChildViewState::Lost);
        {
            let host = fixture.host.borrow();
            assert!(host.calls.contains(&HostCall::RemoveChild(ChildKey::VIDEO)));
            assert_eq!(
                host.count(|call| matches!(call, HostCall::SetChildProperties(..))),
                0
            );
            assert!(host.calls.contains(&HostCall::Invalidate));
        }

        push_status(&fixture.view, 1, paused_at(0, SECOND as u64));
        assert!(fixture
            .view
            .handle_input(InputEvent::Keyboard(KeyboardEvent::pressed(0x2c))));
        assert_eq!(
            fixture.service.take_commands().last(),
            Some(&PlayerCommand::Play)
        );
    }

    #[test]
    fn foreign_child_events_are_ignored() {
        let mut fixture = started(&Config::default(), Some(SurfaceHandle(2)));
        fixture.host.borrow_mut().calls.clear();

        fixture.view.on_child_unavailable(ChildKey(42));

        assert_eq!(fixture.view.child_state(), ChildViewState::Pending);
        assert!(fixture.host.borrow().calls.is_empty());
    }

    #[test]
    fn on_frame_requests_more_frames_while_playing() {
        let mut fixture = fixture(&Config::default());
        assert!(!fixture.view.on_frame());

        push_status(&fixture.view, 1, playing(10 * SECOND as u64));
        fixture.clock.advance(SECOND / 50);
        assert!(fixture.view.on_frame());
        fixture.clock.advance(SECOND / 50);
        assert!(fixture.view.on_frame());
        assert!((fixture.view.frame_rate() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn draw_controls_needs_layout() {
        let mut fixture = fixture(&Config::default());
        let mut list = DrawList::new();
        assert!(!fixture.view.draw_controls(&mut list));

        fixture.view.set_container_size(Size::new(800.0, 600.0));
        push_status(&fixture.view, 1, playing(10 * SECOND as u64));
        fixture.clock.set(5 * SECOND);
        assert!(fixture.view.draw_controls(&mut list));

        // Controls are 736 wide; the bar starts after the 48 px symbol zone.
        let palette = ControlsPalette::default();
        assert_eq!(
            list.commands[2],
            DrawCommand::FillRect(
                Rectangle {
                    x: 48.0,
                    y: 0.0,
                    width: 344.0,
                    height: 36.0
                },
                palette.progress_foreground
            )
        );
    }

    #[test]
    fn paint_publishes_controls_pixmap() {
        let mut fixture = fixture(&Config::default());
        let mut surface = ControlsSurface::new();
        assert!(!fixture.view.paint(&mut surface, 1.0, 1.0));

        fixture.view.set_container_size(Size::new(800.0, 600.0));
        assert!(fixture.view.paint(&mut surface, 2.0, 2.0));
        let front = surface.front().expect("published pixmap");
        let controls = fixture.view.geometry().expect("geometry").controls_rect;
        assert_eq!(front.height(), (controls.height * 2.0).ceil() as u32);
    }

    #[test]
    fn config_colors_reach_the_palette() {
        let mut config = Config::default();
        config.colors.background = 0xff00_ff00;
        let fixture = fixture(&config);
        assert_eq!(fixture.view.background_color(), Color::from_rgb8(0, 255, 0));
    }
}
