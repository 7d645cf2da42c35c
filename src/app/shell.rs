//! `WindowApplication`: the main-thread event pump / optional UI-thread
//! split, window lifecycle, and quit handling spec.md §4.M describes.
//!
//! No teacher or `original_source` analogue survived the pack loss (see
//! DESIGN.md); implemented directly against spec.md §4.M/§5/§6. OS event
//! pumping and window creation stay external collaborators per spec.md §1's
//! scope note — `tick`/`run`/`modal_run` take caller-supplied closures for
//! "pump OS events" and "render all windows" rather than owning an event
//! loop themselves, the same boundary `crate::backend::PlatformWindow`
//! already draws for windowing.

use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};
use std::sync::Arc;

use super::task_queue::TaskQueue;

/// When the application should quit on its own, per spec.md §4.M.
/// `PlatformDependent` defers the decision to the host (e.g. a Mac app
/// that keeps running with no open windows); this shell never quits on its
/// own under that condition; the host calls `quit()` explicitly instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuitCondition {
    FirstWindowClosed,
    #[default]
    AllWindowsClosed,
    PlatformDependent,
}

/// Whether rendering happens inline with the OS event pump, or on a
/// dedicated thread reached only through `TaskQueue` dispatches (spec.md
/// §5's "Scheduling model").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulingModel {
    #[default]
    Unified,
    Dual,
}

/// Serializable per-host display preferences (spec.md §6): GPU selection,
/// present cadence, DPI handling, and the visual settings
/// `RenderEncoder::set_gamma`/`set_blue_light_filter`/`set_subpixel_text`
/// apply per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub discrete_gpu: bool,
    pub sync_interval: u32,
    pub ui_scale: f32,
    pub use_monitor_scale: bool,
    pub blue_light_filter: f32,
    pub global_gamma: f32,
    pub sub_pixel_text: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            discrete_gpu: false,
            sync_interval: 1,
            ui_scale: 1.0,
            use_monitor_scale: true,
            blue_light_filter: 0.0,
            global_gamma: 1.0,
            sub_pixel_text: true,
        }
    }
}

/// What `WindowApplication` needs to know about a host-owned window to run
/// its lifecycle/quit-condition bookkeeping (spec.md §4.M step 1). The host
/// application's concrete window type implements this; everything else
/// about the window (creation, OS handle, clipboard, cursors) stays the
/// `PlatformWindow` collaborator's concern (spec.md §1/§6).
pub trait ManagedWindow {
    fn is_closed(&self) -> bool;
}

const NOT_REQUESTED: u8 = 0;
const REQUESTED: u8 = 1;

/// The application shell spec.md §4.M names: owns the window list, the
/// quit/exit-code atomics shared with a UI thread (spec.md §5), the
/// cross-thread `TaskQueue`, and display settings.
pub struct WindowApplication<W: ManagedWindow> {
    windows: Vec<W>,
    had_first_window: bool,
    quit_condition: QuitCondition,
    scheduling: SchedulingModel,
    quit_requested: Arc<AtomicU8>,
    exit_code: Arc<AtomicI32>,
    tasks: Arc<TaskQueue>,
    display_settings: DisplaySettings,
}

impl<W: ManagedWindow> WindowApplication<W> {
    pub fn new(scheduling: SchedulingModel) -> Self {
        WindowApplication {
            windows: Vec::new(),
            had_first_window: false,
            quit_condition: QuitCondition::default(),
            scheduling,
            quit_requested: Arc::new(AtomicU8::new(NOT_REQUESTED)),
            exit_code: Arc::new(AtomicI32::new(0)),
            tasks: Arc::new(TaskQueue::new()),
            display_settings: DisplaySettings::default(),
        }
    }

    pub fn scheduling(&self) -> SchedulingModel {
        self.scheduling
    }

    pub fn tasks(&self) -> &Arc<TaskQueue> {
        &self.tasks
    }

    pub fn display_settings(&self) -> &DisplaySettings {
        &self.display_settings
    }

    pub fn display_settings_mut(&mut self) -> &mut DisplaySettings {
        &mut self.display_settings
    }

    pub fn set_quit_condition(&mut self, condition: QuitCondition) {
        self.quit_condition = condition;
    }

    /// Stores `code` and marks quit requested; cooperative (spec.md §5:
    /// "the outer loop checks on each iteration"), so a thread other than
    /// the one running `tick`/`run` can call this safely.
    pub fn quit(&self, code: i32) {
        self.exit_code.store(code, Ordering::SeqCst);
        self.quit_requested.store(REQUESTED, Ordering::SeqCst);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested.load(Ordering::SeqCst) == REQUESTED
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code.load(Ordering::SeqCst)
    }

    pub fn add_window(&mut self, window: W) -> usize {
        self.had_first_window = true;
        self.windows.push(window);
        self.windows.len() - 1
    }

    pub fn windows(&self) -> &[W] {
        &self.windows
    }

    pub fn windows_mut(&mut self) -> &mut [W] {
        &mut self.windows
    }

    fn remove_closed_windows(&mut self) -> usize {
        let before = self.windows.len();
        self.windows.retain(|w| !w.is_closed());
        before - self.windows.len()
    }

    fn quit_condition_met(&self, removed_this_tick: usize) -> bool {
        match self.quit_condition {
            QuitCondition::FirstWindowClosed => removed_this_tick > 0,
            QuitCondition::AllWindowsClosed => self.had_first_window && self.windows.is_empty(),
            QuitCondition::PlatformDependent => false,
        }
    }

    /// One iteration of the main loop (spec.md §4.M): remove closed
    /// windows and check the quit condition, pump OS events (`pump` is
    /// told whether work is already pending, so the host can poll instead
    /// of blocking per spec.md §5's suspension-point note), run scheduled
    /// tasks, then — in `Unified` mode only — render every window.
    pub fn tick(&mut self, mut pump: impl FnMut(bool), mut render_all: impl FnMut(&mut [W])) {
        let removed = self.remove_closed_windows();
        if self.quit_condition_met(removed) {
            self.quit(self.exit_code());
        }
        if self.quit_requested() {
            return;
        }
        let has_pending_work = !self.tasks.is_idle();
        pump(has_pending_work);
        self.tasks.process();
        if self.scheduling == SchedulingModel::Unified {
            render_all(&mut self.windows);
        }
    }

    /// Runs `tick` until `quit()` is called, then returns the stored exit
    /// code (spec.md §4.M: "the outer runner returns that code").
    pub fn run(&mut self, mut pump: impl FnMut(bool), mut render_all: impl FnMut(&mut [W])) -> i32 {
        while !self.quit_requested() {
            self.tick(&mut pump, &mut render_all);
        }
        self.exit_code()
    }

    /// `modalRun`: nests an inner loop that exits when `is_modal_closed`
    /// reports the modal window has closed, or the global quit flag is
    /// set — whichever comes first (spec.md §4.M).
    pub fn modal_run(&mut self, mut is_modal_closed: impl FnMut(&[W]) -> bool, mut pump: impl FnMut(bool), mut render_all: impl FnMut(&mut [W])) {
        loop {
            if self.quit_requested() || is_modal_closed(&self.windows) {
                break;
            }
            self.tick(&mut pump, &mut render_all);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeWindow {
        closed: bool,
    }

    impl ManagedWindow for FakeWindow {
        fn is_closed(&self) -> bool {
            self.closed
        }
    }

    #[test]
    fn first_window_closed_quits_even_with_other_windows_open() {
        let mut app: WindowApplication<FakeWindow> = WindowApplication::new(SchedulingModel::Unified);
        app.set_quit_condition(QuitCondition::FirstWindowClosed);
        app.add_window(FakeWindow { closed: true });
        app.add_window(FakeWindow { closed: false });
        app.tick(|_| {}, |_| {});
        assert!(app.quit_requested());
    }

    #[test]
    fn all_windows_closed_waits_for_every_window() {
        let mut app: WindowApplication<FakeWindow> = WindowApplication::new(SchedulingModel::Unified);
        app.set_quit_condition(QuitCondition::AllWindowsClosed);
        app.add_window(FakeWindow { closed: true });
        app.add_window(FakeWindow { closed: false });
        app.tick(|_| {}, |_| {});
        assert!(!app.quit_requested());
        app.windows_mut()[0].closed = true;
        // the only remaining window is still open
        app.windows_mut().last_mut().unwrap().closed = true;
        app.tick(|_| {}, |_| {});
        assert!(app.quit_requested());
    }

    #[test]
    fn platform_dependent_never_auto_quits() {
        let mut app: WindowApplication<FakeWindow> = WindowApplication::new(SchedulingModel::Unified);
        app.set_quit_condition(QuitCondition::PlatformDependent);
        app.add_window(FakeWindow { closed: true });
        app.tick(|_| {}, |_| {});
        assert!(!app.quit_requested());
    }

    #[test]
    fn dual_mode_does_not_render_from_tick() {
        let mut app: WindowApplication<FakeWindow> = WindowApplication::new(SchedulingModel::Dual);
        app.add_window(FakeWindow { closed: false });
        let mut rendered = false;
        app.tick(|_| {}, |_| rendered = true);
        assert!(!rendered);
    }

    #[test]
    fn quit_stores_the_exit_code_the_run_loop_returns() {
        let mut app: WindowApplication<FakeWindow> = WindowApplication::new(SchedulingModel::Unified);
        app.quit(7);
        let code = app.run(|_| {}, |_| {});
        assert_eq!(code, 7);
    }

    #[test]
    fn modal_run_stops_when_the_modal_window_closes() {
        let mut app: WindowApplication<FakeWindow> = WindowApplication::new(SchedulingModel::Unified);
        app.add_window(FakeWindow { closed: false });
        let iterations = std::cell::Cell::new(0);
        app.modal_run(
            |windows| windows[0].closed,
            |_| iterations.set(iterations.get() + 1),
            |windows| {
                if iterations.get() >= 3 {
                    windows[0].closed = true;
                }
            },
        );
        assert_eq!(iterations.get(), 3);
    }
}
