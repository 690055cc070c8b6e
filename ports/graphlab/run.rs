/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Run controller: owns the single active traversal and its timer.
//!
//! A run is started in manual or auto mode. Manual runs advance on
//! [`RunController::step`]; auto runs advance on ticks of the one live timer.
//! Starting a new run replaces the old one and cancels its timer first, so at
//! most one timer is ever live.

use std::fmt;
use std::time::Duration;

use log::{debug, info};

use crate::graph::{Graph, VertexId};
use crate::render::{Renderer, RunSnapshot};
use crate::timer::{TimerId, TimerService};
use crate::traversal::{self, AlgorithmKind, InvalidSelection, RunOutcome, Stepper, TraversalView};

/// Delay between auto steps unless configured otherwise
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(1000);

/// How a run advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Off,
    Manual,
    Auto { delay: Duration },
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Off => write!(f, "off"),
            ExecutionMode::Manual => write!(f, "manual"),
            ExecutionMode::Auto { delay } => write!(f, "auto every {} ms", delay.as_millis()),
        }
    }
}

/// Parameters of a run to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub kind: AlgorithmKind,
    pub source: VertexId,
    pub target: Option<VertexId>,
    pub mode: ExecutionMode,
}

impl RunRequest {
    pub fn bfs(source: impl Into<VertexId>) -> Self {
        Self::new(AlgorithmKind::Bfs, source.into(), None)
    }

    pub fn dfs(source: impl Into<VertexId>) -> Self {
        Self::new(AlgorithmKind::Dfs, source.into(), None)
    }

    pub fn dijkstra(source: impl Into<VertexId>, target: impl Into<VertexId>) -> Self {
        Self::new(AlgorithmKind::Dijkstra, source.into(), Some(target.into()))
    }

    fn new(kind: AlgorithmKind, source: VertexId, target: Option<VertexId>) -> Self {
        Self {
            kind,
            source,
            target,
            mode: ExecutionMode::Manual,
        }
    }

    /// Step on timer ticks. A zero delay means the controller's default.
    pub fn auto(self, delay: Duration) -> Self {
        self.with_mode(ExecutionMode::Auto { delay })
    }

    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Result of a step request
#[derive(Debug, Clone, PartialEq)]
pub enum StepStatus {
    /// The run advanced and is still active
    Running,

    /// The run terminated on this step
    Finished(RunOutcome),

    /// No run was active, or the tick was stale
    Idle,
}

struct ActiveRun {
    stepper: Box<dyn Stepper>,
    mode: ExecutionMode,
    timer: Option<TimerId>,
}

/// Controller for the one active run
pub struct RunController<T> {
    timers: T,
    active: Option<ActiveRun>,
    last_outcome: Option<RunOutcome>,
    default_delay: Duration,
}

impl<T: TimerService> RunController<T> {
    pub fn new(timers: T) -> Self {
        Self::with_default_delay(timers, DEFAULT_STEP_DELAY)
    }

    pub fn with_default_delay(timers: T, default_delay: Duration) -> Self {
        Self {
            timers,
            active: None,
            last_outcome: None,
            default_delay: non_zero_or(default_delay, DEFAULT_STEP_DELAY),
        }
    }

    /// Start a run, replacing any active one.
    ///
    /// The request is validated first; on error the current run and its timer
    /// are left as they were.
    pub fn start(
        &mut self,
        graph: &Graph,
        request: &RunRequest,
        renderer: &mut dyn Renderer,
    ) -> Result<(), InvalidSelection> {
        if request.mode == ExecutionMode::Off {
            return Err(InvalidSelection::ModeOff);
        }
        let stepper = traversal::start(
            graph,
            request.kind,
            &request.source,
            request.target.as_deref(),
        )?;

        self.cancel();

        let mode = match request.mode {
            ExecutionMode::Auto { delay } => ExecutionMode::Auto {
                delay: non_zero_or(delay, self.default_delay),
            },
            mode => mode,
        };
        let timer = match mode {
            ExecutionMode::Auto { delay } => Some(self.timers.schedule_repeating(delay)),
            _ => None,
        };

        info!("Starting {} from `{}` ({mode})", request.kind, request.source);
        self.active = Some(ActiveRun {
            stepper,
            mode,
            timer,
        });
        self.last_outcome = None;
        renderer.render(graph, &self.snapshot());
        Ok(())
    }

    /// Advance the active run by one step and render the result
    pub fn step(&mut self, graph: &Graph, renderer: &mut dyn Renderer) -> StepStatus {
        let Some(active) = self.active.as_mut() else {
            return StepStatus::Idle;
        };
        let finished = active.stepper.step(graph);
        renderer.render(graph, &self.snapshot());
        if !finished {
            return StepStatus::Running;
        }

        let Some(active) = self.active.take() else {
            return StepStatus::Idle;
        };
        let outcome = self.finish(active);
        renderer.render(graph, &self.snapshot());
        StepStatus::Finished(outcome)
    }

    /// Handle a timer tick. Ticks from any timer but the live one are ignored.
    pub fn on_timer(
        &mut self,
        id: TimerId,
        graph: &Graph,
        renderer: &mut dyn Renderer,
    ) -> StepStatus {
        if self.live_timer() != Some(id) {
            debug!("Ignoring stale tick from {id:?}");
            return StepStatus::Idle;
        }
        self.step(graph, renderer)
    }

    /// Drop the active run and its timer. Returns whether a run was active.
    pub fn cancel(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        if let Some(timer) = active.timer {
            self.timers.cancel(timer);
        }
        info!("Cancelled {} run", active.stepper.kind());
        true
    }

    fn finish(&mut self, active: ActiveRun) -> RunOutcome {
        if let Some(timer) = active.timer {
            self.timers.cancel(timer);
        }
        let outcome = active.stepper.outcome();
        info!("{} finished: {outcome:?}", active.stepper.kind());
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Mode of the active run, `Off` when idle
    pub fn mode(&self) -> ExecutionMode {
        self.active.as_ref().map_or(ExecutionMode::Off, |run| run.mode)
    }

    pub fn live_timer(&self) -> Option<TimerId> {
        self.active.as_ref().and_then(|run| run.timer)
    }

    pub fn view(&self) -> Option<TraversalView<'_>> {
        self.active.as_ref().map(|run| run.stepper.view())
    }

    /// Outcome of the most recently finished run
    pub fn last_outcome(&self) -> Option<&RunOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn snapshot(&self) -> RunSnapshot<'_> {
        RunSnapshot {
            mode: self.mode(),
            view: self.view(),
            outcome: self.last_outcome.as_ref(),
        }
    }

    pub fn default_delay(&self) -> Duration {
        self.default_delay
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }
}

fn non_zero_or(delay: Duration, fallback: Duration) -> Duration {
    if delay.is_zero() { fallback } else { delay }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::build;
    use crate::render::tests::RecordingRenderer;
    use crate::timer::ManualTimers;

    fn chain() -> Graph {
        build(&["A", "B", "C"], &[("A", "B"), ("B", "C")])
    }

    fn controller() -> RunController<ManualTimers> {
        RunController::new(ManualTimers::new())
    }

    #[test]
    fn test_manual_run_steps_to_completion() {
        let graph = chain();
        let mut runs = controller();
        let mut renderer = RecordingRenderer::default();

        runs.start(&graph, &RunRequest::bfs("A"), &mut renderer).unwrap();
        assert!(runs.is_active());
        assert_eq!(runs.mode(), ExecutionMode::Manual);
        assert!(runs.timers().live().is_empty());
        assert_eq!(renderer.frames.len(), 1);

        assert_eq!(runs.step(&graph, &mut renderer), StepStatus::Running);
        assert_eq!(runs.step(&graph, &mut renderer), StepStatus::Running);
        assert_eq!(runs.step(&graph, &mut renderer), StepStatus::Running);
        assert_eq!(
            runs.step(&graph, &mut renderer),
            StepStatus::Finished(RunOutcome::Visited(vec!["A".into(), "B".into(), "C".into()]))
        );

        assert!(!runs.is_active());
        assert_eq!(runs.mode(), ExecutionMode::Off);
        assert!(runs.last_outcome().is_some());
        let last = renderer.frames.last().unwrap();
        assert!(!last.active);
        assert_eq!(last.mode, ExecutionMode::Off);
        assert!(last.outcome.is_some());

        assert_eq!(runs.step(&graph, &mut renderer), StepStatus::Idle);
    }

    #[test]
    fn test_every_step_is_rendered() {
        let graph = chain();
        let mut runs = controller();
        let mut renderer = RecordingRenderer::default();

        runs.start(&graph, &RunRequest::dfs("A"), &mut renderer).unwrap();
        runs.step(&graph, &mut renderer);
        runs.step(&graph, &mut renderer);

        let currents: Vec<_> = renderer.frames.iter().map(|f| f.current.clone()).collect();
        assert_eq!(currents, vec![None, Some("A".into()), Some("B".into())]);
        assert_eq!(renderer.frames[2].order, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_auto_run_schedules_single_timer() {
        let graph = chain();
        let mut runs = controller();
        let mut renderer = RecordingRenderer::default();

        let request = RunRequest::bfs("A").auto(Duration::from_millis(250));
        runs.start(&graph, &request, &mut renderer).unwrap();
        let first = runs.live_timer().unwrap();
        assert_eq!(runs.timers().live(), vec![first]);
        assert_eq!(runs.timers().delay_of(first), Some(Duration::from_millis(250)));

        runs.start(&graph, &RunRequest::dfs("B").auto(Duration::from_millis(250)), &mut renderer)
            .unwrap();
        let second = runs.live_timer().unwrap();
        assert_ne!(first, second);
        assert_eq!(runs.timers().live(), vec![second]);

        runs.start(&graph, &RunRequest::bfs("C"), &mut renderer).unwrap();
        assert!(runs.timers().live().is_empty());
        assert_eq!(runs.live_timer(), None);
    }

    #[test]
    fn test_zero_delay_uses_default() {
        let graph = chain();
        let mut runs = RunController::with_default_delay(ManualTimers::new(), Duration::from_millis(40));
        let mut renderer = RecordingRenderer::default();

        runs.start(&graph, &RunRequest::bfs("A").auto(Duration::ZERO), &mut renderer)
            .unwrap();
        assert_eq!(
            runs.mode(),
            ExecutionMode::Auto {
                delay: Duration::from_millis(40)
            }
        );
        let timer = runs.live_timer().unwrap();
        assert_eq!(runs.timers().delay_of(timer), Some(Duration::from_millis(40)));
    }

    #[test]
    fn test_ticks_drive_auto_run_and_finish_cancels_timer() {
        let graph = build(&["A", "B"], &[("A", "B")]);
        let mut runs = controller();
        let mut renderer = RecordingRenderer::default();

        runs.start(&graph, &RunRequest::dijkstra("A", "B").auto(DEFAULT_STEP_DELAY), &mut renderer)
            .unwrap();
        let timer = runs.live_timer().unwrap();

        assert_eq!(runs.on_timer(timer, &graph, &mut renderer), StepStatus::Running);
        assert_eq!(
            runs.on_timer(timer, &graph, &mut renderer),
            StepStatus::Finished(RunOutcome::Path {
                path: vec!["A".into(), "B".into()],
                distance: 1.0
            })
        );
        assert!(runs.timers().live().is_empty());
        assert_eq!(runs.on_timer(timer, &graph, &mut renderer), StepStatus::Idle);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let graph = chain();
        let mut runs = controller();
        let mut renderer = RecordingRenderer::default();

        runs.start(&graph, &RunRequest::bfs("A").auto(DEFAULT_STEP_DELAY), &mut renderer)
            .unwrap();
        let stale = runs.live_timer().unwrap();
        runs.start(&graph, &RunRequest::bfs("A").auto(DEFAULT_STEP_DELAY), &mut renderer)
            .unwrap();

        let frames = renderer.frames.len();
        assert_eq!(runs.on_timer(stale, &graph, &mut renderer), StepStatus::Idle);
        assert_eq!(renderer.frames.len(), frames);
        assert_eq!(runs.view().unwrap().order.len(), 0);
    }

    #[test]
    fn test_invalid_start_keeps_previous_run() {
        let graph = chain();
        let mut runs = controller();
        let mut renderer = RecordingRenderer::default();

        runs.start(&graph, &RunRequest::bfs("A").auto(DEFAULT_STEP_DELAY), &mut renderer)
            .unwrap();
        let timer = runs.live_timer();
        runs.step(&graph, &mut renderer);

        assert_eq!(
            runs.start(&graph, &RunRequest::dfs("Z"), &mut renderer),
            Err(InvalidSelection::UnknownVertex("Z".into()))
        );
        assert_eq!(
            runs.start(&graph, &RunRequest::dfs("A").with_mode(ExecutionMode::Off), &mut renderer),
            Err(InvalidSelection::ModeOff)
        );

        assert!(runs.is_active());
        assert_eq!(runs.live_timer(), timer);
        assert_eq!(runs.view().unwrap().order.to_vec(), vec!["A".to_string()]);
    }

    #[test]
    fn test_cancel_drops_run_and_timer() {
        let graph = chain();
        let mut runs = controller();
        let mut renderer = RecordingRenderer::default();

        assert!(!runs.cancel());
        runs.start(&graph, &RunRequest::bfs("A").auto(DEFAULT_STEP_DELAY), &mut renderer)
            .unwrap();
        assert!(runs.cancel());
        assert!(!runs.is_active());
        assert!(runs.timers().live().is_empty());
        assert_eq!(runs.last_outcome(), None);
    }

    #[test]
    fn test_unreachable_target_finishes_with_no_path() {
        let graph = build(&["A", "B", "C"], &[("A", "B")]);
        let mut runs = controller();
        let mut renderer = RecordingRenderer::default();

        runs.start(&graph, &RunRequest::dijkstra("A", "C"), &mut renderer)
            .unwrap();
        let mut status = StepStatus::Running;
        while status == StepStatus::Running {
            status = runs.step(&graph, &mut renderer);
        }
        assert_eq!(
            status,
            StepStatus::Finished(RunOutcome::NoPath {
                source: "A".into(),
                target: "C".into()
            })
        );
    }
}
