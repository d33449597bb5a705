use super::observer::{AnalysisState, GestureObserver};
use super::renderer::{Mutation, StrokeRenderer, StrokeState};
use super::session::SessionToken;
use super::trigger::AnalysisTrigger;
use crate::analysis::AnalysisSink;
use crate::config::Config;
use crate::draw::{DrawingSurface, StrokeStyle};
use crate::gesture::{
    ClassifierSettings, Gesture, GestureClassifier, GestureStabilizer, HandFrame,
    StabilizerSettings,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Engine tuning, usually derived from [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub classifier: ClassifierSettings,
    /// `None` acts on raw classifications
    pub stabilizer: Option<StabilizerSettings>,
    pub stroke: StrokeStyle,
    pub eraser_radius: f64,
    /// Hands tracked per frame; further hands are ignored
    pub max_hands: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            classifier: ClassifierSettings::default(),
            stabilizer: None,
            stroke: StrokeStyle::default(),
            eraser_radius: 15.0,
            max_hands: 1,
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            classifier: config.classifier_settings(),
            stabilizer: config.stabilizer_settings(),
            stroke: config.stroke_style(),
            eraser_radius: config.drawing.eraser_radius,
            max_hands: config.gesture.max_hands,
        }
    }
}

/// Collaborators the engine talks to.
pub struct EngineDependencies {
    pub sink: Arc<dyn AnalysisSink>,
    pub observer: Box<dyn GestureObserver>,
}

/// Result of one analysis request, delivered back to the engine.
#[derive(Debug)]
pub struct AnalysisCompletion {
    generation: u64,
    result: Result<String, String>,
}

impl AnalysisCompletion {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> &Result<String, String> {
        &self.result
    }
}

/// What happened to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The engine is stopped; the frame was ignored
    Inactive,
    Processed {
        /// Gesture of the primary hand
        gesture: Gesture,
        /// Number of surface mutations across all hands
        mutations: usize,
        analysis_requested: bool,
    },
}

#[derive(Debug, Clone)]
struct HandTrack {
    stroke: StrokeState,
    stabilizer: Option<GestureStabilizer>,
}

impl HandTrack {
    fn new(stabilizer: Option<StabilizerSettings>) -> Self {
        Self {
            stroke: StrokeState::default(),
            stabilizer: stabilizer.map(GestureStabilizer::new),
        }
    }
}

/// Classifies hand frames, drives the drawing surface and triggers analysis.
///
/// All state lives on the caller's task. Analysis runs on a spawned task and
/// its result comes back through the receiver returned by [`GestureEngine::new`];
/// the caller feeds it to [`GestureEngine::apply_completion`].
pub struct GestureEngine<S: DrawingSurface> {
    surface: S,
    classifier: GestureClassifier,
    renderer: StrokeRenderer,
    settings: EngineSettings,
    tracks: Vec<HandTrack>,
    trigger: AnalysisTrigger,
    gesture: Gesture,
    analysis: AnalysisState,
    sink: Arc<dyn AnalysisSink>,
    observer: Box<dyn GestureObserver>,
    runtime: Handle,
    completions: mpsc::UnboundedSender<AnalysisCompletion>,
    token: Option<SessionToken>,
}

impl<S: DrawingSurface> GestureEngine<S> {
    pub fn new(
        runtime_handle: &Handle,
        surface: S,
        settings: EngineSettings,
        dependencies: EngineDependencies,
    ) -> (Self, mpsc::UnboundedReceiver<AnalysisCompletion>) {
        let (completions, completion_rx) = mpsc::unbounded_channel();
        let engine = Self {
            surface,
            classifier: GestureClassifier::new(settings.classifier),
            renderer: StrokeRenderer::new(settings.stroke, settings.eraser_radius),
            tracks: Self::fresh_tracks(&settings),
            settings,
            trigger: AnalysisTrigger::new(),
            gesture: Gesture::None,
            analysis: AnalysisState::Empty,
            sink: dependencies.sink,
            observer: dependencies.observer,
            runtime: runtime_handle.clone(),
            completions,
            token: None,
        };
        (engine, completion_rx)
    }

    fn fresh_tracks(settings: &EngineSettings) -> Vec<HandTrack> {
        vec![HandTrack::new(settings.stabilizer); settings.max_hands.max(1)]
    }

    /// Begins acting on frames for the session owning `token`.
    ///
    /// Stroke state is reset; a result still pending from an earlier session
    /// is dropped.
    pub fn start(&mut self, token: SessionToken) {
        if let Some(previous) = self.token.take() {
            previous.cancel();
        }
        log::debug!("Engine started for session {}", token.generation());
        self.token = Some(token);
        self.tracks = Self::fresh_tracks(&self.settings);
        self.trigger.resolve();
        self.set_gesture(Gesture::None);
        if self.analysis == AnalysisState::Pending {
            self.set_analysis(AnalysisState::Empty);
        }
    }

    /// Stops acting on frames. Idempotent; in-flight analysis is left to
    /// finish and its result is discarded.
    pub fn stop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };
        token.cancel();
        self.tracks = Self::fresh_tracks(&self.settings);
        self.trigger.resolve();
        log::debug!("Engine stopped for session {}", token.generation());
    }

    pub fn is_active(&self) -> bool {
        self.token.as_ref().is_some_and(SessionToken::is_active)
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    pub fn is_analysis_pending(&self) -> bool {
        self.trigger.is_pending()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Processes one frame of detected hands.
    pub fn on_frame(&mut self, hands: &[HandFrame]) -> FrameOutcome {
        let Some(generation) = self
            .token
            .as_ref()
            .filter(|token| token.is_active())
            .map(SessionToken::generation)
        else {
            return FrameOutcome::Inactive;
        };

        if hands.len() > self.tracks.len() {
            log::trace!(
                "Ignoring {} hands beyond max_hands",
                hands.len() - self.tracks.len()
            );
        }

        let (width, height) = self.surface.dimensions();
        let mut primary = Gesture::None;
        let mut mutations = 0;
        let mut analysis_requested = false;

        for slot in 0..self.tracks.len() {
            let hand = hands.get(slot);
            let raw = hand
                .map(|hand| self.classifier.classify(hand, width, height).gesture)
                .unwrap_or_default();

            let track = &mut self.tracks[slot];
            let gesture = match track.stabilizer.as_mut() {
                Some(stabilizer) => stabilizer.update(raw),
                None => raw,
            };
            let point = hand.and_then(|hand| {
                self.classifier
                    .fingertip_point(hand, gesture, width, height)
            });
            log::trace!("Hand {}: {} (raw {})", slot, gesture, raw);

            let mutation = self
                .renderer
                .apply(&mut self.surface, &mut track.stroke, gesture, point);
            if mutation != Mutation::None {
                mutations += 1;
            }

            let previous = track.stroke.last_gesture;
            track.stroke.last_gesture = gesture;
            if self.trigger.fire(previous, gesture) {
                analysis_requested |= self.request_analysis(generation);
            }

            if slot == 0 {
                primary = gesture;
            }
        }

        self.set_gesture(primary);
        FrameOutcome::Processed {
            gesture: primary,
            mutations,
            analysis_requested,
        }
    }

    /// Applies a finished analysis. Returns `false` when it was discarded
    /// because the engine stopped or restarted in the meantime.
    pub fn apply_completion(&mut self, completion: AnalysisCompletion) -> bool {
        let current = self.token.as_ref().filter(|token| token.is_active());
        if current.map(SessionToken::generation) != Some(completion.generation) {
            log::debug!(
                "Discarding analysis result from session {}",
                completion.generation
            );
            return false;
        }

        self.trigger.resolve();
        let state = match completion.result {
            Ok(text) => {
                log::info!("Analysis finished");
                AnalysisState::Ready(text)
            }
            Err(message) => {
                log::warn!("Analysis failed: {}", message);
                AnalysisState::Failed(message)
            }
        };
        self.set_analysis(state);
        true
    }

    fn request_analysis(&mut self, generation: u64) -> bool {
        let image = match self.surface.export_image() {
            Ok(image) => image,
            Err(e) => {
                log::error!("Failed to export drawing for analysis: {}", e);
                self.trigger.resolve();
                self.set_analysis(AnalysisState::Failed(e.to_string()));
                return false;
            }
        };

        log::info!("Requesting analysis of {} byte drawing", image.len());
        self.set_analysis(AnalysisState::Pending);

        let sink = self.sink.clone();
        let completions = self.completions.clone();
        self.runtime.spawn(async move {
            let result = sink.analyze(image).await.map_err(|e| e.to_string());
            if completions
                .send(AnalysisCompletion { generation, result })
                .is_err()
            {
                log::debug!("Engine dropped before analysis finished");
            }
        });
        true
    }

    fn set_gesture(&mut self, gesture: Gesture) {
        if gesture != self.gesture {
            self.gesture = gesture;
            self.observer.gesture_changed(gesture);
        }
    }

    fn set_analysis(&mut self, state: AnalysisState) {
        if state != self.analysis {
            self.analysis = state;
            self.observer.analysis_changed(&self.analysis);
        }
    }
}

#[cfg(test)]
impl AnalysisCompletion {
    pub(crate) fn for_test(generation: u64, result: Result<String, String>) -> Self {
        Self { generation, result }
    }
}
