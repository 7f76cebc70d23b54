use crate::animation::TIME_EPSILON;
use crate::config::TimingConfig;

/// The phases of the show, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scene {
    /// A glowing seed before anything grows
    Seed,
    /// The tree grows segment by segment
    Tree,
    /// The grown tree holds still for a moment
    Pause,
    /// The particle portrait forms; runs until restarted
    Portrait,
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Seed => "seed",
            Scene::Tree => "tree",
            Scene::Pause => "pause",
            Scene::Portrait => "portrait",
        }
    }
}

/// Current scene and the time spent in it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneState {
    pub scene: Scene,
    pub elapsed: f32,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            scene: Scene::Seed,
            elapsed: 0.0,
        }
    }
}

/// Time- and condition-driven state machine over [`Scene`]
#[derive(Debug, Clone)]
pub struct SceneSequencer {
    state: SceneState,
    global_time: f32,
    seed_duration: f32,
    pause_duration: f32,
}

impl SceneSequencer {
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            state: SceneState::default(),
            global_time: 0.0,
            seed_duration: timing.seed_duration,
            pause_duration: timing.pause_duration,
        }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn scene(&self) -> Scene {
        self.state.scene
    }

    /// Seconds spent in the current scene
    pub fn elapsed(&self) -> f32 {
        self.state.elapsed
    }

    /// Seconds since the sequencer was created; never reset
    pub fn global_time(&self) -> f32 {
        self.global_time
    }

    /// Advance the clocks and take at most one transition.
    ///
    /// `tree_grown` is the revealer's terminal flag. Returns the scene that
    /// was entered, if any.
    pub fn advance(&mut self, dt: f32, tree_grown: bool) -> Option<Scene> {
        let dt = dt.max(0.0);
        self.global_time += dt;
        self.state.elapsed += dt;

        let elapsed = self.state.elapsed + TIME_EPSILON;
        let next = match self.state.scene {
            Scene::Seed if elapsed >= self.seed_duration => Some(Scene::Tree),
            Scene::Tree if tree_grown => Some(Scene::Pause),
            Scene::Pause if elapsed >= self.pause_duration => Some(Scene::Portrait),
            _ => None,
        };

        if let Some(scene) = next {
            log::info!(
                "scene {} -> {} after {:.2}s",
                self.state.scene.name(),
                scene.name(),
                self.state.elapsed
            );
            self.enter(scene);
        }
        next
    }

    /// Back to the seed with a fresh scene clock
    pub fn reset(&mut self) {
        self.enter(Scene::Seed);
    }

    fn enter(&mut self, scene: Scene) {
        self.state = SceneState { scene, elapsed: 0.0 };
    }
}
