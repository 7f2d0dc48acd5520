//! The action orchestrator.
//!
//! [`GameEngine`] owns the single authoritative snapshot. Every intent takes
//! the session lock, so intents run one at a time in arrival order and each
//! runs to completion, staged frames and evaluation included, before the
//! next one starts.
//!
//! ## Publishing
//!
//! Snapshots go out through a `watch` channel in frame order with strictly
//! increasing versions. A transition is evaluated before any of its frames
//! are published, so an aborted action publishes nothing.
//!
//! ## Evaluation
//!
//! Available lines, selection search and bingo feasibility run on the
//! blocking pool concurrently and are joined before the board state is
//! derived.
//!
//! ## Grace window
//!
//! A winning selection below the maximum size waits for the configured grace
//! period. Any change to the selection bumps a generation counter; the timer
//! only commits if the generation it was armed with is still current.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, instrument, warn};

use super::actions::{self, DragPath, LineRelease, Transition};
use super::persist::{GameStore, Persister, SavedState};
use crate::core::{
    Board, BoardState, EngineConfig, EngineError, GameRng, GameState, Position,
};
use crate::eval::{
    apply_evaluation, available_lines, check_structure, is_bingo_possible, is_selection_possible,
    Evaluation,
};
use crate::rules::GameMode;

struct Session {
    state: Arc<GameState>,
    rng: GameRng,
    drag: Option<DragPath>,
    generation: u64,
}

struct Inner {
    mode: GameMode,
    config: EngineConfig,
    session: Mutex<Session>,
    publisher: watch::Sender<Arc<GameState>>,
    store: Arc<dyn GameStore>,
    persister: Option<Persister>,
}

/// Cheaply cloneable handle to one game.
#[derive(Clone)]
pub struct GameEngine {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("mode", &self.inner.mode.kind)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl GameEngine {
    /// Create an engine with a blank snapshot. Call [`GameEngine::initial_load`]
    /// or [`GameEngine::new_game`] before playing.
    ///
    /// Must be called inside a Tokio runtime when persistence is enabled.
    pub fn new(mode: GameMode, config: EngineConfig, store: Arc<dyn GameStore>) -> Self {
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let state = Arc::new(GameState::empty(&mode));
        let (publisher, _) = watch::channel(Arc::clone(&state));
        let persister = config.persist.then(|| Persister::spawn(Arc::clone(&store)));

        info!(mode = %mode.kind, seed = rng.seed(), "engine created");

        Self {
            inner: Arc::new(Inner {
                mode,
                config,
                session: Mutex::new(Session {
                    state,
                    rng,
                    drag: None,
                    generation: 0,
                }),
                publisher,
                store,
                persister,
            }),
        }
    }

    #[must_use]
    pub fn mode(&self) -> &GameMode {
        &self.inner.mode
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<GameState> {
        self.inner.publisher.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<GameState>> {
        self.inner.publisher.subscribe()
    }

    /// Wait for queued saves to be written.
    pub async fn flush(&self) {
        if let Some(persister) = &self.inner.persister {
            persister.flush().await;
        }
    }

    /// Restore the saved game, or start a new one.
    ///
    /// A missing, unreadable or mismatched save falls back to a new game.
    ///
    /// # Errors
    ///
    /// Errors from the fallback new game or the evaluation of the restored
    /// board.
    #[instrument(skip(self), fields(mode = %self.inner.mode.kind))]
    pub async fn initial_load(&self) -> Result<(), EngineError> {
        let store = Arc::clone(&self.inner.store);
        let loaded = tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| EngineError::Task(e.to_string()))?;

        let saved = match loaded {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                info!("no saved game");
                return self.new_game().await;
            }
            Err(e) => {
                warn!(error = %e, "could not read saved game");
                return self.new_game().await;
            }
        };

        let restored = match saved.restore(&self.inner.mode) {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "discarding saved game");
                return self.new_game().await;
            }
        };

        if let Err(e) = check_structure(&restored.board, &self.inner.mode) {
            warn!(error = %e, "discarding saved game");
            return self.new_game().await;
        }

        let mut session = self.inner.session.lock().await;
        if let Some(rng) = &saved.rng {
            session.rng = GameRng::from_state(rng);
        }
        session.drag = None;
        info!(score = restored.score, "restored saved game");

        let transition = Transition {
            frames: Vec::new(),
            state: restored,
            evaluate: true,
            grace_window: false,
        };
        self.run(&mut session, transition).await
    }

    /// Start over with a fresh board, queue and budget.
    ///
    /// # Errors
    ///
    /// [`EngineError::PoolExhausted`] if the mode cannot fill a board.
    #[instrument(skip(self))]
    pub async fn new_game(&self) -> Result<(), EngineError> {
        let mut session = self.inner.session.lock().await;
        session.drag = None;
        let transition = actions::new_game(&self.inner.mode, &mut session.rng)?;
        info!("new game");
        self.run(&mut session, transition).await
    }

    /// GAMEOVER starts a new game; otherwise the board is reloaded.
    ///
    /// # Errors
    ///
    /// Errors from the redeal or its evaluation.
    #[instrument(skip(self))]
    pub async fn press_reload(&self) -> Result<(), EngineError> {
        let mut session = self.inner.session.lock().await;
        if session.state.board_state == BoardState::GameOver {
            session.drag = None;
            let transition = actions::new_game(&self.inner.mode, &mut session.rng)?;
            info!("new game after game over");
            return self.run(&mut session, transition).await;
        }

        let state = cancel_drag(&mut session);
        let transition = actions::reload_board(&state, &self.inner.mode, &mut session.rng)?;
        self.run(&mut session, transition).await
    }

    /// Spend reloads to redeal the queue.
    ///
    /// # Errors
    ///
    /// Errors from the redeal or its evaluation.
    #[instrument(skip(self))]
    pub async fn reload_queue(&self) -> Result<(), EngineError> {
        let mut session = self.inner.session.lock().await;
        if session.state.board_state == BoardState::GameOver {
            debug!("queue reload ignored after game over");
            return Ok(());
        }
        let state = cancel_drag(&mut session);
        let transition = actions::reload_queue(&state, &self.inner.mode, &mut session.rng)?;
        self.run(&mut session, transition).await
    }

    /// Toggle a tile in the multi-selection.
    ///
    /// # Errors
    ///
    /// Errors from committing a maximal winning selection.
    #[instrument(skip(self))]
    pub async fn select_box(&self, pos: Position) -> Result<(), EngineError> {
        let mut session = self.inner.session.lock().await;
        if session.drag.is_some() {
            debug!("selection ignored during drag");
            return Ok(());
        }
        let state = Arc::clone(&session.state);
        match actions::select(&state, pos, &self.inner.mode, &mut session.rng)? {
            Some(transition) => self.run(&mut session, transition).await,
            None => {
                debug!("selection ignored");
                Ok(())
            }
        }
    }

    /// Commit the pending selection now instead of waiting for the grace
    /// window.
    ///
    /// # Errors
    ///
    /// Errors from the refill or its evaluation.
    #[instrument(skip(self))]
    pub async fn commit_selection(&self) -> Result<(), EngineError> {
        let mut session = self.inner.session.lock().await;
        self.commit_pending(&mut session).await
    }

    /// Begin a line drag.
    ///
    /// # Errors
    ///
    /// Never fails today; kept fallible like every other intent.
    #[instrument(skip(self))]
    pub async fn start_line(&self, pos: Option<Position>) -> Result<(), EngineError> {
        let mut session = self.inner.session.lock().await;
        let Some((drag, state)) = actions::start_line(&session.state, pos, &self.inner.mode) else {
            debug!("line start ignored");
            return Ok(());
        };
        session.drag = Some(drag);
        self.run(&mut session, Transition::immediate(state)).await
    }

    /// Move the drag onto another cell.
    ///
    /// # Errors
    ///
    /// Never fails today; kept fallible like every other intent.
    #[instrument(skip(self))]
    pub async fn drag_line(&self, pos: Option<Position>) -> Result<(), EngineError> {
        let mut session = self.inner.session.lock().await;
        let Some(drag) = session.drag.as_ref() else {
            debug!("drag without a line start");
            return Ok(());
        };
        let Some((drag, state)) = actions::drag_line(&session.state, drag, pos, &self.inner.mode)
        else {
            return Ok(());
        };
        session.drag = Some(drag);
        self.run(&mut session, Transition::immediate(state)).await
    }

    /// Release the drag.
    ///
    /// # Errors
    ///
    /// Errors from the refill, a tap-selection commit, or evaluation.
    #[instrument(skip(self))]
    pub async fn end_line(&self) -> Result<(), EngineError> {
        let mut session = self.inner.session.lock().await;
        let Some(drag) = session.drag.clone() else {
            debug!("line end without a line start");
            return Ok(());
        };

        // On error the drag stays live, matching the snapshot left in place
        let state = Arc::clone(&session.state);
        let release = actions::end_line(&state, &drag, &self.inner.mode, &mut session.rng)?;
        let transition = match release {
            LineRelease::Commit(transition) => transition,
            LineRelease::Discard(state) => Transition::immediate(state),
            LineRelease::Select(state, pos) => {
                match actions::select(&state, pos, &self.inner.mode, &mut session.rng)? {
                    Some(mut transition) => {
                        transition.frames.insert(0, state);
                        transition
                    }
                    None => Transition::immediate(state),
                }
            }
        };
        self.run(&mut session, transition).await?;
        session.drag = None;
        Ok(())
    }

    async fn commit_pending(&self, session: &mut Session) -> Result<(), EngineError> {
        if session.drag.is_some() {
            debug!("selection commit ignored during drag");
            return Ok(());
        }
        if session.state.selected_positions.is_empty() {
            return Ok(());
        }
        let state = Arc::clone(&session.state);
        let transition = actions::complete_selection(&state, &self.inner.mode, &mut session.rng)?;
        if !transition.evaluate {
            debug!("selection is not winning, nothing to commit");
            return Ok(());
        }
        self.run(session, transition).await
    }

    async fn expire_grace(&self, generation: u64) {
        let mut session = self.inner.session.lock().await;
        if session.generation != generation
            || !session.state.selection_pending
            || session.drag.is_some()
        {
            debug!(generation, current = session.generation, "grace window revoked");
            return;
        }
        if let Err(e) = self.commit_pending(&mut session).await {
            warn!(error = %e, "grace commit aborted");
        }
    }

    /// Evaluate, publish frames and result, persist, arm the grace timer.
    async fn run(&self, session: &mut Session, transition: Transition) -> Result<(), EngineError> {
        let Transition {
            frames,
            mut state,
            evaluate,
            grace_window,
        } = transition;

        if evaluate {
            match self.update(&state.board).await {
                Ok(evaluation) => apply_evaluation(&mut state, evaluation, &self.inner.mode),
                Err(EngineError::Structural { reason }) => {
                    warn!(%reason, "board left unevaluated");
                    carry_over(&mut state, &session.state);
                }
                Err(e) => return Err(e),
            }
        }

        if grace_window
            || state.selection_pending != session.state.selection_pending
            || state.selected_positions != session.state.selected_positions
        {
            session.generation += 1;
        }

        let delay = self.inner.config.stage_delay();
        for frame in frames {
            self.publish(session, frame);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        self.publish(session, state);

        if evaluate {
            self.persist(session);
        }
        if grace_window {
            self.arm_grace(session.generation);
        }
        Ok(())
    }

    /// The shared evaluation tail.
    async fn update(&self, board: &Board) -> Result<Evaluation, EngineError> {
        let mode = &self.inner.mode;
        check_structure(board, mode)?;

        let lines = {
            let (board, mode) = (board.clone(), mode.clone());
            tokio::task::spawn_blocking(move || available_lines(&board, &mode))
        };
        let selection = {
            let (board, mode) = (board.clone(), mode.clone());
            tokio::task::spawn_blocking(move || is_selection_possible(&board, &mode))
        };
        let bingo = {
            let (board, mode) = (board.clone(), mode.clone());
            tokio::task::spawn_blocking(move || is_bingo_possible(&board, &mode))
        };

        let (lines, selection, bingo) = tokio::join!(lines, selection, bingo);
        let task = |e: tokio::task::JoinError| EngineError::Task(e.to_string());

        Ok(Evaluation {
            available_lines: lines.map_err(task)?,
            selection_possible: selection.map_err(task)?,
            bingo_possible: bingo.map_err(task)??,
            star_count: board.star_count(),
        })
    }

    fn publish(&self, session: &mut Session, mut state: GameState) {
        state.version = session.state.version + 1;
        let state = Arc::new(state);
        session.state = Arc::clone(&state);
        self.inner.publisher.send_replace(state);
    }

    fn persist(&self, session: &Session) {
        let Some(persister) = &self.inner.persister else {
            return;
        };
        let saved = SavedState::capture(&session.state, &self.inner.mode, Some(session.rng.state()));
        persister.save(saved);
    }

    fn arm_grace(&self, generation: u64) {
        let Some(period) = self.inner.config.grace_period() else {
            return;
        };
        let engine = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(period).await;
            engine.expire_grace(generation).await;
        });
    }
}

/// Abandon an active drag. Returns the snapshot to act on, with the board
/// the drag started from and no path.
fn cancel_drag(session: &mut Session) -> Arc<GameState> {
    let Some(drag) = session.drag.take() else {
        return Arc::clone(&session.state);
    };
    debug!(steps = drag.path.len(), "drag abandoned");
    let mut state = GameState::clone(&session.state);
    state.board = drag.base_board;
    state.lined_positions.clear();
    state.completed_lines.clear();
    Arc::new(state)
}

/// Keep the derived fields of the previous snapshot.
fn carry_over(state: &mut GameState, previous: &GameState) {
    state.board_state = previous.board_state;
    state.available_lines = previous.available_lines.clone();
    state.selection_possible = previous.selection_possible;
    state.bingo_possible = previous.bingo_possible;
}
