//=========================================================================
// Game Session
//=========================================================================
//
// Playing → GameOver → restart, shared by every game.
//
// State machine:
// ```text
//            Flow::Finished(outcome)
//   Playing ───────────────────────────> GameOver(outcome)
//      ^       submit final score once        │
//      │                                      │ restart_requested()
//      └──────────── reset() ─────────────────┘   (never on the entry tick)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::TrySendError;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

//=== Internal Dependencies ===============================================

use super::{ArcadeAction, Flow, Frame, Game, GameEvent, GameKind, Outcome};
use crate::core::globals::GlobalContext;
use crate::core::scene::Scene;
use crate::core::scoring::{GameId, GameReady, HudUpdate, MountPoint, ScoreSubmission, SessionPorts};

//=== Phase ===============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver(Outcome),
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver(_))
    }
}

//=== GameSession =========================================================

pub struct GameSession<G: Game> {
    mount: MountPoint,
    game_id: GameId,
    game: G,
    phase: Phase,
    rng: StdRng,
    ports: SessionPorts,
    ready_sent: bool,
    last_hud: Option<String>,
    events: Vec<GameEvent>,
}

impl<G: Game> GameSession<G> {
    pub fn new(mount: MountPoint, game_id: GameId, game: G, ports: SessionPorts, seed: u64) -> Self {
        Self {
            mount,
            game_id,
            game,
            phase: Phase::Playing,
            rng: StdRng::seed_from_u64(seed),
            ports,
            ready_sent: false,
            last_hud: None,
            events: Vec::new(),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Builds the entities, then signals readiness (first setup only).
    pub fn setup(&mut self, now: Duration) {
        self.reset(now);
        info!(
            target: "arcade::session",
            "{} ready at '{}' (game id {})",
            self.game.kind().title(),
            self.mount,
            self.game_id
        );

        if !self.ready_sent {
            self.ready_sent = true;
            if let Some(ready) = &self.ports.ready {
                ready.notify(GameReady { mount: self.mount.clone(), game_id: self.game_id });
            }
        }
    }

    /// Back to `Playing` with fresh entities and a zero score.
    pub fn reset(&mut self, now: Duration) {
        self.game.reset(now, &mut self.rng);
        self.phase = Phase::Playing;
        self.events.clear();
        self.publish_hud();
    }

    /// One tick of the state machine.
    pub fn step(&mut self, frame: &Frame<'_>) {
        match self.phase {
            Phase::GameOver(_) => {
                if self.game.restart_requested(frame) {
                    debug!(target: "arcade::session", "{} restarting", self.game.kind());
                    self.reset(frame.now);
                    return;
                }
            }
            Phase::Playing => {
                let flow = self.game.step(frame, &mut self.rng, &mut self.events);

                for event in std::mem::take(&mut self.events) {
                    match event {
                        GameEvent::Checkpoint(score) => self.submit(score),
                    }
                }

                if let Flow::Finished(outcome) = flow {
                    self.phase = Phase::GameOver(outcome);
                    let score = self.game.final_score();
                    info!(
                        target: "arcade::session",
                        "{} over ({:?}) with score {}",
                        self.game.kind(),
                        outcome,
                        score
                    );
                    self.submit(score);
                }
            }
        }
        self.publish_hud();
    }

    //--- Queries ----------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn score(&self) -> u32 {
        self.game.score()
    }

    pub fn kind(&self) -> GameKind {
        self.game.kind()
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn hud_text(&self) -> String {
        match self.phase {
            Phase::Playing => self.game.hud(),
            Phase::GameOver(outcome) => format!(
                "{} | {} | {}",
                self.game.over_hud(),
                self.game.over_banner(outcome),
                self.game.restart_hint()
            ),
        }
    }

    //--- Ports ------------------------------------------------------------

    fn submit(&self, score: u32) {
        match &self.ports.score {
            Some(port) => port.submit(&ScoreSubmission { game_id: self.game_id, score }),
            None => debug!(
                target: "arcade::session",
                "No score port for game {}, skipping submission of {}",
                self.game_id,
                score
            ),
        }
    }

    fn publish_hud(&mut self) {
        let Some(hud) = &self.ports.hud else {
            return;
        };
        let text = self.hud_text();
        if self.last_hud.as_deref() == Some(text.as_str()) {
            return;
        }
        // Only a delivered line counts; a dropped one is retried next tick.
        match hud.try_send(HudUpdate { mount: self.mount.clone(), text: text.clone() }) {
            Ok(()) => self.last_hud = Some(text),
            Err(TrySendError::Full(update)) => {
                trace!(target: "arcade::session", "HUD channel full, deferring '{}'", update.text);
            }
            Err(TrySendError::Disconnected(_)) => {
                debug!(target: "arcade::session", "HUD receiver gone for '{}'", self.mount);
                self.last_hud = Some(text);
            }
        }
    }
}

//=== Scene Integration ===================================================

impl<G: Game> Scene<GameKind, ArcadeAction> for GameSession<G> {
    fn on_enter(&mut self, context: &GlobalContext<GameKind, ArcadeAction>) {
        self.setup(context.clock.now);
    }

    fn update(&mut self, context: &mut GlobalContext<GameKind, ArcadeAction>) {
        let frame = Frame::new(
            context.clock.now,
            context.clock.delta,
            &context.actions,
            context.input_state.pointer(),
        );
        self.step(&frame);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
