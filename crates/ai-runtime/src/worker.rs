//! Per-player async worker.
//!
//! The decision loop itself is synchronous and single-threaded; the worker
//! wraps it in a command loop so the game host can request turns, observe
//! progress and interrupt from its own thread.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc, oneshot};

use strategy_core::{ActionSink, CreatureOracle, GameEnv, MapOracle, PlayerId, WorldOracle};

use crate::engine::TurnEngine;
use crate::error::{Result, RuntimeError};
use crate::interrupt::Interrupt;

/// What the worker needs from the game host each turn. Oracles and the
/// action sink must come from disjoint parts of the host so a turn can read
/// the world while issuing actions.
pub trait GameHost: Send {
    fn split(
        &mut self,
    ) -> (
        &dyn MapOracle,
        &dyn WorldOracle,
        &dyn CreatureOracle,
        &mut dyn ActionSink,
    );
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnEvent {
    TurnStarted { player: PlayerId },
    TurnCompleted { player: PlayerId },
    TurnInterrupted { player: PlayerId },
}

pub enum Command {
    RunTurn { reply: oneshot::Sender<Result<()>> },
    Shutdown,
}

/// Owns a [`TurnEngine`] and a host connection, processing commands until
/// shut down.
pub struct AiWorker<H: GameHost> {
    engine: TurnEngine,
    player: PlayerId,
    host: H,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<TurnEvent>,
}

const COMMAND_BUFFER: usize = 8;
const EVENT_BUFFER: usize = 64;

impl<H: GameHost> AiWorker<H> {
    pub fn new(engine: TurnEngine, player: PlayerId, host: H) -> (Self, WorkerHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

        let handle = WorkerHandle {
            command_tx,
            event_tx: event_tx.clone(),
            interrupt: engine.interrupt_handle(),
        };

        (
            Self {
                engine,
                player,
                host,
                command_rx,
                event_tx,
            },
            handle,
        )
    }

    /// Main worker loop; runs until the channel closes or `Shutdown`.
    pub async fn run(mut self) {
        loop {
            match self.command_rx.recv().await {
                Some(Command::RunTurn { reply }) => {
                    let result = self.run_turn();
                    let _ = reply.send(result);
                }
                Some(Command::Shutdown) | None => break,
            }
        }
    }

    fn run_turn(&mut self) -> Result<()> {
        let _ = self.event_tx.send(TurnEvent::TurnStarted {
            player: self.player,
        });

        let (map, world, creatures, sink) = self.host.split();
        let env = GameEnv::new(map, world, creatures);

        let result = self.engine.make_turn(env, sink);

        let event = match &result {
            Ok(()) => TurnEvent::TurnCompleted {
                player: self.player,
            },
            Err(RuntimeError::Interrupted) => TurnEvent::TurnInterrupted {
                player: self.player,
            },
            Err(_) => TurnEvent::TurnCompleted {
                player: self.player,
            },
        };
        let _ = self.event_tx.send(event);

        result
    }
}

/// Cheap clonable handle the host keeps: request turns, subscribe to
/// events, interrupt the running turn.
#[derive(Clone)]
pub struct WorkerHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<TurnEvent>,
    interrupt: Interrupt,
}

impl WorkerHandle {
    pub async fn run_turn(&self) -> Result<()> {
        let (reply, response) = oneshot::channel();

        self.command_tx
            .send(Command::RunTurn { reply })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        response.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Requests the current turn to wind down at the next suspension point.
    pub fn interrupt(&self) {
        self.interrupt.trigger();
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TurnEvent> {
        self.event_tx.subscribe()
    }
}

/// Seam for hosts that want to drive turns through a trait object (e.g. to
/// swap a scripted runner in for tests).
#[async_trait]
pub trait TurnRunner: Send {
    async fn run_turn(&mut self) -> Result<()>;
}

#[async_trait]
impl TurnRunner for WorkerHandle {
    async fn run_turn(&mut self) -> Result<()> {
        WorkerHandle::run_turn(self).await
    }
}
