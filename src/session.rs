//! # Control session
//!
//! Runs the control loop on its own tokio task at [`TICK_HZ`], whether or not
//! the window is being repainted. Every tick it:
//!
//! 1. reads the latest keyboard snapshot published by the UI,
//! 2. polls the gamepad,
//! 3. advances the [`ActuatorState`],
//! 4. writes the actuator frame to the hand,
//! 5. picks up the hand's latest status line.
//!
//! ```text
//!          KeyboardSnapshot (watch)
//!  UI ─────────────────────────────► ControlSession ──► HandLink<Streaming>
//!     ◄──── ActuatorState, HandStatus (watch) ───┘
//! ```
//!
//! The session owns the actuator state; the UI only sees copies. It ends with
//! `Ok` once the UI drops its [`SessionHandle`], or with the [`LinkError`] that
//! stopped it.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::control::{ActuatorState, ControlBindings, DeviceSnapshot, KeyboardSnapshot};
use crate::controller::GamepadPoller;
use crate::serial::link::{HandLink, HandStatus, LinkError, Streaming};
use crate::serial::ActuatorFrame;

/// Control loop rate
pub const TICK_HZ: u32 = 30;

pub fn tick_interval() -> Duration {
    Duration::from_secs(1) / TICK_HZ
}

/// Gamepad input polled once per tick
pub trait DeviceSource: Send {
    fn poll(&mut self) -> DeviceSnapshot;
}

impl DeviceSource for GamepadPoller {
    fn poll(&mut self) -> DeviceSnapshot {
        GamepadPoller::poll(self)
    }
}

/// UI side of a running session
pub struct SessionHandle {
    keyboard: watch::Sender<KeyboardSnapshot>,
    state: watch::Receiver<ActuatorState>,
    status: watch::Receiver<HandStatus>,
}

impl SessionHandle {
    /// Publishes the keys currently held down
    pub fn set_keyboard(&self, snapshot: KeyboardSnapshot) {
        self.keyboard.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }

    pub fn state(&self) -> ActuatorState {
        *self.state.borrow()
    }

    pub fn status(&self) -> HandStatus {
        self.status.borrow().clone()
    }
}

pub struct ControlSession {
    state: ActuatorState,
    bindings: ControlBindings,

    // None when gilrs failed to start
    gamepad: Option<Box<dyn DeviceSource>>,

    link: HandLink<Streaming>,

    keyboard: watch::Receiver<KeyboardSnapshot>,
    state_sender: watch::Sender<ActuatorState>,
    status_sender: watch::Sender<HandStatus>,
}

impl ControlSession {
    pub fn new(
        bindings: ControlBindings,
        link: HandLink<Streaming>,
        status: HandStatus,
        gamepad: Option<Box<dyn DeviceSource>>,
    ) -> (Self, SessionHandle) {
        let state = ActuatorState::default();
        let (keyboard_sender, keyboard) = watch::channel(KeyboardSnapshot::default());
        let (state_sender, state_receiver) = watch::channel(state);
        let (status_sender, status_receiver) = watch::channel(status);

        let session = Self {
            state,
            bindings,
            gamepad,
            link,
            keyboard,
            state_sender,
            status_sender,
        };
        let handle = SessionHandle {
            keyboard: keyboard_sender,
            state: state_receiver,
            status: status_receiver,
        };
        (session, handle)
    }

    pub fn spawn(self) -> JoinHandle<Result<(), LinkError>> {
        info!(
            "Control loop starting on {} at {} Hz",
            self.link.port_name(),
            TICK_HZ
        );
        tokio::spawn(self.run())
    }

    /// Ticks until the UI goes away or the link fails
    pub async fn run(mut self) -> Result<(), LinkError> {
        let mut ticker = interval(tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if self.keyboard.has_changed().is_err() {
                info!("Window closed, stopping control loop");
                return Ok(());
            }
            self.step()?;
        }
    }

    fn step(&mut self) -> Result<(), LinkError> {
        let device = self
            .gamepad
            .as_mut()
            .map(|gamepad| gamepad.poll())
            .unwrap_or_default();

        let sources = {
            let keyboard = self.keyboard.borrow_and_update();
            self.state.tick(&keyboard, &device, &self.bindings)
        };
        debug!("Tick {:?} via {:?}", self.state, sources);

        self.link.send(&ActuatorFrame::encode(&self.state))?;
        self.state_sender.send_replace(self.state);

        if let Some(status) = self.link.poll_status()? {
            info!("Robot hand says: {}", status.text);
            self.status_sender.send_replace(status);
        }
        Ok(())
    }
}
