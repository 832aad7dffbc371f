//! Async driver for a [`GestureDispatcher`].
//!
//! Frames arrive over an `mpsc` channel whose sender may live on any thread.
//! The loop itself runs on the dispatcher's thread: it waits for either the
//! next frame or the earliest recognition deadline, whichever comes first,
//! and forwards every emitted signal to the output channel.
//!
//! The dispatcher is not `Send`, so the loop is awaited directly (or from a
//! `tokio::task::LocalSet`) rather than spawned onto the multi-thread
//! scheduler.

use std::time::Instant;

use tokio::sync::mpsc;

use crate::area::GestureSignal;
use crate::dispatch::GestureDispatcher;
use crate::registry::AreaId;
use crate::touch::TouchFrame;

/// Input accepted by [`run_event_loop`]
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Frame(TouchFrame),
    Shutdown,
}

/// A signal together with the area that emitted it
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub area: AreaId,
    pub signal: GestureSignal,
}

/// Counters reported when the loop exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub frames: usize,
    pub timer_wakeups: usize,
    pub signals: usize,
}

/// Drive `dispatcher` until the input closes, a [`InputEvent::Shutdown`]
/// arrives or the output receiver is dropped
pub async fn run_event_loop(
    dispatcher: &mut GestureDispatcher,
    mut input: mpsc::Receiver<InputEvent>,
    output: mpsc::UnboundedSender<SignalEvent>,
) -> LoopStats {
    let mut stats = LoopStats::default();
    tracing::debug!("Gesture event loop started");

    loop {
        let deadline = dispatcher.next_deadline();

        tokio::select! {
            event = input.recv() => match event {
                Some(InputEvent::Frame(frame)) => {
                    stats.frames += 1;
                    dispatcher.dispatch_frame(frame);
                }
                Some(InputEvent::Shutdown) => {
                    tracing::debug!("Shutdown requested");
                    break;
                }
                None => {
                    tracing::debug!("Input channel closed");
                    break;
                }
            },

            _ = sleep_until(deadline) => {
                stats.timer_wakeups += 1;
                dispatcher.process_timers();
            }
        }

        for (area, signal) in dispatcher.drain_signals() {
            if output.send(SignalEvent { area, signal }).is_err() {
                tracing::debug!("Signal receiver dropped, stopping");
                return stats;
            }
            stats.signals += 1;
        }
    }

    stats
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending::<()>().await,
    }
}
