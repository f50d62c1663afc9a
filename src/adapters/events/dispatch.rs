//! Fire-and-forget handler dispatch.
//!
//! One emit becomes one spawned task. Inside it every handler future is
//! created and first polled in registration order, then all of them run
//! concurrently. Each handler is isolated: an `Err` or a panic is logged
//! with the event id and type and counted, never propagated.
//!
//! The runtime does not start spawned tasks in spawn order (a worker runs
//! its most recent spawn first), so the dispatches of one bus are chained
//! through a [`StartSequencer`]. A dispatch polls its handlers only after
//! the previous dispatch has polled all of its own once.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::Poll;

use futures::future::join_all;
use futures::FutureExt;
use tokio::sync::oneshot;

use crate::domain::events::Event;
use crate::domain::foundation::DomainError;
use crate::ports::{Dispatch, DispatchSummary, EventHandler};

/// Orders handler start across consecutive dispatches of one bus.
#[derive(Debug, Default)]
pub(crate) struct StartSequencer {
    last_started: Mutex<Option<oneshot::Receiver<()>>>,
}

impl StartSequencer {
    /// Takes the next place in line.
    ///
    /// Returns the signal of the dispatch ahead (if any) and the sender this
    /// dispatch fires once its handlers have started.
    fn next_slot(&self) -> (Option<oneshot::Receiver<()>>, oneshot::Sender<()>) {
        let (started_tx, started_rx) = oneshot::channel();
        let mut last = self
            .last_started
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        (last.replace(started_rx), started_tx)
    }
}

/// Spawn the handlers for one event without waiting for them.
pub(crate) fn spawn_dispatch(
    sequencer: &StartSequencer,
    event: Event,
    handlers: Vec<Arc<dyn EventHandler>>,
) -> Dispatch {
    if handlers.is_empty() {
        return Dispatch::empty();
    }

    let (ahead, started) = sequencer.next_slot();
    let scheduled = handlers.len();
    let task = tokio::spawn(async move {
        if let Some(ahead) = ahead {
            // A closed channel means the earlier task is gone; nothing left to wait for.
            let _ = ahead.await;
        }

        let runs = join_all(
            handlers
                .iter()
                .map(|handler| run_isolated(handler.as_ref(), &event)),
        );
        tokio::pin!(runs);

        let first_poll = futures::poll!(runs.as_mut());
        let _ = started.send(());
        let outcomes = match first_poll {
            Poll::Ready(outcomes) => outcomes,
            Poll::Pending => runs.await,
        };

        let succeeded = outcomes.iter().filter(|ok| **ok).count();
        DispatchSummary {
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    });

    Dispatch::new(scheduled, task)
}

/// Run one handler, containing its failure. Returns whether it succeeded.
async fn run_isolated(handler: &dyn EventHandler, event: &Event) -> bool {
    let error = match AssertUnwindSafe(handler.handle(event)).catch_unwind().await {
        Ok(Ok(())) => return true,
        Ok(Err(error)) => error,
        Err(panic) => {
            DomainError::handler_failure(handler.name(), panic_message(panic.as_ref()))
        }
    };

    tracing::error!(
        event_id = %event.id(),
        event_type = %event.kind(),
        handler = handler.name(),
        error_code = %error.code,
        error = %error,
        "Event handler failed"
    );
    false
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::LessonCompleted;
    use crate::domain::foundation::{CourseId, LessonId, TenantId, UserId};
    use async_trait::async_trait;

    #[test]
    fn panic_message_reads_str_and_string_payloads() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");

        let boxed: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }

    #[test]
    fn sequencer_hands_each_slot_the_previous_signal() {
        let sequencer = StartSequencer::default();

        let (ahead_of_first, first_started) = sequencer.next_slot();
        let (ahead_of_second, _second_started) = sequencer.next_slot();

        assert!(ahead_of_first.is_none());
        let mut ahead_of_second = ahead_of_second.unwrap();
        assert!(ahead_of_second.try_recv().is_err());

        first_started.send(()).unwrap();
        assert_eq!(ahead_of_second.try_recv(), Ok(()));
    }

    #[tokio::test]
    async fn dispatch_after_an_abandoned_slot_still_runs() {
        struct Noop;

        #[async_trait]
        impl EventHandler for Noop {
            async fn handle(&self, _: &Event) -> Result<(), DomainError> {
                Ok(())
            }
            fn name(&self) -> &'static str {
                "Noop"
            }
        }

        let sequencer = StartSequencer::default();
        drop(sequencer.next_slot());

        let event = Event::new(
            TenantId::new("t-1").unwrap(),
            LessonCompleted {
                user_id: UserId::new("u-1").unwrap(),
                lesson_id: LessonId::new("l-1").unwrap(),
                course_id: CourseId::new("c-1").unwrap(),
            },
        );
        let handlers: Vec<Arc<dyn EventHandler>> = vec![Arc::new(Noop)];
        let summary = spawn_dispatch(&sequencer, event, handlers)
            .settled()
            .await;

        assert_eq!(summary.succeeded, 1);
    }
}
