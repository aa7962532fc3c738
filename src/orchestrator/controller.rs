//! Wizard lifecycle controller.
//!
//! Owns the wizard, applies commands from presentation layers, runs provider
//! calls and publishes snapshots back.

use crate::model::{FoodRecommendation, InfoEvent, RecommendationRequest, WizardEvent};
use crate::provider::{ProviderError, RecommendationProvider};
use crate::wizard::{Action, Effect, Wizard, WizardSnapshot, WizardState};
use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

/// Commands emitted by UI layers.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum UiCommand {
    Wizard(Action),
    Quit,
}

type Outcome = Result<Vec<FoodRecommendation>, ProviderError>;
type InFlight = BoxFuture<'static, (u64, Result<Outcome, tokio::task::JoinError>)>;

async fn fetch(provider: &dyn RecommendationProvider, req: &RecommendationRequest) -> Outcome {
    provider
        .fetch_recommendations(&req.mood, &req.meal_type, &req.cuisines)
        .await
}

/// Flatten a joined provider task into its outcome.
///
/// A task that panicked or was cancelled has no description to show, so it
/// resolves as [`ProviderError::Unspecified`].
fn join_outcome(joined: Result<Outcome, tokio::task::JoinError>) -> Outcome {
    match joined {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(error = %e, "recommendation task did not complete");
            Err(ProviderError::Unspecified)
        }
    }
}

fn publish(event_tx: &UnboundedSender<WizardEvent>, wizard: &Wizard) {
    let _ = event_tx.send(WizardEvent::StateChanged {
        snapshot: Box::new(WizardSnapshot::from(wizard.state())),
    });
}

/// Drive the wizard from UI commands until quit, emitting events for presentation layers.
///
/// `preselect` is applied before the first command is read.
pub(crate) async fn run_controller(
    provider: Arc<dyn RecommendationProvider>,
    preselect: Vec<Action>,
    event_tx: UnboundedSender<WizardEvent>,
    mut cmd_rx: UnboundedReceiver<UiCommand>,
) -> Result<()> {
    let mut wizard = Wizard::new();
    // Calls are never cancelled; a call outlived by StartOver still resolves here
    // and the wizard discards it by generation.
    let mut in_flight: FuturesUnordered<InFlight> = FuturesUnordered::new();

    for action in preselect {
        wizard.dispatch(action);
    }
    publish(&event_tx, &wizard);

    loop {
        let effect = tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UiCommand::Wizard(action)) => wizard.dispatch(action),
                    Some(UiCommand::Quit) | None => break,
                }
            }
            Some((generation, joined)) = in_flight.next(), if !in_flight.is_empty() => {
                wizard.dispatch(Action::Resolved {
                    generation,
                    outcome: join_outcome(joined),
                })
            }
        };

        match effect {
            Some(Effect::Fetch(req)) => {
                let provider = provider.clone();
                let generation = req.generation;
                let handle = tokio::spawn(async move { fetch(provider.as_ref(), &req).await });
                in_flight.push(async move { (generation, handle.await) }.boxed());
                let _ = event_tx.send(WizardEvent::Info(InfoEvent::Dispatched { generation }));
            }
            Some(Effect::DiscardedStale { generation }) => {
                let _ = event_tx.send(WizardEvent::Info(InfoEvent::DiscardedStale { generation }));
            }
            None => {}
        }
        publish(&event_tx, &wizard);
    }

    tracing::debug!(pending = in_flight.len(), "controller stopped");
    Ok(())
}

/// Apply `actions` in order, awaiting each dispatched call before the next
/// action, and return the final state.
pub(crate) async fn run_once(
    provider: &dyn RecommendationProvider,
    actions: Vec<Action>,
) -> WizardState {
    let mut wizard = Wizard::new();
    for action in actions {
        let mut effect = wizard.dispatch(action);
        while let Some(Effect::Fetch(req)) = effect {
            let outcome = fetch(provider, &req).await;
            effect = wizard.dispatch(Action::Resolved {
                generation: req.generation,
                outcome,
            });
        }
    }
    wizard.state().clone()
}
