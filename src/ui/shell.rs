//! The single consumer loop: one event at a time, draw when dirty.

use anyhow::Result;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    domain::events::SessionEvent,
    usecases::{contracts::ChatService, gateway::TaskGateway, session::SessionController},
};

use super::{terminal::TerminalSession, view};

/// Runs the session until the controller stops. All state mutation
/// happens here, on events pulled from the one channel; gateway tasks
/// only ever push events back into it.
pub async fn run<S: ChatService + 'static>(
    terminal: &mut TerminalSession,
    controller: &mut SessionController,
    gateway: &TaskGateway<S>,
    events: &mut UnboundedReceiver<SessionEvent>,
) -> Result<()> {
    tracing::info!(
        channel = controller.state().channel_id(),
        "starting session loop"
    );

    gateway.dispatch(controller.startup_requests());

    // Crossterm only reports future resizes; seed the first layout
    // from the current terminal size so the session becomes ready.
    let (width, height) = terminal.size()?;
    let requests = controller.handle_event(SessionEvent::Resized { width, height });
    gateway.dispatch(requests);

    while controller.state().is_running() {
        if controller.state_mut().take_dirty() {
            terminal.draw(|frame| view::render(frame, controller.state()))?;
        }

        let Some(event) = events.recv().await else {
            tracing::warn!("event channel closed, stopping session");
            break;
        };
        let requests = controller.handle_event(event);
        gateway.dispatch(requests);
    }

    tracing::info!(ticks = controller.state().tick_count(), "session stopped");
    Ok(())
}
