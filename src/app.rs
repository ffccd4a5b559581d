use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::{
    cli::Cli,
    domain::{history_log::HistoryLog, session_state::SessionState},
    infra::{self, error::AppError, storage_layout::StorageLayout},
    slack::SlackClient,
    ui,
    usecases::{contracts::ChatService, gateway::TaskGateway, session::SessionController},
};

pub fn run(cli: Cli) -> Result<()> {
    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;
    let _log_guard = infra::logging::init(&layout)?;

    let client = SlackClient::from_env()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::RuntimeBuild)?;

    runtime.block_on(run_session(cli, layout, client))
}

async fn run_session(cli: Cli, layout: StorageLayout, client: SlackClient) -> Result<()> {
    // Resolved once; a lookup failure falls back to the raw id so the
    // session still starts.
    let channel_name = match client.channel_info(&cli.channel_id).await {
        Ok(info) => info.name,
        Err(error) => {
            tracing::warn!(error = %error, "channel lookup failed, using raw id as name");
            cli.channel_id.clone()
        }
    };

    let history = HistoryLog::load(layout.history_file(&cli.workspace, &cli.channel_id))?;
    let state = SessionState::new(cli.channel_id.clone(), channel_name, history);
    let mut controller = SessionController::new(state);

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    ui::event_source::spawn_input_thread(events_tx.clone());
    let gateway = TaskGateway::new(Arc::new(client), cli.channel_id, events_tx);

    let mut terminal = ui::terminal::TerminalSession::new()?;
    ui::shell::run(&mut terminal, &mut controller, &gateway, &mut events_rx).await
}
