//! Terminal User Interface components

pub mod app;
pub mod event_loop;
pub mod ui;

use anyhow::Result;

use crate::cli::AppContext;

/// Run the Terminal User Interface
pub async fn run_tui(context: AppContext) -> Result<()> {
    let app = app::App::new(context);
    event_loop::run_tui_event_loop(app).await
}
