//! One handler per subcommand. Handlers print to the writer they are given
//! and leave persistence of [`AppState`] to the caller.

pub mod checklist;
pub mod contract;
pub mod dashboard;
pub mod matches;
pub mod messages;
pub mod pricing;
pub mod signup;

use std::io::Write;

use anyhow::Result;

use crate::app::App;
use crate::cli::Command;
use crate::state::AppState;

pub async fn dispatch(
    command: Command,
    app: &App,
    state: &mut AppState,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Pricing(args) => pricing::run(app, &args, out),
        Command::Contract(args) => contract::run(app, state, &args, out).await,
        Command::Checklist(args) => checklist::run(state, &args, out),
        Command::Dashboard(args) => dashboard::run(app, state, &args, out).await,
        Command::Signup(args) => signup::run(app, state, args, out).await,
        Command::Matches(args) => matches::run(state, &args, out),
        Command::Messages(args) => messages::run(app, state, &args, out).await,
    }
}
