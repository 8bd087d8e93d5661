use std::io::{self, BufRead, Write};

use rust_decimal::Decimal;
use serde::Serialize;
use toyshop_core::config::AppConfig;
use toyshop_core::{ApplicationError, Shop};
use tracing::info;

use crate::adapter::{Activation, TerminalAdapter};
use crate::commands::CommandResult;

const HELP: &str = "Type a row label (s<id> to add to cart, c<id> to return to store), \
`list` to redraw, `help` for this message, or `quit` to leave.";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub transfers: usize,
    pub cart_entries: usize,
    pub total: Decimal,
    pub currency: String,
}

pub fn run(config: &AppConfig) -> CommandResult {
    let shop = match Shop::from_seed(config.shop.currency.clone(), config.shop.seed.clone()) {
        Ok(shop) => shop,
        Err(error) => return CommandResult::failure("session", "seed", error.to_string(), 3),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_with_io(shop, stdin.lock(), stdout.lock()) {
        Ok(summary) => CommandResult::report("session", &summary),
        Err(error) => {
            CommandResult::failure("session", error.error_class(), error.to_string(), 5)
        }
    }
}

/// Drives one interactive session until `quit` or end of input.
pub fn run_with_io(
    shop: Shop,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<SessionSummary, ApplicationError> {
    let mut adapter = TerminalAdapter::new(shop);
    adapter.render(&mut output)?;
    writeln!(output, "{HELP}")?;

    for line in input.lines() {
        let line = line?;
        let command = line.trim();

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => writeln!(output, "{HELP}")?,
            "list" => adapter.render(&mut output)?,
            handle => match adapter.activate(handle, &mut output)? {
                Activation::Applied => {}
                Activation::Rejected(message) => writeln!(output, "{message}")?,
                Activation::UnknownHandle => {
                    writeln!(output, "No row labelled `{handle}`. Type `help` for usage.")?
                }
            },
        }
        output.flush()?;
    }

    let shop = adapter.shop();
    let summary = SessionSummary {
        transfers: adapter.transfers(),
        cart_entries: shop.cart().len(),
        total: shop.total(),
        currency: shop.currency().to_string(),
    };

    info!(
        event_name = "session.finished",
        transfers = summary.transfers,
        cart_entries = summary.cart_entries,
        total = %summary.total,
        "toyshop session finished"
    );
    Ok(summary)
}
