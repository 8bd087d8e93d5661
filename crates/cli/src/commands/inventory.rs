use serde::Serialize;
use toyshop_core::config::AppConfig;
use toyshop_core::{Entry, Shop};

use crate::commands::CommandResult;

#[derive(Debug, Serialize)]
struct InventoryOutput {
    currency: String,
    store: Vec<Entry>,
}

pub fn run(config: &AppConfig) -> CommandResult {
    let shop = match Shop::from_seed(config.shop.currency.clone(), config.shop.seed.clone()) {
        Ok(shop) => shop,
        Err(error) => {
            return CommandResult::failure("inventory", "seed", error.to_string(), 3);
        }
    };

    let output = InventoryOutput {
        currency: shop.currency().to_string(),
        store: shop.store().iter().cloned().collect(),
    };
    CommandResult::report("inventory", &output)
}
