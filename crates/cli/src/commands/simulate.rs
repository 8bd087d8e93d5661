use std::str::FromStr;

use serde::Serialize;
use toyshop_core::config::AppConfig;
use toyshop_core::{ApplicationError, EntryId, Shop, ShopSnapshot, Transfer};

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    ToCart(EntryId),
    ToStore(EntryId),
}

impl FromStr for Move {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (side, id) = value
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("move `{value}` must look like `cart:<id>` or `store:<id>`"))?;
        let id = id
            .trim()
            .parse::<u32>()
            .map(EntryId)
            .map_err(|_| format!("move `{value}` has a non-numeric item id"))?;

        match side.trim().to_ascii_lowercase().as_str() {
            "cart" => Ok(Self::ToCart(id)),
            "store" => Ok(Self::ToStore(id)),
            other => Err(format!("unknown move target `{other}` (expected cart|store)")),
        }
    }
}

pub fn parse_moves(script: &str) -> Result<Vec<Move>, String> {
    script.split(',').filter(|step| !step.trim().is_empty()).map(str::parse).collect()
}

#[derive(Debug, Serialize)]
struct SimulationOutput {
    transfers: Vec<Transfer>,
    #[serde(flatten)]
    snapshot: ShopSnapshot,
}

pub fn run(config: &AppConfig, script: &str) -> CommandResult {
    let moves = match parse_moves(script) {
        Ok(moves) => moves,
        Err(message) => return CommandResult::failure("simulate", "invalid_move", message, 2),
    };

    let mut shop = match Shop::from_seed(config.shop.currency.clone(), config.shop.seed.clone()) {
        Ok(shop) => shop,
        Err(error) => return CommandResult::failure("simulate", "seed", error.to_string(), 3),
    };

    let mut transfers = Vec::with_capacity(moves.len());
    for (step, next) in moves.into_iter().enumerate() {
        let applied = match next {
            Move::ToCart(id) => shop.move_to_cart(id),
            Move::ToStore(id) => shop.move_to_store(id).map(Transfer::Moved),
        };

        match applied {
            Ok(transfer) => transfers.push(transfer),
            Err(error) => {
                let error = ApplicationError::from(error);
                return CommandResult::failure(
                    "simulate",
                    error.error_class(),
                    format!("step {}: {error}", step + 1),
                    4,
                );
            }
        }
    }

    CommandResult::report("simulate", &SimulationOutput { transfers, snapshot: shop.snapshot() })
}

#[cfg(test)]
mod tests {
    use toyshop_core::EntryId;

    use super::{parse_moves, Move};

    #[test]
    fn parses_mixed_script_ignoring_blank_steps() {
        let moves = parse_moves("cart:0, cart:2,,store:0 ").expect("script should parse");
        assert_eq!(
            moves,
            vec![Move::ToCart(EntryId(0)), Move::ToCart(EntryId(2)), Move::ToStore(EntryId(0))]
        );
    }

    #[test]
    fn rejects_unknown_targets_and_ids() {
        let error = parse_moves("basket:1").expect_err("unknown target");
        assert!(error.contains("basket"));

        let error = parse_moves("cart:one").expect_err("non-numeric id");
        assert!(error.contains("non-numeric"));

        let error = parse_moves("cart").expect_err("missing separator");
        assert!(error.contains("cart:<id>"));
    }
}
