use std::env;
use std::io::Cursor;
use std::sync::{Mutex, OnceLock};

use rust_decimal::Decimal;
use serde_json::Value;
use toyshop_cli::commands::{config, inventory, session, simulate};
use toyshop_core::config::AppConfig;
use toyshop_core::{EntryId, SeedItem, Shop};

fn milk_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.shop.seed =
        vec![SeedItem { id: None, name: "Milk".into(), price: Decimal::new(200, 0), stock: 3 }];
    config
}

#[test]
fn inventory_lists_default_seed() {
    let result = inventory::run(&AppConfig::default());
    assert_eq!(result.exit_code, 0, "expected inventory success");

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "inventory");
    assert_eq!(payload["status"], "ok");
    assert_eq!(payload["currency"], "USD");
    assert_eq!(payload["store"][0]["name"], "Teddy bear");
    assert_eq!(payload["store"][0]["id"], 0);
}

#[test]
fn simulate_runs_milk_scenario() {
    let config = milk_config();

    let result = simulate::run(&config, "cart:0,cart:0,cart:0");
    assert_eq!(result.exit_code, 0);
    let payload = parse_payload(&result.output);
    assert_eq!(payload["store"][0]["quantity"], 0);
    assert_eq!(payload["cart"][0]["quantity"], 3);
    assert_eq!(payload["total"], "600");

    let result = simulate::run(&config, "cart:0,cart:0,cart:0,store:0");
    let payload = parse_payload(&result.output);
    assert_eq!(payload["store"][0]["quantity"], 1);
    assert_eq!(payload["cart"][0]["quantity"], 2);
    assert_eq!(payload["total"], "400");

    let result = simulate::run(&config, "cart:0,cart:0,cart:0,store:0,store:0,store:0");
    let payload = parse_payload(&result.output);
    assert_eq!(payload["store"][0]["quantity"], 3);
    assert_eq!(payload["cart"].as_array().map(Vec::len), Some(0));
    assert_eq!(payload["total"], "0");
    assert_eq!(payload["transfers"][5]["cart_entry_removed"], true);
}

#[test]
fn simulate_reports_out_of_stock_as_transfer_outcome() {
    let result = simulate::run(&milk_config(), "cart:0,cart:0,cart:0,cart:0");
    assert_eq!(result.exit_code, 0);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["transfers"][3]["outcome"], "out_of_stock");
    assert_eq!(payload["total"], "600");
}

#[test]
fn simulate_fails_on_return_without_cart_entry() {
    let result = simulate::run(&milk_config(), "cart:0,store:0,store:0");
    assert_eq!(result.exit_code, 4);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["command"], "simulate");
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_class"], "shop");
    assert_eq!(payload["message"], "step 3: item 0 is not in the cart");
}

#[test]
fn simulate_stops_when_total_would_overflow() {
    let huge = Decimal::from_i128_with_scale(40_000_000_000_000_000_000_000_000_000, 0);
    let mut config = AppConfig::default();
    config.shop.seed = ["Gold robot", "Gold kite"]
        .into_iter()
        .map(|name| SeedItem { id: None, name: name.into(), price: huge, stock: 1 })
        .collect();

    let result = simulate::run(&config, "cart:0,cart:1");
    assert_eq!(result.exit_code, 4);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["error_class"], "shop");
    assert_eq!(payload["message"], "step 2: cart total cannot absorb the price of entry 1");
}

#[test]
fn simulate_rejects_malformed_script() {
    let result = simulate::run(&milk_config(), "cart:0,shelf:0");
    assert_eq!(result.exit_code, 2);

    let payload = parse_payload(&result.output);
    assert_eq!(payload["error_class"], "invalid_move");
}

#[test]
fn session_applies_typed_handles_until_quit() {
    let shop = Shop::from_seed("USD", milk_config().shop.seed).expect("seed");
    let input = Cursor::new("s0\ns0\nc0\nbogus\nlist\nquit\ns0\n");
    let mut output = Vec::new();

    let summary = session::run_with_io(shop, input, &mut output).expect("session should finish");

    assert_eq!(summary.transfers, 3);
    assert_eq!(summary.cart_entries, 1);
    assert_eq!(summary.total, Decimal::new(200, 0));

    let text = String::from_utf8(output).expect("utf8 output");
    assert!(text.contains("[c0] Milk | 200 | 2"));
    assert!(text.contains("No row labelled `bogus`"));
    assert!(text.ends_with("Total: 200 USD\n"));
}

#[test]
fn session_reports_out_of_stock_and_keeps_running() {
    let mut seed = milk_config().shop.seed;
    seed[0].stock = 0;
    seed.push(SeedItem {
        id: Some(EntryId(5)),
        name: "Kite".into(),
        price: Decimal::new(30, 0),
        stock: 1,
    });
    let shop = Shop::from_seed("USD", seed).expect("seed");
    let mut output = Vec::new();

    let summary =
        session::run_with_io(shop, Cursor::new("s0\ns5\n"), &mut output).expect("session");

    assert_eq!(summary.transfers, 1);
    let text = String::from_utf8(output).expect("utf8 output");
    assert!(text.contains("Milk is out of stock."));
    assert!(text.contains("[c5] Kite | 30 | 1"));
}

#[test]
fn config_command_attributes_env_sources() {
    with_env(&[("TOYSHOP_SHOP_CURRENCY", "EUR")], || {
        let mut config = AppConfig::default();
        config.shop.currency = "EUR".to_string();

        let output = config::run(&config, None);
        assert!(output.contains("- shop.currency = EUR (source: env (TOYSHOP_SHOP_CURRENCY))"));
        assert!(output.contains("- logging.level = info (source: default)"));
        assert!(output.contains("Teddy bear @ 25.00 x 3 (id: auto)"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "TOYSHOP_SHOP_CURRENCY",
        "TOYSHOP_LOGGING_LEVEL",
        "TOYSHOP_LOGGING_FORMAT",
        "TOYSHOP_LOG_LEVEL",
        "TOYSHOP_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
