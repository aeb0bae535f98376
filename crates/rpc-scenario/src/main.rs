use std::time::Duration;

use clap::Parser;
use serde_json::Value;
use tracing::debug;

use rpc_scenario::ScenarioConfig;
use rpc_scenario::ScenarioContext;
use rpc_scenario::StepError;
use rpc_scenario::commands::Cli;
use rpc_scenario::commands::Commands;
use rpc_scenario::table;
use rpc_scenario::telemetry::init_tracing;
use rpc_scenario_client::ClientError;
use rpc_scenario_client::RequestId;

fn main() {
    let cli = Cli::parse();
    let _telemetry = init_tracing(if cli.verbose { "debug" } else { "warn" });

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), StepError> {
    let mut config = ScenarioConfig::from_env();
    if let Some(url) = cli.url {
        config = config.with_base_url(url);
    }
    if let Some(ms) = cli.timeout_ms {
        config = config.with_timeout(Duration::from_millis(ms));
    }
    for (name, value) in cli.headers {
        config = config.with_header(name, value);
    }
    debug!(base_url = %config.base_url, timeout = ?config.timeout, "Resolved configuration");

    match cli.command {
        Commands::Call {
            method,
            params,
            id,
            expect,
            count,
            all,
        } => {
            let param_rows = table::assignments(&params)?;
            let expect_rows = table::assignments(&expect)?;

            let mut ctx = ScenarioContext::new(config.build_client()?);
            if let Some(id) = id {
                ctx.set_request_id(request_id_from_arg(&id));
            }

            let exchange = if param_rows.is_empty() {
                ctx.send_request_without_params(&method)?
            } else {
                ctx.send_request(&method, &param_rows)?
            };
            println!("{}", pretty_body(&exchange.body));

            if expect_rows.is_empty() && count.is_none() {
                return match exchange.error() {
                    Some(error) => Err(StepError::Client(ClientError::Rpc {
                        code: error.code,
                        message: error.message.clone(),
                        data: error.data.clone(),
                    })),
                    None => Ok(()),
                };
            }

            match (all, count) {
                (true, _) => ctx.assert_result_all(&expect_rows, count),
                (false, Some(count)) => ctx.assert_result_with_count(&expect_rows, count),
                (false, None) => ctx.assert_result(&expect_rows),
            }
        }
    }
}

fn request_id_from_arg(raw: &str) -> RequestId {
    raw.parse::<i64>()
        .map(RequestId::Number)
        .unwrap_or_else(|_| RequestId::from(raw))
}

fn pretty_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| body.to_string())
}
