//! Step definitions delegating to `ScenarioContext`.

use cucumber::gherkin::Step;
use cucumber::given;
use cucumber::then;
use cucumber::when;
use rpc_scenario::StepError;

use crate::world::RpcWorld;

type StepResult = Result<(), StepError>;

fn rows(step: &Step) -> Vec<Vec<String>> {
    step.table
        .as_ref()
        .map(|table| table.rows.clone())
        .unwrap_or_default()
}

fn parse_code(raw: &str) -> Result<i64, StepError> {
    raw.trim().parse().map_err(|_| StepError::MalformedTable {
        row: 0,
        reason: format!("error code {raw:?} is not an integer"),
    })
}

#[given(regex = r#"^I set request id "([^"]*)"$"#)]
fn set_request_id(world: &mut RpcWorld, id: String) {
    world.context.set_request_id(id);
}

#[when(regex = r#"^(?:I )?send a request to "([^"]+)" with params:$"#)]
fn send_request(world: &mut RpcWorld, step: &Step, method: String) -> StepResult {
    world.context.send_request(&method, &rows(step))?;
    Ok(())
}

#[when(regex = r#"^(?:I )?send a request to "([^"]+)"$"#)]
fn send_request_without_params(world: &mut RpcWorld, method: String) -> StepResult {
    world.context.send_request_without_params(&method)?;
    Ok(())
}

#[then(regex = r"^(?:the )?response should contain result:$")]
fn response_contains_result(world: &mut RpcWorld, step: &Step) -> StepResult {
    world.context.assert_result(&rows(step))
}

#[then(regex = r"^(?:the )?response should contain (\d+) results?:$")]
fn response_contains_counted_result(
    world: &mut RpcWorld,
    step: &Step,
    count: usize,
) -> StepResult {
    world.context.assert_result_with_count(&rows(step), count)
}

#[then(regex = r"^(?:the )?response should contain (\d+) results?$")]
fn response_result_count(world: &mut RpcWorld, count: usize) -> StepResult {
    world.context.assert_result_count(count)
}

#[then(regex = r#"^(?:the )?result "([^"]+)" should be "([^"]*)"$"#)]
fn result_value(world: &mut RpcWorld, path: String, expected: String) -> StepResult {
    world.context.assert_result_value(&path, &expected)
}

#[then(regex = r#"^(?:the )?response should be error with id "([^"]+)", message "([^"]+)"$"#)]
fn response_is_error(world: &mut RpcWorld, code: String, message: String) -> StepResult {
    world.context.assert_error(parse_code(&code)?, &message)
}

#[then(
    regex = r#"^(?:the )?response should be error with id "([^"]+)", message "([^"]+)", data:$"#
)]
fn response_is_error_with_data(
    world: &mut RpcWorld,
    step: &Step,
    code: String,
    message: String,
) -> StepResult {
    world
        .context
        .assert_error_data(parse_code(&code)?, &message, &rows(step))
}

#[then(regex = r#"^(?:the )?response id should be "([^"]*)"$"#)]
fn response_id(world: &mut RpcWorld, id: String) -> StepResult {
    world.context.assert_response_id(&id)
}

#[then(regex = r"^(?:the )?response status should be (\d+)$")]
fn response_status(world: &mut RpcWorld, status: u16) -> StepResult {
    world.context.assert_status(status)
}
