//! Live check against a public API: fetch the users list and validate it.
//!
//! Exits non-zero (and prints the first mismatch) if the API's shape drifts.
use anyhow::{Context, Result};
use json_vet::schema::{array, number, object, property, string, Schema};
use serde_json::Value;

const USERS_URL: &str = "http://jsonplaceholder.typicode.com/users";

fn users_schema() -> Schema {
    array(object(vec![
        property("id", number()),
        property("name", string()),
        property("username", string()),
        property("email", string()),
        property("phone", string()),
        property("website", string()),
        property("address", object(vec![
            property("street", string()),
            property("suite", string()),
            property("city", string()),
            property("zipcode", string()),
            property("geo", object(vec![
                property("lat", string()),
                property("lng", string()),
            ])),
        ])),
        property("company", object(vec![
            property("name", string()),
            property("catchPhrase", string()),
            property("bs", string()),
        ])),
    ]))
}

fn fetch_json(url: &str) -> Result<Value> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("request to {url} failed"))?
        .error_for_status()?;
    response.json::<Value>().context("response body is not JSON")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let json = fetch_json(USERS_URL)?;
    tracing::info!(url = USERS_URL, "fetched");

    let schema = users_schema();
    let validated = json_vet::validate(&schema, &json)
        .context("an error occurred, has the API changed?")?;

    assert!(std::ptr::eq(validated, &json));
    println!("Validated JSON is the exact same data, just another reference, no copy or mutations.");
    Ok(())
}
