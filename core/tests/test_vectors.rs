//! Verify build/parse methods against the JSON test vectors in `test-vectors/`.
//!
//! Each case names an operation, its inputs, the request it must produce, a
//! simulated response, and either the parsed result or the expected error.
//! Results are compared as typed values, errors by kind and message.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde_json::Value;
use threescale_client::{
    AdminPortal, Application, ApplicationClient, ApplicationList, ApplicationPlan, ClientError, HttpMethod,
    HttpRequest, HttpResponse, Params,
};
use url::{form_urlencoded, Url};

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let pair = pair.as_array().unwrap();
            (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn build(client: &ApplicationClient, operation: &str, input: &Value) -> HttpRequest {
    let account_id = || input["account_id"].as_i64().unwrap();
    let application_id = || input["application_id"].as_i64().unwrap();

    match operation {
        "create_application" => client.build_create_application(
            account_id(),
            input["plan_id"].as_i64().unwrap(),
            input["name"].as_str().unwrap(),
            input["description"].as_str().unwrap(),
        ),
        "list_applications" => client.build_list_applications(account_id()),
        "list_all_applications" => client.build_list_all_applications(),
        "read_application" => client.build_read_application(account_id(), application_id()),
        "update_application" => {
            let params: Params = input["params"]
                .as_object()
                .unwrap()
                .iter()
                .map(|(k, v)| (k.clone(), v.as_str().unwrap().to_string()))
                .collect();
            client.build_update_application(account_id(), application_id(), &params)
        }
        "delete_application" => client.build_delete_application(account_id(), application_id()),
        "change_application_plan" => {
            client.build_change_application_plan(account_id(), application_id(), input["plan_id"].as_i64().unwrap())
        }
        "create_application_custom_plan" => client.build_create_application_custom_plan(account_id(), application_id()),
        "delete_application_custom_plan" => client.build_delete_application_custom_plan(account_id(), application_id()),
        "suspend_application" => client.build_suspend_application(account_id(), application_id()),
        "resume_application" => client.build_resume_application(account_id(), application_id()),
        other => panic!("unknown operation: {other}"),
    }
    .unwrap()
}

fn check<T>(name: &str, result: Result<T, ClientError>, case: &Value)
where
    T: DeserializeOwned + PartialEq + Debug,
{
    match case.get("expected_error") {
        Some(expected) => {
            let err = result.unwrap_err();
            match expected["kind"].as_str().unwrap() {
                "api" => {
                    let api = err.as_api_err().unwrap_or_else(|| panic!("{name}: expected ApiErr, got {err:?}"));
                    assert_eq!(u64::from(api.code()), expected["code"].as_u64().unwrap(), "{name}: code");
                    assert_eq!(err.to_string(), expected["message"].as_str().unwrap(), "{name}: message");
                }
                "decode" => match err {
                    ClientError::Decode { format, .. } => {
                        assert_eq!(format, expected["format"].as_str().unwrap(), "{name}: format")
                    }
                    other => panic!("{name}: expected decode error, got {other:?}"),
                },
                other => panic!("{name}: unknown expected_error kind: {other}"),
            }
        }
        None => {
            let parsed = result.unwrap_or_else(|err| panic!("{name}: unexpected error {err}"));
            let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(parsed, expected, "{name}: parsed result");
        }
    }
}

#[test]
fn application_test_vectors() {
    let raw = include_str!("../../test-vectors/applications.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let portal = AdminPortal::parse(vectors["base_url"].as_str().unwrap()).unwrap();
    let client = ApplicationClient::new(portal, vectors["access_token"].as_str().unwrap());

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let operation = case["operation"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = build(&client, operation, &case["input"]);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");

        let url = Url::parse(&req.url).unwrap();
        assert_eq!(url.path(), expected_req["path"].as_str().unwrap(), "{name}: path");

        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        match expected_req["query"] {
            Value::Null => assert!(query.is_empty(), "{name}: query should be empty"),
            ref expected => assert_eq!(query, pairs(expected), "{name}: query"),
        }

        match expected_req["form"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            ref expected => {
                let form: Vec<(String, String)> =
                    form_urlencoded::parse(req.body.as_deref().unwrap().as_bytes()).into_owned().collect();
                assert_eq!(form, pairs(expected), "{name}: form body");
            }
        }
        assert_eq!(req.headers, pairs(&case["expected_headers"]), "{name}: headers");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        match operation {
            "create_application" => check::<Application>(name, client.parse_created_application(response), case),
            "list_applications" | "list_all_applications" => {
                check::<ApplicationList>(name, client.parse_application_list(response), case)
            }
            "create_application_custom_plan" => {
                check::<ApplicationPlan>(name, client.parse_application_plan(response), case)
            }
            "delete_application" | "delete_application_custom_plan" => {
                check::<()>(name, client.parse_empty(response), case)
            }
            _ => check::<Application>(name, client.parse_application(response), case),
        }
    }
}
