mod common;

use common::{TestApp, names};
use googletest::prelude::*;
use serde_json::{Value, json};

const DEPARTMENTS_QUERY: &str = "{
    departments {
        name
        employees { totalCount edges { node { name } } }
    }
}";

#[tokio::test]
async fn test_nested_connections_share_one_query() {
    let app = TestApp::new();

    let response = app.query(DEPARTMENTS_QUERY).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.unwrap();
    let departments = data["departments"].as_array().unwrap();
    assert_that!(departments.len(), eq(3));

    assert_eq!(names(&departments[0]["employees"]), vec!["Peter", "Roy", "Ann"]);
    assert_eq!(names(&departments[1]["employees"]), vec!["Tracy"]);
    assert_that!(departments[2]["name"].as_str(), some(eq("Sales")));
    assert_that!(departments[2]["employees"]["totalCount"].as_i64(), some(eq(0)));
    assert_that!(names(&departments[2]["employees"]).len(), eq(0));

    let batches = app.batch_statements();
    assert_that!(batches.len(), eq(1));
    assert_that!(
        batches[0].as_str(),
        eq(
            "SELECT c.*, c.department_id AS __batch_key FROM employees c WHERE c.department_id IN (?, ?, ?) ORDER BY c.id"
        )
    );
}

#[tokio::test]
async fn test_nested_connection_arguments_apply_per_parent() {
    let app = TestApp::new();

    let response = app
        .query(
            "{
                departments {
                    employees(last: 1) {
                        edges { node { name } }
                        pageInfo { hasPreviousPage hasNextPage }
                    }
                }
            }",
        )
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.unwrap();
    let engineering = &data["departments"][0]["employees"];
    assert_eq!(names(engineering), vec!["Ann"]);
    assert_that!(
        engineering["pageInfo"]["hasPreviousPage"].as_bool(),
        some(eq(true))
    );
    assert_eq!(names(&data["departments"][1]["employees"]), vec!["Tracy"]);
    assert_that!(app.batch_statements().len(), eq(1));
}

#[tokio::test]
async fn test_to_one_and_many_to_many_are_batched() {
    let app = TestApp::new();

    let response = app
        .query(
            "{
                employees(first: 10) {
                    edges {
                        node {
                            name
                            department { name }
                            role { name }
                            projects { name }
                        }
                    }
                }
            }",
        )
        .await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.unwrap();
    let edges = data["employees"]["edges"].as_array().unwrap();
    assert_that!(edges.len(), eq(5));

    let peter = &edges[0]["node"];
    assert_that!(peter["department"]["name"].as_str(), some(eq("Engineering")));
    assert_that!(peter["role"]["name"].as_str(), some(eq("Engineer")));
    assert_eq!(
        peter["projects"],
        json!([{"name": "Apollo"}, {"name": "Gemini"}])
    );

    let drew = &edges[4]["node"];
    assert_that!(drew["name"].as_str(), some(eq("Drew")));
    assert_that!(drew["department"].is_null(), eq(true));
    assert_that!(drew["role"].is_null(), eq(true));
    assert_eq!(drew["projects"], json!([]));

    let batches = app.batch_statements();
    assert_that!(batches.len(), eq(3));
    assert_that!(
        batches
            .iter()
            .any(|sql| sql.contains("FROM departments c WHERE c.id IN (?, ?)")),
        eq(true)
    );
    assert_that!(
        batches.iter().any(|sql| sql.contains(
            "FROM projects c JOIN employee_projects a ON a.project_id = c.id WHERE a.employee_id IN (?, ?, ?, ?, ?)"
        )),
        eq(true)
    );
}

#[tokio::test]
async fn test_role_employees_list_is_batched() {
    let app = TestApp::new();

    let response = app.query("{ roles { name employees { name } } }").await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let data = response.data.unwrap();
    assert_eq!(
        data["roles"][0]["employees"],
        json!([{"name": "Tracy"}, {"name": "Ann"}])
    );
    assert_that!(app.batch_statements().len(), eq(1));
}

#[tokio::test]
async fn test_requests_do_not_share_loaders() {
    let app = TestApp::new();

    app.query(DEPARTMENTS_QUERY).await;
    app.query(DEPARTMENTS_QUERY).await;

    assert_that!(app.batch_statements().len(), eq(2));
}

#[tokio::test]
async fn test_batched_http_request_gets_a_context_per_operation() {
    let app = TestApp::new();

    let body: Value = app
        .server
        .post("/graphql")
        .json(&json!([
            { "query": DEPARTMENTS_QUERY },
            { "query": DEPARTMENTS_QUERY },
        ]))
        .await
        .json();

    let responses = body.as_array().unwrap();
    assert_that!(responses.len(), eq(2));
    assert_eq!(responses[0], responses[1]);
    assert_that!(app.batch_statements().len(), eq(2));
}

#[tokio::test]
async fn test_batch_failure_reaches_every_parent() {
    let app = TestApp::new();
    app.store.make_unavailable("employees");

    let response = app.query(DEPARTMENTS_QUERY).await;

    // The departments themselves still resolve; only their employees fail.
    let data = response.data.unwrap();
    let departments = data["departments"].as_array().unwrap();
    assert_that!(departments.len(), eq(3));
    assert_that!(departments[0]["name"].as_str(), some(eq("Engineering")));
    assert!(departments.iter().all(|dept| dept["employees"].is_null()));

    assert_that!(response.errors.len(), eq(3));
    for error in &response.errors {
        assert_that!(error.code(), some(eq("BATCH_FETCH_FAILURE")));
        assert_that!(
            error.message.as_str(),
            eq("loading Department.employees -> Employee failed: table `employees` is unavailable")
        );
    }
    assert_that!(app.batch_statements().len(), eq(1));
}
