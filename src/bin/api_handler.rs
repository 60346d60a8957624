//! AWS Lambda handler exposing the agency API over JSON
//!
//! Routes mirror the back-office UI's needs: client and policy CRUD, the
//! dashboard stats object, and the renew action. Supports Lambda Function
//! URLs for direct HTTP access.

use agency_system::dashboard::{compute_dashboard_stats, renew_policy};
use agency_system::store::{
    ClientUpdate, InMemoryStore, NewClient, NewPolicy, PolicyUpdate, RecordStore, StoreError,
};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};

fn json_response<T: Serialize>(status: u16, body: &T) -> Response<Body> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn message_response(status: u16, message: &str) -> Response<Body> {
    // Messages can embed arbitrary text (serde_json error output quotes the
    // offending value), so the body must go through the serializer.
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(
            serde_json::json!({ "message": message }).to_string(),
        ))
        .unwrap()
}

/// Validation errors carry the offending field; not-found stays distinct
fn store_error_response(err: StoreError) -> Response<Body> {
    match err {
        StoreError::Invalid(err) => Response::builder()
            .status(400)
            .header("Content-Type", "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .body(Body::Text(
                serde_json::json!({ "message": err.message, "field": err.field }).to_string(),
            ))
            .unwrap(),
        StoreError::ClientNotFound(_) => message_response(404, "Client not found"),
        StoreError::PolicyNotFound(_) => message_response(404, "Policy not found"),
        StoreError::Backend(err) => {
            log::error!("store backend failure: {}", err);
            message_response(500, "Internal error")
        }
    }
}

fn body_string(event: &Request) -> String {
    match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    }
}

fn parse_id(segment: &str) -> Option<u32> {
    segment.parse().ok()
}

async fn handler(
    event: Request,
    store: Arc<Mutex<InMemoryStore>>,
) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)
            .unwrap());
    }

    let method = event.method().as_str().to_string();
    let path = event.uri().path().to_string();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let body = body_string(&event);

    // A panic elsewhere poisons the lock, but the store holds no invariants
    // a half-applied update could break, so recover instead of panicking.
    let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);

    let response = match (method.as_str(), segments.as_slice()) {
        ("GET", ["api", "clients"]) => match store.clients() {
            Ok(clients) => json_response(200, &clients),
            Err(err) => store_error_response(err),
        },

        ("GET", ["api", "clients", id]) => match parse_id(id) {
            Some(id) => match store.client(id) {
                Ok(Some(client)) => json_response(200, &client),
                Ok(None) => message_response(404, "Client not found"),
                Err(err) => store_error_response(err),
            },
            None => message_response(400, "Invalid client id"),
        },

        ("POST", ["api", "clients"]) => match serde_json::from_str::<NewClient>(&body) {
            Ok(input) => match store.create_client(input) {
                Ok(client) => json_response(201, &client),
                Err(err) => store_error_response(err),
            },
            Err(err) => message_response(400, &format!("Invalid JSON: {}", err)),
        },

        ("PUT", ["api", "clients", id]) => match parse_id(id) {
            Some(id) => match serde_json::from_str::<ClientUpdate>(&body) {
                Ok(updates) => match store.update_client(id, updates) {
                    Ok(client) => json_response(200, &client),
                    Err(err) => store_error_response(err),
                },
                Err(err) => message_response(400, &format!("Invalid JSON: {}", err)),
            },
            None => message_response(400, "Invalid client id"),
        },

        ("DELETE", ["api", "clients", id]) => match parse_id(id) {
            Some(id) => match store.delete_client(id) {
                Ok(()) => message_response(200, "Client deleted"),
                Err(err) => store_error_response(err),
            },
            None => message_response(400, "Invalid client id"),
        },

        ("GET", ["api", "policies"]) => match store.policies() {
            Ok(policies) => json_response(200, &policies),
            Err(err) => store_error_response(err),
        },

        ("GET", ["api", "policies", id]) => match parse_id(id) {
            Some(id) => match store.policy(id) {
                Ok(Some(policy)) => json_response(200, &policy),
                Ok(None) => message_response(404, "Policy not found"),
                Err(err) => store_error_response(err),
            },
            None => message_response(400, "Invalid policy id"),
        },

        ("POST", ["api", "policies"]) => match serde_json::from_str::<NewPolicy>(&body) {
            Ok(input) => match store.create_policy(input) {
                Ok(policy) => json_response(201, &policy),
                Err(err) => store_error_response(err),
            },
            Err(err) => message_response(400, &format!("Invalid JSON: {}", err)),
        },

        // Renew: push the expiration out one calendar year, then persist.
        // No request body beyond the id in the path.
        ("POST", ["api", "policies", id, "renew"]) => match parse_id(id) {
            Some(id) => match store.policy(id) {
                Ok(Some(policy)) => {
                    let renewed = renew_policy(&policy);
                    let updates = PolicyUpdate {
                        expiration_date: Some(renewed.expiration_date),
                        ..PolicyUpdate::default()
                    };
                    match store.update_policy(id, updates) {
                        Ok(policy) => json_response(200, &policy),
                        Err(err) => store_error_response(err),
                    }
                }
                Ok(None) => message_response(404, "Policy not found"),
                Err(err) => store_error_response(err),
            },
            None => message_response(400, "Invalid policy id"),
        },

        ("GET", ["api", "dashboard", "stats"]) => {
            let today = chrono::Local::now().date_naive();
            let policies = match store.policies() {
                Ok(p) => p,
                Err(err) => return Ok(store_error_response(err)),
            };
            let clients = match store.clients() {
                Ok(c) => c,
                Err(err) => return Ok(store_error_response(err)),
            };
            match compute_dashboard_stats(&policies, &clients, today) {
                Ok(stats) => json_response(200, &stats),
                Err(err) => {
                    log::error!("dashboard aggregation failed: {}", err);
                    message_response(500, &err.to_string())
                }
            }
        }

        _ => message_response(404, "Not found"),
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_message_response_body_stays_valid_json() {
        // serde_json error text quotes the offending value; the body must
        // survive that as parseable JSON.
        let err = serde_json::from_str::<NewPolicy>(r#"{"clientId":"x"}"#).unwrap_err();
        let response = message_response(400, &format!("Invalid JSON: {}", err));

        let body = match response.body() {
            Body::Text(s) => s.clone(),
            other => panic!("expected text body, got {:?}", other),
        };
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let message = json["message"].as_str().unwrap();
        assert!(message.starts_with("Invalid JSON"));
        assert!(message.contains('"'));
    }

    #[test]
    fn test_poisoned_store_lock_recovers() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let store = Arc::new(Mutex::new(InMemoryStore::seeded(today)));

        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(store.lock().is_err());

        let guard = store.lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(guard.clients().unwrap().len(), 3);
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let today = chrono::Local::now().date_naive();
    let store = Arc::new(Mutex::new(InMemoryStore::seeded(today)));

    run(service_fn(move |event| {
        let store = Arc::clone(&store);
        handler(event, store)
    }))
    .await
}
