use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storefront::core::{
    Catalog, CurrencyService, FetchError, FetchOperation, OperationHandle, OperationState,
    Session,
};
use storefront::providers::CurrencyLayerClient;
use tracing::info;

const LIST_FIXTURE: &str = include_str!("fixtures/list.json");
const LIVE_FIXTURE: &str = include_str!("fixtures/live.json");
const ACCESS_KEY: &str = "integration-key";

mod test_utils {
    use super::ACCESS_KEY;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(endpoint: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("access_key", ACCESS_KEY))
            .and(query_param("format", "1"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }
}

#[derive(Default)]
struct Outcome {
    success: AtomicUsize,
    failure: AtomicUsize,
    delivered: AtomicUsize,
}

fn service(base_url: &str) -> Arc<dyn CurrencyService> {
    Arc::new(CurrencyLayerClient::new(base_url, ACCESS_KEY, "USD").unwrap())
}

/// Starts `operation`, counting handler calls and recording how many
/// entries a successful fetch delivered.
fn start_counted<T, F>(operation: FetchOperation<T>, outcome: &Arc<Outcome>, len: F) -> OperationHandle
where
    T: Send + 'static,
    F: Fn(&T) -> usize + Send + 'static,
{
    let on_success = Arc::clone(outcome);
    let on_failure = Arc::clone(outcome);
    operation.start(
        move |value| {
            on_success.delivered.store(len(&value), Ordering::SeqCst);
            on_success.success.fetch_add(1, Ordering::SeqCst);
        },
        move |e| {
            info!(error = %e, "Operation failed");
            on_failure.failure.fetch_add(1, Ordering::SeqCst);
        },
    )
}

fn assert_failed_once(outcome: &Outcome) {
    assert_eq!(outcome.success.load(Ordering::SeqCst), 0);
    assert_eq!(outcome.failure.load(Ordering::SeqCst), 1);
}

#[test_log::test(tokio::test)]
async fn test_currency_list_fixture_delivers_all_entries() {
    let mock_server = test_utils::create_mock_server("/api/list", 200, LIST_FIXTURE).await;
    let outcome = Arc::new(Outcome::default());

    let operation = FetchOperation::fetch_currencies(service(&mock_server.uri()));
    let handle = start_counted(operation, &outcome, |list| list.len());

    assert_eq!(handle.wait().await, OperationState::Succeeded);
    assert_eq!(outcome.success.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.failure.load(Ordering::SeqCst), 0);
    assert_eq!(outcome.delivered.load(Ordering::SeqCst), 168);
}

#[test_log::test(tokio::test)]
async fn test_realtime_rates_fixture() {
    let mock_server = test_utils::create_mock_server("/api/live", 200, LIVE_FIXTURE).await;

    let quotes = service(&mock_server.uri())
        .fetch_realtime_rates(&["EUR", "GBP", "JPY", "CAD", "BTC"])
        .await
        .expect("Failed to fetch rates");

    assert_eq!(quotes.len(), 5);
    assert_eq!(quotes.get("USDEUR"), Some(&0.911404));
}

#[test_log::test(tokio::test)]
async fn test_not_found_fails_once() {
    for endpoint in ["/api/list", "/api/live"] {
        let mock_server = test_utils::create_mock_server(endpoint, 404, LIST_FIXTURE).await;
        let outcome = Arc::new(Outcome::default());

        let handle = if endpoint == "/api/list" {
            let operation = FetchOperation::fetch_currencies(service(&mock_server.uri()));
            start_counted(operation, &outcome, |list| list.len())
        } else {
            let operation = FetchOperation::fetch_realtime_rates(
                service(&mock_server.uri()),
                vec!["EUR".to_string()],
            );
            start_counted(operation, &outcome, |quotes| quotes.len())
        };

        assert_eq!(handle.wait().await, OperationState::Failed, "{endpoint}");
        assert_failed_once(&outcome);
    }
}

#[test_log::test(tokio::test)]
async fn test_malformed_json_fails_once() {
    for endpoint in ["/api/list", "/api/live"] {
        let mock_server =
            test_utils::create_mock_server(endpoint, 200, r#"{"currencies": {"EUR": "#).await;
        let client = service(&mock_server.uri());
        let outcome = Arc::new(Outcome::default());

        let handle = if endpoint == "/api/list" {
            let result = client.fetch_currency_list().await;
            assert!(matches!(result, Err(FetchError::Decode(_))));

            let operation = FetchOperation::fetch_currencies(client);
            start_counted(operation, &outcome, |list| list.len())
        } else {
            let result = client.fetch_realtime_rates(&["EUR"]).await;
            assert!(matches!(result, Err(FetchError::Decode(_))));

            let operation = FetchOperation::fetch_realtime_rates(client, vec!["EUR".to_string()]);
            start_counted(operation, &outcome, |quotes| quotes.len())
        };

        assert_eq!(handle.wait().await, OperationState::Failed, "{endpoint}");
        assert_failed_once(&outcome);
    }
}

#[test_log::test(tokio::test)]
async fn test_transport_error_fails_once() {
    // Nothing listens on the discard port.
    let client = service("http://127.0.0.1:9");

    let result = client.fetch_currency_list().await;
    assert!(matches!(result, Err(FetchError::Transport(_))));
    let message = format!("{:#}", anyhow::Error::from(result.unwrap_err()));
    assert!(!message.contains(ACCESS_KEY), "{message}");

    let outcome = Arc::new(Outcome::default());
    let handle = start_counted(
        FetchOperation::fetch_realtime_rates(client, vec!["EUR".to_string()]),
        &outcome,
        |quotes| quotes.len(),
    );
    assert_eq!(handle.wait().await, OperationState::Failed);
    assert_failed_once(&outcome);
}

#[test_log::test(tokio::test)]
async fn test_concurrent_fetches_are_independent() {
    let list_server = test_utils::create_mock_server("/api/list", 200, LIST_FIXTURE).await;
    let live_server = test_utils::create_mock_server("/api/live", 500, "").await;
    let list_client = service(&list_server.uri());
    let live_client = service(&live_server.uri());

    let (list, live) = futures::join!(
        list_client.fetch_currency_list(),
        live_client.fetch_realtime_rates(&["EUR"])
    );

    assert_eq!(list.expect("list should succeed").len(), 168);
    assert!(matches!(live, Err(FetchError::Status(_))));
}

#[test_log::test(tokio::test)]
async fn test_cart_session_in_bitcoin() {
    let mock_server = test_utils::create_mock_server("/api/live", 200, LIVE_FIXTURE).await;
    let client = service(&mock_server.uri());
    let catalog = Catalog::prototype();

    let mut session = Session::default();
    session.cart.add(catalog.find("Beans").unwrap().clone());
    assert_eq!(session.checkout_label(), "Pay $0.73");

    // The live fixture answers for every requested code.
    let rate = session
        .change_currency(client.as_ref(), "BTC")
        .await
        .expect("Failed to change currency");
    assert_eq!(rate.rate, 0.001566);

    // 73 cents at 0.001566 is well under a cent, so six digits are kept.
    assert_eq!(session.checkout_label(), "Pay BTC\u{a0}0.001143");
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock_service() {
    let mock_server = test_utils::create_mock_server("/api/live", 200, LIVE_FIXTURE).await;

    let temp_dir = tempfile::TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    let config = format!(
        r#"
currency_layer:
  base_url: "{}"
  access_key: "{}"
source_currency: "USD"
"#,
        mock_server.uri(),
        ACCESS_KEY
    );
    std::fs::write(&config_path, config).unwrap();

    let result = storefront::run_command(
        storefront::AppCommand::Cart {
            add: vec!["Eggs".to_string(), "Milk".to_string()],
            remove: vec![],
            currency: Some("eur".to_string()),
        },
        config_path.to_str(),
    )
    .await;
    assert!(result.is_ok(), "{result:?}");

    let result = storefront::run_command(
        storefront::AppCommand::Rates {
            codes: vec!["EUR".to_string()],
        },
        config_path.to_str(),
    )
    .await;
    assert!(result.is_ok(), "{result:?}");
}

#[test_log::test(tokio::test)]
async fn test_app_flow_reports_bad_cart_position() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.yaml");
    std::fs::write(&config_path, "source_currency: \"USD\"\n").unwrap();

    let result = storefront::run_command(
        storefront::AppCommand::Cart {
            add: vec!["Peas".to_string()],
            remove: vec![3],
            currency: None,
        },
        config_path.to_str(),
    )
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("No line item at position 3"));
}
