use chrono::NaiveDate;
use httpmock::prelude::*;
use lab_reporting::dashboard::metrics::MetricsService;
use lab_reporting::dashboard::odoo::OdooClient;
use std::time::Duration;

fn service_for(server: &MockServer) -> MetricsService {
    let client = OdooClient::new(
        server.url("/jsonrpc"),
        "lab-test-db",
        37,
        "test-key",
        Duration::from_secs(5),
    )
    .unwrap();
    MetricsService::new(client, Duration::from_secs(300), Duration::from_secs(300))
}

#[tokio::test]
async fn monthly_costs_merge_the_three_account_ranges() {
    let server = MockServer::start();
    // One read_group call per cost range (4*, 6*, 7*); each returns the same
    // month so the service has to merge them.
    let rpc_mock = server.mock(|when, then| {
        when.method(POST).path("/jsonrpc").body_contains("read_group");
        then.status(200).json_body(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [
                {"date:month": "januari 2026", "balance": 1000.0},
                {"date:month": "februari 2026", "balance": 400.0}
            ]
        }));
    });

    let service = service_for(&server);
    let costs = service.monthly_costs(2026, Some(2)).await.unwrap();

    rpc_mock.assert_hits(3);
    assert_eq!(costs.len(), 2);
    assert_eq!(costs[0].period, "januari 2026");
    assert_eq!(costs[0].amount, 3000.0);
    assert_eq!(costs[1].amount, 1200.0);
}

#[tokio::test]
async fn weekly_revenue_parses_and_sorts_odoo_week_labels() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/jsonrpc").body_contains("date:week");
        then.status(200).json_body(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [
                {"date:week": "W10 2026", "balance": -500.0},
                {"date:week": "W02 2026", "balance": -1500.0},
                {"date:week": "W06 2026", "balance": 0.0},
                {"date:week": "zonder week", "balance": -100.0}
            ]
        }));
    });

    let service = service_for(&server);
    let weekly = service.weekly_revenue(2026, None, true).await.unwrap();

    // Zero weeks and unparseable labels drop out; the rest sorts by date.
    assert_eq!(weekly.len(), 2);
    assert_eq!(weekly[0].week_num, 2);
    assert_eq!(weekly[0].amount, 1500.0);
    assert_eq!(weekly[1].week_num, 10);
    assert!(weekly[0].start_date < weekly[1].start_date);
}

#[tokio::test]
async fn daily_revenue_handles_dutch_day_labels() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/jsonrpc").body_contains("date:day");
        then.status(200).json_body(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [
                {"date:day": "05 mrt 2026", "balance": -250.0},
                {"date:day": "01 jan 2026", "balance": -80.0}
            ]
        }));
    });

    let service = service_for(&server);
    let daily = service.daily_revenue(2026, Some(1), false).await.unwrap();

    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0].date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    assert_eq!(daily[0].amount, 80.0);
    assert_eq!(daily[1].date, NaiveDate::from_ymd_opt(2026, 3, 5).unwrap());
}

#[tokio::test]
async fn vat_months_report_the_net_position() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/jsonrpc").body_contains("15%");
        then.status(200).json_body(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [
                {"date:month": "januari 2026", "debit": 2100.0, "credit": 5400.0},
                {"date:month": "februari 2026", "debit": 3000.0, "credit": 2400.0}
            ]
        }));
    });

    let service = service_for(&server);
    let months = service
        .vat_months(
            None,
            NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(months.len(), 2);
    assert_eq!(months[0].net, 3300.0);
    assert_eq!(months[1].net, -600.0);
    assert_eq!(months[0].input_vat, 2100.0);
    assert_eq!(months[0].output_vat, 5400.0);
}
