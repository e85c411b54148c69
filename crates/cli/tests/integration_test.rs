use chrono::NaiveDate;
use condor_core::{DiscordConfig, NseConfig, OuterLegPolicy, StrategyConfig};
use condor_nse::NseClient;
use condor_notify::{ConsolePublisher, DiscordWebhook};
use condor_range::{CondorService, CondorSettings, StrategyLegs};
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_nse() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/option-chain"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "nsit=abc; Path=/"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/allIndices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{ "index": "NIFTY 50", "last": 24500.0 }]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/option-chain-indices"))
        .and(query_param("symbol", "NIFTY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": {
                "expiryDates": ["25-Oct-2024"],
                "data": [
                    {
                        "strikePrice": 24500,
                        "expiryDate": "25-Oct-2024",
                        "CE": { "impliedVolatility": 12.0 },
                        "PE": { "impliedVolatility": 12.5 }
                    },
                    {
                        "strikePrice": 24550,
                        "expiryDate": "25-Oct-2024",
                        "CE": { "impliedVolatility": 13.0 },
                        "PE": { "impliedVolatility": 13.5 }
                    }
                ]
            }
        })))
        .mount(&server)
        .await;

    server
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 21).unwrap()
}

#[tokio::test]
async fn test_analysis_end_to_end() {
    let nse = mock_nse().await;
    let discord = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/webhooks/1/token"))
        .and(body_partial_json(serde_json::json!({
            "embeds": [{ "title": "NIFTY Option Chain Analysis" }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&discord)
        .await;

    let provider = NseClient::new(NseConfig {
        base_url: nse.uri(),
        ..Default::default()
    });
    let webhook = DiscordWebhook::from_config(&DiscordConfig {
        webhook_url: Some(format!("{}/api/webhooks/1/token", discord.uri())),
        ..Default::default()
    })
    .unwrap();

    let service = CondorService::new(Arc::new(provider), CondorSettings::from(&StrategyConfig::default()))
        .with_publisher(Arc::new(ConsolePublisher))
        .with_publisher(Arc::new(webhook));

    let report = service.run(monday()).await.expect("analysis should succeed");

    assert_eq!(report.trading_days(), 5);
    assert_eq!(
        report.plan.legs,
        StrategyLegs {
            inner_lower: 24_050,
            inner_upper: 24_950,
            outer_lower: 23_850,
            outer_upper: 25_150,
        }
    );
}

#[tokio::test]
async fn test_analysis_second_band_without_discord() {
    let nse = mock_nse().await;
    let provider = NseClient::new(NseConfig::default()).with_base_url(nse.uri());

    let settings = CondorSettings {
        outer_legs: OuterLegPolicy::SecondBand { sd_multiplier: 1.3 },
        ..Default::default()
    };
    let report = CondorService::new(Arc::new(provider), settings)
        .run(monday())
        .await
        .unwrap();

    assert_eq!(report.plan.legs.outer_lower, 23_900);
    assert_eq!(report.plan.legs.outer_upper, 25_100);
}

#[tokio::test]
async fn test_analysis_fails_when_discord_rejects() {
    let nse = mock_nse().await;
    let discord = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid Webhook Token"))
        .mount(&discord)
        .await;

    let provider = NseClient::new(NseConfig::default()).with_base_url(nse.uri());
    let webhook = DiscordWebhook::from_config(&DiscordConfig {
        webhook_url: Some(format!("{}/api/webhooks/1/bad", discord.uri())),
        ..Default::default()
    })
    .unwrap();

    let err = CondorService::new(Arc::new(provider), CondorSettings::default())
        .with_publisher(Arc::new(webhook))
        .run(monday())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("discord"));
}
