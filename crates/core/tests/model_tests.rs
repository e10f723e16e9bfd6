// ═══════════════════════════════════════════════════════════════════
// Model Tests — HoldingDraft validation, currencies, patches, errors
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use portfolio_tracker_core::errors::CoreError;
use portfolio_tracker_core::models::currency::InputCurrency;
use portfolio_tracker_core::models::holding::{Holding, HoldingDraft, HoldingPatch};
use portfolio_tracker_core::models::session::Session;
use portfolio_tracker_core::models::settings::{FetchPacing, Settings};

fn draft() -> HoldingDraft {
    HoldingDraft {
        ticker: "AAPL".to_string(),
        quantity: 10.0,
        price: 100.0,
        currency: InputCurrency::Usd,
        purchase_date: NaiveDate::from_ymd_opt(2024, 1, 15),
    }
}

fn assert_invalid_field(result: Result<(), CoreError>, expected: &str) {
    match result {
        Err(CoreError::Validation { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected Validation error for '{expected}', got {other:?}"),
    }
}

// ═══════════════════════════════════════════════════════════════════
// HoldingDraft — field validation
// ═══════════════════════════════════════════════════════════════════

mod draft_validation {
    use super::*;

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn empty_ticker_rejected() {
        let mut d = draft();
        d.ticker = "   ".to_string();
        assert_invalid_field(d.validate(), "ticker");
    }

    #[test]
    fn quantity_below_one_rejected() {
        let mut d = draft();
        d.quantity = 0.99;
        assert_invalid_field(d.validate(), "quantity");
    }

    #[test]
    fn quantity_of_exactly_one_allowed() {
        let mut d = draft();
        d.quantity = 1.0;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn nan_quantity_rejected() {
        let mut d = draft();
        d.quantity = f64::NAN;
        assert_invalid_field(d.validate(), "quantity");
    }

    #[test]
    fn price_below_minimum_rejected() {
        let mut d = draft();
        d.price = 0.005;
        assert_invalid_field(d.validate(), "price");
    }

    #[test]
    fn price_of_one_cent_allowed() {
        let mut d = draft();
        d.price = 0.01;
        assert!(d.validate().is_ok());
    }

    #[test]
    fn missing_date_rejected() {
        let mut d = draft();
        d.purchase_date = None;
        assert_invalid_field(d.validate(), "purchase_date");
    }

    #[test]
    fn normalized_ticker_trims_and_uppercases() {
        let mut d = draft();
        d.ticker = "  aapl ".to_string();
        assert_eq!(d.normalized_ticker(), "AAPL");
    }
}

// ═══════════════════════════════════════════════════════════════════
// InputCurrency
// ═══════════════════════════════════════════════════════════════════

mod currency {
    use super::*;

    #[test]
    fn parses_usd_and_eur_case_insensitively() {
        assert_eq!(InputCurrency::from_str("usd").unwrap(), InputCurrency::Usd);
        assert_eq!(InputCurrency::from_str(" EUR ").unwrap(), InputCurrency::Eur);
    }

    #[test]
    fn rejects_unsupported_codes() {
        let err = InputCurrency::from_str("GBP").unwrap_err();
        match err {
            CoreError::Validation { field, message } => {
                assert_eq!(field, "currency");
                assert!(message.contains("GBP"));
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn displays_iso_codes() {
        assert_eq!(InputCurrency::Usd.to_string(), "USD");
        assert_eq!(InputCurrency::Eur.to_string(), "EUR");
    }

    #[test]
    fn serializes_as_iso_code() {
        assert_eq!(serde_json::to_string(&InputCurrency::Usd).unwrap(), "\"USD\"");
        assert_eq!(serde_json::to_string(&InputCurrency::Eur).unwrap(), "\"EUR\"");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Holding — wire format
// ═══════════════════════════════════════════════════════════════════

mod holding_serde {
    use super::*;

    #[test]
    fn round_trips_store_row() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "user_id": "00000000-0000-0000-0000-000000000002",
            "ticker": "AAPL",
            "quantity": 10.0,
            "purchase_price": 123.45,
            "purchase_date": "2024-01-15"
        }"#;

        let holding: Holding = serde_json::from_str(json).unwrap();
        assert_eq!(holding.ticker, "AAPL");
        assert_eq!(holding.purchase_price_usd, 123.45);
        assert_eq!(
            holding.purchase_date,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );

        // The canonical price field maps back to the store column name
        let out = serde_json::to_value(&holding).unwrap();
        assert!(out.get("purchase_price").is_some());
        assert!(out.get("purchase_price_usd").is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// HoldingPatch
// ═══════════════════════════════════════════════════════════════════

mod patch {
    use super::*;

    #[test]
    fn empty_patch_rejected() {
        assert_invalid_field(HoldingPatch::default().validate(), "patch");
    }

    #[test]
    fn quantity_rule_applies_when_present() {
        let patch = HoldingPatch {
            quantity: Some(0.5),
            ..Default::default()
        };
        assert_invalid_field(patch.validate(), "quantity");
    }

    #[test]
    fn price_rule_applies_when_present() {
        let patch = HoldingPatch {
            purchase_price_usd: Some(0.001),
            ..Default::default()
        };
        assert_invalid_field(patch.validate(), "price");
    }

    #[test]
    fn date_only_patch_is_valid() {
        let patch = HoldingPatch {
            purchase_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn unset_fields_are_omitted_from_wire_format() {
        let patch = HoldingPatch {
            quantity: Some(20.0),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object.get("quantity").unwrap().as_f64(), Some(20.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Session & Settings
// ═══════════════════════════════════════════════════════════════════

mod config {
    use super::*;

    #[test]
    fn session_holds_identity() {
        let user = Uuid::from_u128(7);
        let session = Session::new(user, "token-abc");
        assert_eq!(session.user_id, user);
        assert_eq!(session.access_token, "token-abc");
    }

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.display_currency, "USD");
        assert_eq!(settings.ticker_settle, Duration::from_secs(1));
        assert_eq!(settings.pacing.interval, Duration::from_secs(12));
        assert_eq!(settings.pacing.failure_backoff, Duration::ZERO);
    }

    #[test]
    fn immediate_pacing_has_no_delays() {
        let pacing = FetchPacing::immediate();
        assert_eq!(pacing.interval, Duration::ZERO);
        assert_eq!(pacing.failure_backoff, Duration::ZERO);
    }
}

// ═══════════════════════════════════════════════════════════════════
// CoreError — display formats
// ═══════════════════════════════════════════════════════════════════

mod errors {
    use super::*;

    #[test]
    fn validation_shows_field_and_message() {
        let err = CoreError::Validation {
            field: "quantity",
            message: "must be at least 1".into(),
        };
        assert_eq!(err.to_string(), "Invalid quantity: must be at least 1");
    }

    #[test]
    fn api_error_names_provider() {
        let err = CoreError::Api {
            provider: "Polygon".into(),
            message: "rate limited".into(),
        };
        assert_eq!(err.to_string(), "API error (Polygon): rate limited");
    }

    #[test]
    fn fx_unavailable_names_pair() {
        let err = CoreError::FxUnavailable {
            base: "EUR".into(),
            quote: "USD".into(),
        };
        assert_eq!(err.to_string(), "No FX rate available for EUR/USD");
    }

    #[test]
    fn signed_out_message() {
        assert_eq!(CoreError::SignedOut.to_string(), "Not signed in");
    }

    #[test]
    fn json_errors_convert_to_deserialization() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }
}
