//! Tests for holding validation and asset types.

#[cfg(test)]
mod tests {
    use crate::errors::{Error, ValidationError};
    use crate::holdings::{AssetType, HoldingUpdate, NewHolding};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn new_holding(quantity: Decimal, unit_price: Decimal) -> NewHolding {
        NewHolding {
            id: None,
            portfolio_id: "p1".to_string(),
            asset_name: "Apple Inc.".to_string(),
            asset_type: AssetType::Stock,
            quantity,
            unit_price,
            valuation_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_asset_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&AssetType::MutualFund).unwrap(),
            "\"MUTUAL_FUND\""
        );
        assert_eq!(serde_json::to_string(&AssetType::Etf).unwrap(), "\"ETF\"");
        for asset_type in AssetType::ALL {
            assert_eq!(
                asset_type.as_str().parse::<AssetType>().unwrap(),
                asset_type
            );
        }
    }

    #[test]
    fn test_unknown_asset_type_is_rejected() {
        let err = "CRYPTO".parse::<AssetType>().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidAssetType(_))
        ));
    }

    #[test]
    fn test_valid_holding_passes() {
        assert!(new_holding(dec!(100), dec!(150.50)).validate().is_ok());
        assert!(new_holding(dec!(0.00000001), dec!(0.0001))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_zero_or_negative_quantity_is_rejected() {
        assert!(new_holding(dec!(0), dec!(1)).validate().is_err());
        assert!(new_holding(dec!(-1), dec!(1)).validate().is_err());
    }

    #[test]
    fn test_zero_or_negative_price_is_rejected() {
        assert!(new_holding(dec!(1), dec!(0)).validate().is_err());
        assert!(new_holding(dec!(1), dec!(-0.01)).validate().is_err());
    }

    #[test]
    fn test_excess_precision_is_rejected() {
        assert!(new_holding(dec!(0.123456789), dec!(1)).validate().is_err());
        assert!(new_holding(dec!(1), dec!(1.00001)).validate().is_err());
        // Trailing zeros do not count.
        assert!(new_holding(dec!(1.0000000000), dec!(1.000000))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_excess_integer_digits_are_rejected() {
        assert!(new_holding(dec!(1000000000000), dec!(1)).validate().is_err());
        assert!(new_holding(dec!(999999999999), dec!(1)).validate().is_ok());
    }

    #[test]
    fn test_blank_asset_name_is_rejected() {
        let mut holding = new_holding(dec!(1), dec!(1));
        holding.asset_name = "  ".to_string();
        assert!(holding.validate().is_err());
    }

    #[test]
    fn test_update_validates_merged_values() {
        let now = chrono::Utc::now().naive_utc();
        let mut holding = crate::holdings::Holding {
            id: "h1".to_string(),
            portfolio_id: "p1".to_string(),
            asset_name: "Apple Inc.".to_string(),
            asset_type: AssetType::Stock,
            quantity: dec!(10),
            unit_price: dec!(100),
            valuation_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            created_at: now,
            updated_at: now,
        };

        let update = HoldingUpdate {
            id: "h1".to_string(),
            unit_price: Some(dec!(0)),
            ..Default::default()
        };
        assert!(update.apply_to(&mut holding.clone()).is_err());

        let update = HoldingUpdate {
            id: "h1".to_string(),
            quantity: Some(dec!(12.5)),
            asset_type: Some(AssetType::Etf),
            ..Default::default()
        };
        update.apply_to(&mut holding).unwrap();
        assert_eq!(holding.quantity, dec!(12.5));
        assert_eq!(holding.asset_type, AssetType::Etf);
        assert_eq!(holding.unit_price, dec!(100));
        assert_eq!(holding.total_value(), dec!(1250.0));
    }

    #[test]
    fn test_valuation_date_beyond_year_9999_is_rejected() {
        let mut holding = new_holding(dec!(1), dec!(1));
        holding.valuation_date = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        assert!(matches!(
            holding.validate().unwrap_err(),
            Error::Validation(ValidationError::InvalidInput(_))
        ));

        holding.valuation_date = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        assert!(holding.validate().is_ok());
    }
}
