#[cfg(test)]
mod tests {
    use crate::pagination::PageRequest;
    use crate::portfolios::{
        NewPortfolio, PortfolioService, PortfolioServiceTrait, PortfolioUpdate,
    };
    use crate::test_support::InMemoryStore;
    use crate::valuation::{NewValuationSnapshot, ValuationService, ValuationServiceTrait};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn setup() -> (Arc<InMemoryStore>, PortfolioService) {
        let store = InMemoryStore::new();
        let service = PortfolioService::new(store.clone(), store.clone(), store.clone());
        (store, service)
    }

    fn new_portfolio(name: &str, client: &str, email: &str) -> NewPortfolio {
        NewPortfolio {
            id: None,
            name: name.to_string(),
            client_name: client.to_string(),
            client_email: email.to_string(),
            description: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_validates_and_drops_blank_description() {
        let (store, service) = setup();
        let created = service
            .create_portfolio(new_portfolio("Growth", "Jane", "jane@example.com"))
            .await
            .unwrap();
        assert_eq!(created.description, None);

        let writes = store.writes();
        assert!(service
            .create_portfolio(new_portfolio("Growth", "Jane", "not-an-email"))
            .await
            .is_err());
        assert_eq!(store.writes(), writes);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_across_fields() {
        let (_store, service) = setup();
        service
            .create_portfolio(new_portfolio("Growth", "Alice Smith", "alice@example.com"))
            .await
            .unwrap();
        service
            .create_portfolio(new_portfolio("Income", "Bob Jones", "bob@wealth.io"))
            .await
            .unwrap();

        let by_client = service
            .search_portfolios(Some("SMITH"), PageRequest::default())
            .unwrap();
        assert_eq!(by_client.meta.total_row_count, 1);
        assert_eq!(by_client.data[0].name, "Growth");

        let by_email = service
            .search_portfolios(Some("wealth.io"), PageRequest::default())
            .unwrap();
        assert_eq!(by_email.data[0].name, "Income");

        let all = service
            .search_portfolios(Some("   "), PageRequest::default())
            .unwrap();
        assert_eq!(all.meta.total_row_count, 2);
        // Newest first.
        assert_eq!(all.data[0].name, "Income");
    }

    #[tokio::test]
    async fn test_search_clamps_page_past_the_end() {
        let (_store, service) = setup();
        for i in 0..5 {
            service
                .create_portfolio(new_portfolio(
                    &format!("P{}", i),
                    "Client",
                    "c@example.com",
                ))
                .await
                .unwrap();
        }

        let page = service
            .search_portfolios(None, PageRequest::from_params(Some(7), Some(2)).unwrap())
            .unwrap();
        assert_eq!(page.meta.current_page, 3);
        assert_eq!(page.meta.last_page, 3);
        assert_eq!(page.data.len(), 1);
    }

    #[tokio::test]
    async fn test_update_applies_partial_fields() {
        let (_store, service) = setup();
        let created = service
            .create_portfolio(new_portfolio("Growth", "Jane", "jane@example.com"))
            .await
            .unwrap();

        let updated = service
            .update_portfolio(PortfolioUpdate {
                id: created.id.clone(),
                client_email: Some("jane@new.example.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.client_email, "jane@new.example.com");
        assert_eq!(updated.name, "Growth");

        let missing = service
            .update_portfolio(PortfolioUpdate {
                id: "missing".to_string(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(missing.is_not_found());
    }

    #[tokio::test]
    async fn test_detail_and_cascading_delete() {
        let (store, service) = setup();
        let valuation = ValuationService::new(store.clone(), store.clone(), store.clone());
        let portfolio = store.add_portfolio("Growth");
        let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        store.add_holding(&portfolio.id, "AAPL", dec!(1), dec!(10), d);
        valuation
            .create_valuation_snapshot(NewValuationSnapshot {
                portfolio_id: portfolio.id.clone(),
                snapshot_date: d,
                status: None,
                notes: None,
                recalculate: true,
            })
            .await
            .unwrap();

        let detail = service.get_portfolio_detail(&portfolio.id).unwrap();
        assert_eq!(detail.holdings.len(), 1);
        assert_eq!(detail.valuation_snapshots.len(), 1);

        service.delete_portfolio(&portfolio.id).await.unwrap();
        assert!(service.get_portfolio(&portfolio.id).unwrap_err().is_not_found());
        assert_eq!(store.snapshot_count(), 0);
        assert!(service
            .delete_portfolio(&portfolio.id)
            .await
            .unwrap_err()
            .is_not_found());
    }
}
