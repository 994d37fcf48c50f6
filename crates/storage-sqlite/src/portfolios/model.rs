//! Database models for portfolios.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use valuation_core::portfolios::Portfolio;

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioDB {
    pub id: String,
    pub name: String,
    pub client_name: String,
    pub client_email: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<PortfolioDB> for Portfolio {
    fn from(db: PortfolioDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            client_name: db.client_name,
            client_email: db.client_email,
            description: db.description,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
