use super::ApiClient;
use crate::domain::model::ReportQuery;
use crate::utils::error::Result;
use reqwest::Method;
use serde_json::Value;

/// Fixed windows the backend pre-aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Weekly,
    Monthly,
    Yearly,
}

impl ReportPeriod {
    fn path(self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "/sales-reports/weekly",
            ReportPeriod::Monthly => "/sales-reports/monthly",
            ReportPeriod::Yearly => "/sales-reports/yearly",
        }
    }
}

impl ApiClient {
    pub async fn sales_summary(&self, query: &ReportQuery) -> Result<Value> {
        let query = ReportQuery {
            payment_method: None,
            ..query.normalized()
        };
        self.json(
            self.request(Method::GET, "/sales-reports/summary")
                .query(&query),
        )
        .await
    }

    pub async fn sales_report(&self, query: &ReportQuery) -> Result<Value> {
        self.json(
            self.request(Method::GET, "/sales-reports")
                .query(&query.normalized()),
        )
        .await
    }

    pub async fn sales_by_period(
        &self,
        period: ReportPeriod,
        branch_id: Option<&str>,
    ) -> Result<Value> {
        let query = ReportQuery {
            branch_id: branch_id.map(str::to_string),
            ..Default::default()
        }
        .normalized();
        self.json(self.request(Method::GET, period.path()).query(&query))
            .await
    }

    pub async fn stock_movements(&self) -> Result<Value> {
        self.json(self.request(Method::GET, "/stock-movements"))
            .await
    }
}
