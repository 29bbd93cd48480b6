use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{
    auth::{Credentials, SessionUser},
    dashboard::{
        Demographics, DensityMap, HealthStats, NeedsPotential, SocialWelfareStats,
        UrgentNeedDetail,
    },
    filter::{FilterOptions, constraint},
    lansia::{LansiaDetail, LansiaSummary, NewLansia, UpdateLansia},
    types::{LansiaId, PageSize, SortDirection, SortField},
    upload::UploadReport,
};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use http::HttpRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: PageSize::default().get(),
        }
    }
}

/// Query sent to `GET /api/lansia`. Unconstrained parameters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LansiaListQuery {
    pub search: Option<String>,
    pub gender: Option<String>,
    pub age_group: Option<String>,
    pub rw: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortDirection,
    pub pagination: Pagination,
}

impl LansiaListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sent verbatim; only the empty string means "no search".
    pub fn search(mut self, search: impl AsRef<str>) -> Self {
        let search = search.as_ref();
        self.search = (!search.is_empty()).then(|| search.to_string());
        self
    }

    pub fn gender(mut self, gender: impl AsRef<str>) -> Self {
        self.gender = constraint(gender.as_ref());
        self
    }

    pub fn age_group(mut self, age_group: impl AsRef<str>) -> Self {
        self.age_group = constraint(age_group.as_ref());
        self
    }

    pub fn rw(mut self, rw: impl AsRef<str>) -> Self {
        self.rw = constraint(rw.as_ref());
        self
    }

    pub fn sort(mut self, sort_by: SortField, sort_order: SortDirection) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Pagination {
            page: page.max(1),
            per_page,
        };
        self
    }

    /// Request parameters in the order the backend documents them.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.pagination.page.to_string()),
            ("per_page", self.pagination.per_page.to_string()),
        ];
        let optional = [
            ("search", &self.search),
            ("gender", &self.gender),
            ("age_group", &self.age_group),
            ("rw", &self.rw),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }
        pairs.push(("sort_by", self.sort_by.as_str().to_string()));
        pairs.push(("sort_order", self.sort_order.as_str().to_string()));
        pairs
    }
}

/// One page of the resident list as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LansiaPage {
    #[serde(default)]
    pub data: Vec<LansiaSummary>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub pages: usize,
}

#[async_trait]
pub trait LansiaReader: Send + Sync {
    async fn list_lansia(&self, query: LansiaListQuery) -> RepositoryResult<LansiaPage>;
    async fn get_lansia(&self, id: LansiaId) -> RepositoryResult<Option<LansiaDetail>>;
    async fn filter_options(&self) -> RepositoryResult<FilterOptions>;
}

#[async_trait]
pub trait LansiaWriter: Send + Sync {
    async fn create_lansia(&self, lansia: &NewLansia) -> RepositoryResult<LansiaId>;
    async fn update_lansia(&self, id: LansiaId, lansia: &UpdateLansia) -> RepositoryResult<()>;
    async fn delete_lansia(&self, id: LansiaId) -> RepositoryResult<()>;
    async fn bulk_delete_lansia(&self, ids: &[LansiaId]) -> RepositoryResult<usize>;
}

#[async_trait]
pub trait SpreadsheetTransfer: Send + Sync {
    async fn upload_spreadsheet(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> RepositoryResult<UploadReport>;
    async fn export_template(&self) -> RepositoryResult<Vec<u8>>;
}

#[async_trait]
pub trait DashboardReader: Send + Sync {
    async fn demographics(&self) -> RepositoryResult<Demographics>;
    async fn health(&self) -> RepositoryResult<HealthStats>;
    async fn social_welfare(&self) -> RepositoryResult<SocialWelfareStats>;
    async fn needs_potential(&self) -> RepositoryResult<NeedsPotential>;
    async fn urgent_need_details(&self, need: &str) -> RepositoryResult<Vec<UrgentNeedDetail>>;
    async fn density_map(&self) -> RepositoryResult<DensityMap>;
}

#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> RepositoryResult<SessionUser>;
    async fn logout(&self) -> RepositoryResult<()>;
    /// Returns `None` when the session is not authenticated.
    async fn check_auth(&self) -> RepositoryResult<Option<SessionUser>>;
    async fn forgot_password(&self, email: &str) -> RepositoryResult<String>;
    async fn reset_password(&self, token: &str, password: &str) -> RepositoryResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_sends_only_paging_and_sorting() {
        let pairs = LansiaListQuery::new().to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_string()),
                ("per_page", "10".to_string()),
                ("sort_by", "nama_lengkap".to_string()),
                ("sort_order", "asc".to_string()),
            ]
        );
    }

    #[test]
    fn constrained_values_are_sent_and_sentinels_omitted() {
        let query = LansiaListQuery::new()
            .search("siti")
            .gender("Perempuan")
            .age_group("all")
            .rw("")
            .sort(SortField::Usia, SortDirection::Descending)
            .paginate(0, 25);

        let pairs = query.to_query_pairs();

        assert!(pairs.contains(&("search", "siti".to_string())));
        assert!(pairs.contains(&("gender", "Perempuan".to_string())));
        assert!(pairs.contains(&("page", "1".to_string())));
        assert!(pairs.contains(&("per_page", "25".to_string())));
        assert!(pairs.contains(&("sort_order", "desc".to_string())));
        assert!(pairs.iter().all(|(key, _)| *key != "age_group" && *key != "rw"));
    }

    #[test]
    fn empty_search_is_omitted() {
        let pairs = LansiaListQuery::new().search("").to_query_pairs();
        assert!(pairs.iter().all(|(key, _)| *key != "search"));
    }

    #[test]
    fn search_term_is_sent_untrimmed() {
        let pairs = LansiaListQuery::new().search("  ").to_query_pairs();
        assert!(pairs.contains(&("search", "  ".to_string())));

        let pairs = LansiaListQuery::new().search(" siti ").to_query_pairs();
        assert!(pairs.contains(&("search", " siti ".to_string())));
    }

    #[test]
    fn page_response_ignores_extra_fields() {
        let page: LansiaPage = serde_json::from_str(
            r#"{"data": [], "total": 47, "pages": 5, "current_page": 1, "per_page": 10}"#,
        )
        .unwrap();
        assert_eq!(page.total, 47);
        assert_eq!(page.pages, 5);
    }
}
