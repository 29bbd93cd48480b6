//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::auth::{Credentials, SessionUser};
use crate::domain::dashboard::{
    Demographics, DensityMap, HealthStats, NeedsPotential, SocialWelfareStats, UrgentNeedDetail,
};
use crate::domain::filter::FilterOptions;
use crate::domain::lansia::{LansiaDetail, NewLansia, UpdateLansia};
use crate::domain::types::LansiaId;
use crate::domain::upload::UploadReport;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AuthGateway, DashboardReader, LansiaListQuery, LansiaPage, LansiaReader, LansiaWriter,
    SpreadsheetTransfer,
};

mock! {
    pub Repository {}

    #[async_trait]
    impl LansiaReader for Repository {
        async fn list_lansia(&self, query: LansiaListQuery) -> RepositoryResult<LansiaPage>;
        async fn get_lansia(&self, id: LansiaId) -> RepositoryResult<Option<LansiaDetail>>;
        async fn filter_options(&self) -> RepositoryResult<FilterOptions>;
    }

    #[async_trait]
    impl LansiaWriter for Repository {
        async fn create_lansia(&self, lansia: &NewLansia) -> RepositoryResult<LansiaId>;
        async fn update_lansia(&self, id: LansiaId, lansia: &UpdateLansia) -> RepositoryResult<()>;
        async fn delete_lansia(&self, id: LansiaId) -> RepositoryResult<()>;
        async fn bulk_delete_lansia(&self, ids: &[LansiaId]) -> RepositoryResult<usize>;
    }

    #[async_trait]
    impl SpreadsheetTransfer for Repository {
        async fn upload_spreadsheet(
            &self,
            file_name: &str,
            bytes: Vec<u8>,
        ) -> RepositoryResult<UploadReport>;
        async fn export_template(&self) -> RepositoryResult<Vec<u8>>;
    }

    #[async_trait]
    impl DashboardReader for Repository {
        async fn demographics(&self) -> RepositoryResult<Demographics>;
        async fn health(&self) -> RepositoryResult<HealthStats>;
        async fn social_welfare(&self) -> RepositoryResult<SocialWelfareStats>;
        async fn needs_potential(&self) -> RepositoryResult<NeedsPotential>;
        async fn urgent_need_details(&self, need: &str) -> RepositoryResult<Vec<UrgentNeedDetail>>;
        async fn density_map(&self) -> RepositoryResult<DensityMap>;
    }

    #[async_trait]
    impl AuthGateway for Repository {
        async fn login(&self, credentials: &Credentials) -> RepositoryResult<SessionUser>;
        async fn logout(&self) -> RepositoryResult<()>;
        async fn check_auth(&self) -> RepositoryResult<Option<SessionUser>>;
        async fn forgot_password(&self, email: &str) -> RepositoryResult<String>;
        async fn reset_password(&self, token: &str, password: &str) -> RepositoryResult<String>;
    }
}
