use crate::domain::filter::FilterOptions;
use crate::domain::lansia::{LansiaDetail, LansiaSummary};
use crate::domain::types::LansiaId;
use crate::forms::lansia::LansiaForm;
use crate::pagination::ResultPage;
use crate::repository::{LansiaListQuery, LansiaReader, LansiaWriter};
use crate::services::{ServiceError, ServiceResult};

/// Fetches one page of the resident list.
pub async fn list_lansia<R>(
    repo: &R,
    query: LansiaListQuery,
) -> ServiceResult<ResultPage<LansiaSummary>>
where
    R: LansiaReader + ?Sized,
{
    let page = query.pagination.page;
    let per_page = query.pagination.per_page;

    let result = repo.list_lansia(query).await.map_err(|err| {
        log::error!("Failed to list lansia: {err}");
        ServiceError::from(err)
    })?;

    Ok(ResultPage::new(
        result.data,
        result.total,
        result.pages,
        page,
        per_page,
    ))
}

/// Loads the full record shown in the detail view.
pub async fn load_lansia<R>(repo: &R, id: LansiaId) -> ServiceResult<LansiaDetail>
where
    R: LansiaReader + ?Sized,
{
    match repo.get_lansia(id).await {
        Ok(Some(detail)) => Ok(detail),
        Ok(None) => Err(ServiceError::NotFound(None)),
        Err(err) => {
            log::error!("Failed to load lansia {id}: {err}");
            Err(err.into())
        }
    }
}

/// Validates the input form and creates a new record.
pub async fn create_lansia<R>(repo: &R, form: &LansiaForm) -> ServiceResult<LansiaId>
where
    R: LansiaWriter + ?Sized,
{
    let new_lansia = form.to_new_lansia().map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    let id = repo.create_lansia(&new_lansia).await.map_err(|err| {
        log::error!("Failed to create lansia: {err}");
        ServiceError::from(err)
    })?;

    log::info!("Created lansia {id}");
    Ok(id)
}

/// Validates the edit form and replaces the stored record.
pub async fn update_lansia<R>(repo: &R, id: LansiaId, form: &LansiaForm) -> ServiceResult<()>
where
    R: LansiaWriter + ?Sized,
{
    let update = form.to_update_lansia().map_err(|err| {
        log::error!("Failed to validate form: {err}");
        err
    })?;

    repo.update_lansia(id, &update).await.map_err(|err| {
        log::error!("Failed to update lansia {id}: {err}");
        ServiceError::from(err)
    })
}

pub async fn delete_lansia<R>(repo: &R, id: LansiaId) -> ServiceResult<()>
where
    R: LansiaWriter + ?Sized,
{
    repo.delete_lansia(id).await.map_err(|err| {
        log::error!("Failed to delete lansia {id}: {err}");
        ServiceError::from(err)
    })
}

/// Deletes every record in `ids` with a single request and returns the
/// number of deleted rows.
pub async fn bulk_delete_lansia<R>(repo: &R, ids: &[LansiaId]) -> ServiceResult<usize>
where
    R: LansiaWriter + ?Sized,
{
    if ids.is_empty() {
        return Err(ServiceError::Form("Tidak ada data yang dipilih".to_string()));
    }

    repo.bulk_delete_lansia(ids).await.map_err(|err| {
        log::error!("Failed to delete {} lansia: {err}", ids.len());
        ServiceError::from(err)
    })
}

pub async fn load_filter_options<R>(repo: &R) -> ServiceResult<FilterOptions>
where
    R: LansiaReader + ?Sized,
{
    repo.filter_options().await.map_err(|err| {
        log::error!("Failed to load filter options: {err}");
        ServiceError::from(err)
    })
}
