use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, header_regex, method, path, query_param,
    query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lansia_admin::domain::auth::Credentials;
use lansia_admin::domain::types::{LansiaId, SortDirection, SortField};
use lansia_admin::repository::errors::RepositoryError;
use lansia_admin::repository::{
    AuthGateway, DashboardReader, HttpRepository, LansiaListQuery, LansiaReader, LansiaWriter,
    SpreadsheetTransfer,
};

fn repository(server: &MockServer) -> HttpRepository {
    HttpRepository::new(&format!("{}/api", server.uri()), Duration::from_secs(5)).unwrap()
}

fn id(value: i32) -> LansiaId {
    LansiaId::new(value).unwrap()
}

#[tokio::test]
async fn test_list_sends_only_constrained_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/lansia"))
        .and(query_param("page", "2"))
        .and(query_param("per_page", "25"))
        .and(query_param("gender", "Perempuan"))
        .and(query_param("sort_by", "usia"))
        .and(query_param("sort_order", "desc"))
        .and(query_param_is_missing("search"))
        .and(query_param_is_missing("age_group"))
        .and(query_param_is_missing("rw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "id": 4,
                "nama_lengkap": "Siti Aminah",
                "nik": "3273010101500001",
                "jenis_kelamin": "Perempuan",
                "usia": 74,
                "rt": "01",
                "rw": "05"
            }],
            "total": 26,
            "pages": 2,
            "current_page": 2,
            "per_page": 25
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = LansiaListQuery::new()
        .search("")
        .gender("Perempuan")
        .age_group("all")
        .sort(SortField::Usia, SortDirection::Descending)
        .paginate(2, 25);
    let page = repository(&server).list_lansia(query).await.unwrap();

    assert_eq!(page.total, 26);
    assert_eq!(page.pages, 2);
    assert_eq!(page.data[0].nama_lengkap, "Siti Aminah");
}

#[tokio::test]
async fn test_missing_detail_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/lansia/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not found" })))
        .mount(&server)
        .await;

    let detail = repository(&server).get_lansia(id(9)).await.unwrap();

    assert!(detail.is_none());
}

#[tokio::test]
async fn test_seeded_detail_with_string_aid_decodes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/lansia/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3,
            "nama_lengkap": "Siti Aminah",
            "nik": "3273010101500001",
            "jenis_kelamin": "Perempuan",
            "tanggal_lahir": "1950-01-01",
            "kesehatan": {
                "kondisi_kesehatan_umum": "Sehat",
                "riwayat_penyakit_kronis": ["Hipertensi"],
                "alat_bantu": "Tidak ada",
                "riwayat_imunisasi": "Influenza 2023"
            },
            "kesejahteraan": { "kebutuhan_mendesak": [] },
            "keluarga": null
        })))
        .mount(&server)
        .await;

    let detail = repository(&server).get_lansia(id(3)).await.unwrap().unwrap();
    let health = detail.kesehatan.unwrap();

    assert_eq!(health.alat_bantu, Some(vec!["Tidak ada".to_string()]));
    assert_eq!(health.riwayat_imunisasi.as_deref(), Some("Influenza 2023"));
}

#[tokio::test]
async fn test_bulk_delete_posts_every_id_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/lansia/bulk-delete"))
        .and(body_json(json!({ "ids": [1, 2, 3] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "3 data berhasil dihapus",
            "deleted_count": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let deleted = repository(&server)
        .bulk_delete_lansia(&[id(1), id(2), id(3)])
        .await
        .unwrap();

    assert_eq!(deleted, 3);
}

#[tokio::test]
async fn test_delete_uses_the_record_url() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/lansia/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    repository(&server).delete_lansia(id(12)).await.unwrap();
}

#[tokio::test]
async fn test_rejection_carries_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/lansia/bulk-delete"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Tidak ada ID yang dipilih" })),
        )
        .mount(&server)
        .await;

    let err = repository(&server)
        .bulk_delete_lansia(&[id(1)])
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RepositoryError::Server {
            status: 400,
            message: "Tidak ada ID yang dipilih".into()
        }
    );
}

#[tokio::test]
async fn test_failure_without_envelope_uses_the_status_reason() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/filter-options"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;

    let err = repository(&server).filter_options().await.unwrap_err();

    assert_eq!(
        err,
        RepositoryError::Server {
            status: 500,
            message: "Internal Server Error".into()
        }
    );
}

#[tokio::test]
async fn test_unauthorized_session_check_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "authenticated": false,
            "message": "Not authenticated"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/demographics"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Not authenticated" })),
        )
        .mount(&server)
        .await;

    let repo = repository(&server);

    assert_eq!(repo.check_auth().await.unwrap(), None);
    assert_eq!(
        repo.demographics().await.unwrap_err(),
        RepositoryError::Unauthorized(Some("Not authenticated".into()))
    );
}

#[tokio::test]
async fn test_login_cookie_is_replayed() {
    let server = MockServer::start().await;
    let user = json!({ "id": 1, "username": "admin", "email": "admin@example.com", "role": "admin" });
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({ "username": "admin", "password": "rahasia" })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "session=abc123; Path=/; HttpOnly")
                .set_body_json(json!({ "message": "Login berhasil", "user": user })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/check-auth"))
        .and(header("cookie", "session=abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "authenticated": true, "user": user })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let repo = repository(&server);
    let logged_in = repo
        .login(&Credentials {
            username: "admin".into(),
            password: "rahasia".into(),
        })
        .await
        .unwrap();
    let current = repo.check_auth().await.unwrap().unwrap();

    assert!(logged_in.is_admin());
    assert_eq!(current, logged_in);
}

#[tokio::test]
async fn test_rejected_login_keeps_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/forgot-password"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Email not found" })),
        )
        .mount(&server)
        .await;

    let repo = repository(&server);
    let login = repo
        .login(&Credentials {
            username: "admin".into(),
            password: "salah".into(),
        })
        .await
        .unwrap_err();
    let forgot = repo.forgot_password("tidak.ada@example.com").await.unwrap_err();

    assert_eq!(
        login,
        RepositoryError::Unauthorized(Some("Invalid credentials".into()))
    );
    assert_eq!(forgot, RepositoryError::NotFound(Some("Email not found".into())));
}

#[tokio::test]
async fn test_upload_sends_a_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload-excel"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"data_lansia.xlsx\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Berhasil mengupload 2 data",
            "count": 2,
            "errors": ["Baris 4: NIK sudah terdaftar"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = repository(&server)
        .upload_spreadsheet("data_lansia.xlsx", b"PK\x03\x04".to_vec())
        .await
        .unwrap();

    assert_eq!(report.count, 2);
    assert!(report.has_errors());
}

#[tokio::test]
async fn test_template_is_returned_as_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/export-template"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PK\x03\x04template".to_vec()))
        .mount(&server)
        .await;

    let bytes = repository(&server).export_template().await.unwrap();

    assert_eq!(bytes, b"PK\x03\x04template".to_vec());
}

#[tokio::test]
async fn test_password_reset_uses_put() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/reset-password"))
        .and(body_json(json!({ "token": "t0k3n", "password": "rahasia123" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Password berhasil diubah" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let message = repository(&server)
        .reset_password("t0k3n", "rahasia123")
        .await
        .unwrap();

    assert_eq!(message, "Password berhasil diubah");
}

#[tokio::test]
async fn test_urgent_need_details_use_the_need_as_a_path_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/urgent-need-details/Pangan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "nama_lengkap": "Siti Aminah",
            "nik": "3273010101500001",
            "rt": "01",
            "rw": "05",
            "kebutuhan": ["Pangan"]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let details = repository(&server).urgent_need_details("Pangan").await.unwrap();

    assert_eq!(details.len(), 1);
    assert_eq!(details[0].kebutuhan, vec!["Pangan".to_string()]);
}

#[tokio::test]
async fn test_density_map_is_keyed_by_rw() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/density-map"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "01": 12, "05": 3 })))
        .mount(&server)
        .await;

    let density = repository(&server).density_map().await.unwrap();

    assert_eq!(density.get("01"), Some(&12));
    assert_eq!(density.get("05"), Some(&3));
}
