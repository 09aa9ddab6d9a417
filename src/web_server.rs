use actix_files::NamedFile;
use actix_web::{http::header, web, App, HttpRequest, HttpResponse, HttpServer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::auth::{bearer_token, LoginRequest, SessionStore};
use crate::config::AppConfig;
use crate::editor::{filter_partners, location_suggestions};
use crate::error::AppError;
use crate::feed::{PhotoFeed, SyntheticFeed};
use crate::layout::{columns_for_width, ColumnBalancer, ColumnSnapshot, DESKTOP_MIN_WIDTH};
use crate::lightbox::LightboxView;
use crate::map::home_map;
use crate::models::{AppDraft, AppPatch, Photo, PhotoDraft, PhotoPatch, PostDraft, PostPatch};
use crate::store::Store;

type StoreData = web::Data<Arc<dyn Store>>;
type FeedData = web::Data<Arc<dyn PhotoFeed>>;

#[derive(Deserialize, Debug)]
struct LayoutQuery {
    width: Option<u32>,
}

#[derive(Serialize, Debug)]
struct LayoutResponse {
    column_count: usize,
    columns: Vec<ColumnSnapshot>,
}

#[derive(Deserialize, Debug)]
struct FeedQuery {
    #[serde(default)]
    page: u32,
}

#[derive(Serialize, Debug)]
struct FeedResponse {
    page: u32,
    photos: Vec<Photo>,
    exhausted: bool,
    /// Distance below the viewport at which the client should request the next page.
    prefetch_margin_px: u32,
}

#[derive(Deserialize, Debug)]
struct DemoQuery {
    pages: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct PartnerQuery {
    #[serde(default)]
    q: String,
    /// Comma-separated ids already tagged on the post.
    #[serde(default)]
    selected: String,
}

async fn index(config: web::Data<AppConfig>) -> Result<NamedFile, AppError> {
    let index_path = Path::new(&config.static_directory).join("index.html");
    NamedFile::open_async(&index_path).await.map_err(|e| {
        log::error!("Error serving {:?}: {}", index_path, e);
        AppError::Io(e)
    })
}

async fn require_admin(req: &HttpRequest, sessions: &SessionStore) -> Result<String, AppError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token = bearer_token(header)?;
    sessions.verify(token).await
}

// ---------- Public ----------

async fn get_apps(store: StoreData) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(store.list_apps().await?))
}

async fn get_posts(store: StoreData) -> Result<HttpResponse, AppError> {
    let posts: Vec<_> = store
        .list_posts()
        .await?
        .into_iter()
        .filter(|p| p.is_published())
        .collect();
    log::debug!("Serving {} published posts", posts.len());
    Ok(HttpResponse::Ok().json(posts))
}

async fn get_post(store: StoreData, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    match store.get_post(&id).await? {
        Some(post) if post.is_published() => Ok(HttpResponse::Ok().json(post)),
        _ => Err(AppError::NotFound(format!("post {}", id))),
    }
}

async fn get_photos(store: StoreData) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(store.list_photos().await?))
}

async fn get_authors(store: StoreData) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(store.list_authors().await?))
}

async fn get_home_map(store: StoreData) -> Result<HttpResponse, AppError> {
    let (posts, photos, authors) =
        futures::try_join!(store.list_posts(), store.list_photos(), store.list_authors())?;
    let posts: Vec<_> = posts.into_iter().filter(|p| p.is_published()).collect();
    Ok(HttpResponse::Ok().json(home_map(&posts, &photos, &authors)))
}

async fn get_layout(
    store: StoreData,
    config: web::Data<AppConfig>,
    query: web::Query<LayoutQuery>,
) -> Result<HttpResponse, AppError> {
    let width = query.width.unwrap_or(DESKTOP_MIN_WIDTH);
    let column_count = columns_for_width(width);
    log::debug!("Laying out gallery for width {} ({} columns)", width, column_count);

    let photos = store.list_photos().await?;
    let mut balancer = ColumnBalancer::new(column_count, config.fallback_aspect_ratio);
    balancer.append(&photos);

    Ok(HttpResponse::Ok().json(LayoutResponse { column_count, columns: balancer.snapshot() }))
}

async fn get_feed(
    feed: FeedData,
    config: web::Data<AppConfig>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.page;
    let photos = feed.fetch_page(page).await?;
    log::debug!("Feed page {} returned {} photos", page, photos.len());
    Ok(HttpResponse::Ok().json(FeedResponse {
        page,
        exhausted: photos.is_empty(),
        photos,
        prefetch_margin_px: config.prefetch_margin_px,
    }))
}

async fn get_lightbox(store: StoreData, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let photo = store
        .get_photo(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("photo {}", id)))?;
    Ok(HttpResponse::Ok().json(LightboxView::for_photo(&photo)))
}

// ---------- Auth ----------

async fn login(
    sessions: web::Data<SessionStore>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(sessions.login(&body).await?))
}

async fn logout(req: HttpRequest, sessions: web::Data<SessionStore>) -> Result<HttpResponse, AppError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    sessions.logout(bearer_token(header)?).await;
    Ok(HttpResponse::NoContent().finish())
}

// ---------- Admin ----------

async fn admin_posts(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    Ok(HttpResponse::Ok().json(store.list_posts().await?))
}

async fn admin_save_app(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    body: web::Json<AppDraft>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let app = body.into_inner().into_app()?;
    Ok(HttpResponse::Ok().json(store.save_app(app).await?))
}

async fn admin_patch_app(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    path: web::Path<String>,
    body: web::Json<AppPatch>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let id = path.into_inner();
    let current = store
        .list_apps()
        .await?
        .into_iter()
        .find(|a| a.id == id)
        .ok_or_else(|| AppError::NotFound(format!("app {}", id)))?;
    let updated = body.into_inner().apply(&current)?;
    Ok(HttpResponse::Ok().json(store.save_app(updated).await?))
}

async fn admin_delete_app(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let id = path.into_inner();
    if !store.delete_app(&id).await? {
        return Err(AppError::NotFound(format!("app {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}

async fn admin_save_post(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    body: web::Json<PostDraft>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let post = body.into_inner().into_post()?;
    Ok(HttpResponse::Ok().json(store.save_post(post).await?))
}

async fn admin_patch_post(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    path: web::Path<String>,
    body: web::Json<PostPatch>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let id = path.into_inner();
    let current = store
        .get_post(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", id)))?;
    let updated = body.into_inner().apply(&current)?;
    Ok(HttpResponse::Ok().json(store.save_post(updated).await?))
}

async fn admin_delete_post(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let id = path.into_inner();
    if !store.delete_post(&id).await? {
        return Err(AppError::NotFound(format!("post {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}

async fn admin_save_photo(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    body: web::Json<PhotoDraft>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let photo = body.into_inner().into_photo()?;
    Ok(HttpResponse::Ok().json(store.save_photo(photo).await?))
}

async fn admin_patch_photo(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    path: web::Path<String>,
    body: web::Json<PhotoPatch>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let id = path.into_inner();
    let current = store
        .get_photo(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("photo {}", id)))?;
    let updated = body.into_inner().apply(&current)?;
    Ok(HttpResponse::Ok().json(store.save_photo(updated).await?))
}

async fn admin_delete_photo(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let id = path.into_inner();
    if !store.delete_photo(&id).await? {
        return Err(AppError::NotFound(format!("photo {}", id)));
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Appends generated demo photos, continuing after any demo pages already stored.
async fn admin_demo_photos(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    config: web::Data<AppConfig>,
    query: web::Query<DemoQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let page_size = config.feed_page_size.max(1);
    let generator = SyntheticFeed::new(page_size, None);

    let existing = store
        .list_photos()
        .await?
        .iter()
        .filter(|p| p.id.starts_with("demo-"))
        .count();
    let pages = query.pages.unwrap_or(1);
    if pages == 0 || pages > config.demo_max_pages {
        return Err(AppError::Validation(format!(
            "pages must be between 1 and {}",
            config.demo_max_pages
        )));
    }
    let first_page = u32::try_from(existing / page_size)
        .map_err(|_| AppError::Validation("demo photo limit reached".into()))?;
    let last_page = first_page
        .checked_add(pages)
        .ok_or_else(|| AppError::Validation("demo photo limit reached".into()))?;

    let batch: Vec<Photo> = (first_page..last_page).flat_map(|p| generator.generate(p)).collect();
    let added = store.append_photos(batch).await?;
    log::info!("Appended {} demo photos", added);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "added": added })))
}

async fn admin_partners(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
    query: web::Query<PartnerQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let authors = store.list_authors().await?;
    let selected: Vec<String> = query
        .selected
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    let matches = filter_partners(&authors, &selected, &query.q);
    Ok(HttpResponse::Ok().json(matches))
}

async fn admin_locations(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    store: StoreData,
) -> Result<HttpResponse, AppError> {
    require_admin(&req, &sessions).await?;
    let (posts, photos) = futures::try_join!(store.list_posts(), store.list_photos())?;
    Ok(HttpResponse::Ok().json(location_suggestions(&posts, &photos)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/apps").route(web::get().to(get_apps)))
        .service(web::resource("/api/posts").route(web::get().to(get_posts)))
        .service(web::resource("/api/posts/{id}").route(web::get().to(get_post)))
        .service(web::resource("/api/photos").route(web::get().to(get_photos)))
        .service(web::resource("/api/photos/{id}/lightbox").route(web::get().to(get_lightbox)))
        .service(web::resource("/api/authors").route(web::get().to(get_authors)))
        .service(web::resource("/api/map").route(web::get().to(get_home_map)))
        .service(web::resource("/api/gallery/layout").route(web::get().to(get_layout)))
        .service(web::resource("/api/gallery/feed").route(web::get().to(get_feed)))
        .service(web::resource("/api/admin/login").route(web::post().to(login)))
        .service(web::resource("/api/admin/logout").route(web::post().to(logout)))
        .service(web::resource("/api/admin/posts").route(web::get().to(admin_posts)).route(web::post().to(admin_save_post)))
        .service(
            web::resource("/api/admin/posts/{id}")
                .route(web::patch().to(admin_patch_post))
                .route(web::delete().to(admin_delete_post)),
        )
        .service(web::resource("/api/admin/apps").route(web::post().to(admin_save_app)))
        .service(
            web::resource("/api/admin/apps/{id}")
                .route(web::patch().to(admin_patch_app))
                .route(web::delete().to(admin_delete_app)),
        )
        .service(web::resource("/api/admin/photos").route(web::post().to(admin_save_photo)))
        .service(web::resource("/api/admin/photos/demo").route(web::post().to(admin_demo_photos)))
        .service(
            web::resource("/api/admin/photos/{id}")
                .route(web::patch().to(admin_patch_photo))
                .route(web::delete().to(admin_delete_photo)),
        )
        .service(web::resource("/api/admin/partners").route(web::get().to(admin_partners)))
        .service(web::resource("/api/admin/locations").route(web::get().to(admin_locations)));
}

pub async fn start_web_server(
    config: Arc<AppConfig>,
    store: Arc<dyn Store>,
    feed: Arc<dyn PhotoFeed>,
) -> std::io::Result<()> {
    let port = config.web_port;
    let static_directory = config.static_directory.clone();
    let sessions = web::Data::new(SessionStore::new(&config));
    let config_data = web::Data::from(config);
    let store_data = web::Data::new(store);
    let feed_data = web::Data::new(feed);

    log::info!("Starting web server on port: {}", port);
    log::debug!("Serving static files from {} directory.", static_directory);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .app_data(store_data.clone())
            .app_data(feed_data.clone())
            .app_data(sessions.clone())
            .configure(configure)
            .service(actix_files::Files::new("/static", &static_directory))
            .default_service(web::to(index)) // Serve index.html for any unmatched route
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store_backends::memory::MemoryStore;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{json, Value};

    struct Harness {
        store: web::Data<Arc<dyn Store>>,
        feed: web::Data<Arc<dyn PhotoFeed>>,
        sessions: web::Data<SessionStore>,
        config: web::Data<AppConfig>,
    }

    fn harness() -> Harness {
        harness_with(AppConfig::for_tests())
    }

    fn harness_with(config: AppConfig) -> Harness {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let feed: Arc<dyn PhotoFeed> = Arc::new(SyntheticFeed::new(config.feed_page_size, config.feed_max_pages));
        Harness {
            store: web::Data::new(store),
            feed: web::Data::new(feed),
            sessions: web::Data::new(SessionStore::new(&config)),
            config: web::Data::new(config),
        }
    }

    macro_rules! service {
        ($h:expr) => {
            test::init_service(
                App::new()
                    .app_data($h.config.clone())
                    .app_data($h.store.clone())
                    .app_data($h.feed.clone())
                    .app_data($h.sessions.clone())
                    .configure(configure),
            )
            .await
        };
    }

    async fn token(h: &Harness) -> String {
        h.sessions
            .login(&LoginRequest { username: "admin".into(), password: "password".into() })
            .await
            .unwrap()
            .token
    }

    #[actix_web::test]
    async fn public_posts_hide_drafts() {
        let h = harness();
        let mut draft = h.store.get_post("1").await.unwrap().unwrap();
        draft.status = crate::models::PostStatus::Draft;
        h.store.save_post(draft).await.unwrap();
        let app = service!(h);

        let posts: Vec<Value> =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
        assert_eq!(posts.len(), 2);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts/1").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn layout_spreads_photos_over_columns() {
        let h = harness();
        let app = service!(h);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/gallery/layout?width=1200").to_request(),
        )
        .await;
        assert_eq!(body["column_count"], 3);
        let placed: usize = body["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["photos"].as_array().unwrap().len())
            .sum();
        assert_eq!(placed, 4);

        let narrow: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/gallery/layout?width=500").to_request(),
        )
        .await;
        assert_eq!(narrow["column_count"], 1);
    }

    #[actix_web::test]
    async fn feed_reports_exhaustion() {
        let h = harness();
        let app = service!(h);

        let first: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/gallery/feed").to_request()).await;
        assert_eq!(first["photos"].as_array().unwrap().len(), 4);
        assert_eq!(first["exhausted"], false);
        assert_eq!(first["prefetch_margin_px"], 600);

        let last: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/gallery/feed?page=2").to_request(),
        )
        .await;
        assert_eq!(last["exhausted"], true);
    }

    #[actix_web::test]
    async fn endless_feed_answers_far_pages_as_exhausted() {
        let mut config = AppConfig::for_tests();
        config.feed_max_pages = None;
        let h = harness_with(config);
        let app = service!(h);

        for page in ["20000000", "4294967295"] {
            let resp = test::call_service(
                &app,
                test::TestRequest::get().uri(&format!("/api/gallery/feed?page={}", page)).to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["exhausted"], true);
            assert!(body["photos"].as_array().unwrap().is_empty());
        }

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/gallery/feed?page=4294967296").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn lightbox_focuses_map_on_photo() {
        let h = harness();
        let app = service!(h);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/photos/3/lightbox").to_request(),
        )
        .await;
        assert_eq!(body["photo"]["id"], "3");
        assert_eq!(body["map"]["zoom"], 10);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/photos/99/lightbox").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn home_map_lists_located_content() {
        let h = harness();
        let app = service!(h);
        let body: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/map").to_request()).await;
        assert_eq!(body["points"].as_array().unwrap().len(), 6);
        assert_eq!(body["zoom"], 2);
    }

    #[actix_web::test]
    async fn login_and_logout() {
        let h = harness();
        let app = service!(h);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/login")
                .set_json(json!({ "username": "Admin", "password": "nope" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/login")
                .set_json(json!({ "username": "Admin", "password": "password" }))
                .to_request(),
        )
        .await;
        let token = body["token"].as_str().unwrap().to_string();
        assert_eq!(body["user"], "Admin");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/logout")
                .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(h.sessions.verify(&token).await.is_err());
    }

    #[actix_web::test]
    async fn admin_routes_require_token() {
        let h = harness();
        let app = service!(h);
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/admin/posts").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/api/admin/photos/1")
                .insert_header((header::AUTHORIZATION, "Bearer forged"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(h.store.get_photo("1").await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn admin_photo_crud() {
        let h = harness();
        let auth = (header::AUTHORIZATION, format!("Bearer {}", token(&h).await));
        let app = service!(h);

        let saved: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/photos")
                .insert_header(auth.clone())
                .set_json(json!({
                    "url": "https://picsum.photos/600/900",
                    "caption": "Harbour at dawn",
                    "date": "2024-04-02",
                    "location": { "lat": -33.86, "lng": 151.21, "name": "Sydney" }
                }))
                .to_request(),
        )
        .await;
        let id = saved["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());
        assert_eq!(h.store.list_photos().await.unwrap().len(), 5);

        let patched: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/admin/photos/{}", id))
                .insert_header(auth.clone())
                .set_json(json!({ "caption": "Harbour at dusk" }))
                .to_request(),
        )
        .await;
        assert_eq!(patched["caption"], "Harbour at dusk");
        assert_eq!(patched["url"], "https://picsum.photos/600/900");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/photos")
                .insert_header(auth.clone())
                .set_json(json!({
                    "url": "https://picsum.photos/600/900",
                    "caption": "",
                    "date": "2024-04-02",
                    "location": { "lat": 0.0, "lng": 0.0, "name": "" }
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let resp = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/api/admin/photos/{}", id))
                .insert_header(auth.clone())
                .set_json(json!({ "likes": 3 }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let uri = format!("/api/admin/photos/{}", id);
        let resp = test::call_service(
            &app,
            test::TestRequest::delete().uri(&uri).insert_header(auth.clone()).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let resp =
            test::call_service(&app, test::TestRequest::delete().uri(&uri).insert_header(auth).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn admin_sees_drafts_and_edits_apps() {
        let h = harness();
        let auth = (header::AUTHORIZATION, format!("Bearer {}", token(&h).await));
        let app = service!(h);

        let post: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/posts")
                .insert_header(auth.clone())
                .set_json(json!({ "title": "Work in progress", "date": "2024-05-01", "status": "draft" }))
                .to_request(),
        )
        .await;
        assert_eq!(post["readTime"], "5 min read");

        let all: Vec<Value> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/admin/posts").insert_header(auth.clone()).to_request(),
        )
        .await;
        assert_eq!(all.len(), 4);

        let updated: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::patch()
                .uri("/api/admin/apps/2")
                .insert_header(auth.clone())
                .set_json(json!({ "tags": ["Finance", " ", "Rust"] }))
                .to_request(),
        )
        .await;
        assert_eq!(updated["tags"], json!(["Finance", "Rust"]));

        let resp = test::call_service(
            &app,
            test::TestRequest::delete().uri("/api/admin/apps/3").insert_header(auth).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(h.store.list_apps().await.unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn demo_photos_continue_after_existing_pages() {
        let h = harness();
        let auth = (header::AUTHORIZATION, format!("Bearer {}", token(&h).await));
        let app = service!(h);

        for _ in 0..2 {
            let body: Value = test::call_and_read_body_json(
                &app,
                test::TestRequest::post()
                    .uri("/api/admin/photos/demo?pages=2")
                    .insert_header(auth.clone())
                    .to_request(),
            )
            .await;
            assert_eq!(body["added"], 8);
        }
        assert_eq!(h.store.list_photos().await.unwrap().len(), 4 + 16);
    }

    #[actix_web::test]
    async fn demo_photo_page_count_is_bounded() {
        let h = harness();
        let auth = (header::AUTHORIZATION, format!("Bearer {}", token(&h).await));
        let app = service!(h);

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/photos/demo?pages=1")
                .insert_header(auth.clone())
                .to_request(),
        )
        .await;
        assert_eq!(body["added"], 4);

        for pages in ["0", "4", "4294967295"] {
            let resp = test::call_service(
                &app,
                test::TestRequest::post()
                    .uri(&format!("/api/admin/photos/demo?pages={}", pages))
                    .insert_header(auth.clone())
                    .to_request(),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY, "pages={}", pages);
        }
        assert_eq!(h.store.list_photos().await.unwrap().len(), 4 + 4);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/admin/photos/demo?pages=3")
                .insert_header(auth)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(h.store.list_photos().await.unwrap().len(), 4 + 4 + 12);
    }

    #[actix_web::test]
    async fn partner_and_location_suggestions() {
        let h = harness();
        let auth = (header::AUTHORIZATION, format!("Bearer {}", token(&h).await));
        let app = service!(h);

        let partners: Vec<Value> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/admin/partners?q=i&selected=1,3")
                .insert_header(auth.clone())
                .to_request(),
        )
        .await;
        assert_eq!(partners.len(), 1);
        assert_eq!(partners[0]["name"], "Aria");

        let locations: Vec<Value> = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/admin/locations").insert_header(auth).to_request(),
        )
        .await;
        assert_eq!(locations.len(), 6);
    }
}
