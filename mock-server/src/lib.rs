use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub const DEFAULT_PER_PAGE: u64 = 15;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Blog {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub author_id: u64,
    pub is_active: bool,
    pub order: i64,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub views: u64,
    pub published_at: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// `{success, data, message}` wrapper used by every endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T> Envelope<T> {
    fn ok(data: T, message: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.to_string(),
        }
    }
}

/// Length-aware paginator payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBlog {
    pub title: String,
    pub content: String,
    pub author_id: u64,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub is_active: Option<bool>,
    pub order: Option<i64>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct UpdateBlog {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author_id: Option<u64>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub is_active: Option<bool>,
    pub order: Option<i64>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub published_at: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub is_active: Option<u8>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
    pub per_page: Option<u64>,
    pub page: Option<u64>,
}

#[derive(Deserialize)]
pub struct OrderInput {
    pub order: i64,
}

#[derive(Deserialize)]
pub struct OrderEntry {
    pub id: u64,
    pub order: i64,
}

#[derive(Deserialize)]
pub struct BulkOrderInput {
    pub orders: Vec<OrderEntry>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    blogs: BTreeMap<u64, Blog>,
}

impl Store {
    fn live(&self, id: u64) -> Option<&Blog> {
        self.blogs.get(&id).filter(|b| b.deleted_at.is_none())
    }

    fn live_mut(&mut self, id: u64) -> Option<&mut Blog> {
        self.blogs.get_mut(&id).filter(|b| b.deleted_at.is_none())
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Failure answered with a `success: false` envelope.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    message: String,
}

impl ApiFailure {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Blog not found".to_string(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let body = Envelope::<()> {
            success: false,
            data: None,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/blogs", get(list_blogs).post(create_blog))
        .route("/api/blogs/bulk-update-order", post(bulk_update_order))
        .route("/api/blogs/{id}", put(update_blog).delete(delete_blog))
        .route("/api/blogs/{id}/set-active", post(set_active))
        .route("/api/blogs/{id}/set-inactive", post(set_inactive))
        .route("/api/blogs/{id}/order", put(update_order))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

async fn list_blogs(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> Json<Envelope<Page<Blog>>> {
    let store = db.read().await;
    let mut blogs: Vec<Blog> = store
        .blogs
        .values()
        .filter(|b| b.deleted_at.is_none())
        .filter(|b| query.is_active.is_none_or(|flag| b.is_active == (flag != 0)))
        .filter(|b| match query.search.as_deref() {
            Some(term) if !term.is_empty() => matches_search(b, term),
            _ => true,
        })
        .cloned()
        .collect();

    sort_blogs(&mut blogs, &query);

    let per_page = query.per_page.filter(|n| *n > 0).unwrap_or(DEFAULT_PER_PAGE);
    let page = paginate(blogs, query.page.unwrap_or(1).max(1), per_page);
    tracing::debug!(total = page.total, page = page.current_page, "listed blogs");
    Json(Envelope::ok(page, "Blogs retrieved successfully"))
}

fn matches_search(blog: &Blog, term: &str) -> bool {
    let term = term.to_lowercase();
    blog.title.to_lowercase().contains(&term)
        || blog.content.to_lowercase().contains(&term)
        || blog
            .excerpt
            .as_deref()
            .is_some_and(|e| e.to_lowercase().contains(&term))
}

/// `order_by=order` wins over `sort_by`; with neither, display order then id.
fn sort_blogs(blogs: &mut [Blog], query: &ListQuery) {
    let (column, direction) = if query.order_by.as_deref() == Some("order") {
        ("order", query.order_direction.as_deref())
    } else if let Some(column) = query.sort_by.as_deref() {
        (column, query.sort_order.as_deref())
    } else {
        ("order", None)
    };
    let descending = direction == Some("desc");

    blogs.sort_by(|a, b| {
        let ordering = match column {
            "title" => a.title.cmp(&b.title),
            "created_at" => a.created_at.cmp(&b.created_at),
            "updated_at" => a.updated_at.cmp(&b.updated_at),
            "published_at" => a.published_at.cmp(&b.published_at),
            "views" => a.views.cmp(&b.views),
            "order" => a.order.cmp(&b.order),
            _ => a.id.cmp(&b.id),
        }
        .then(a.id.cmp(&b.id));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn paginate(blogs: Vec<Blog>, current_page: u64, per_page: u64) -> Page<Blog> {
    let total = blogs.len() as u64;
    let last_page = total.div_ceil(per_page).max(1);
    let skip = (current_page - 1).saturating_mul(per_page);
    let data: Vec<Blog> = blogs
        .into_iter()
        .skip(skip as usize)
        .take(per_page as usize)
        .collect();
    let (from, to) = if data.is_empty() {
        (None, None)
    } else {
        (Some(skip + 1), Some(skip + data.len() as u64))
    };
    let link = |page: u64| format!("/api/blogs?page={page}");
    Page {
        current_page,
        last_page,
        per_page,
        total,
        from,
        to,
        next_page_url: (current_page < last_page).then(|| link(current_page + 1)),
        prev_page_url: (current_page > 1).then(|| link(current_page - 1)),
        data,
    }
}

async fn create_blog(
    State(db): State<Db>,
    Json(input): Json<CreateBlog>,
) -> (StatusCode, Json<Envelope<Blog>>) {
    let mut store = db.write().await;
    store.next_id += 1;
    let now = Utc::now();
    let blog = Blog {
        id: store.next_id,
        slug: input.slug.unwrap_or_else(|| slugify(&input.title)),
        title: input.title,
        content: input.content,
        excerpt: input.excerpt,
        featured_image: input.featured_image,
        author_id: input.author_id,
        is_active: input.is_active.unwrap_or(true),
        order: input.order.unwrap_or(0),
        meta_title: input.meta_title,
        meta_description: input.meta_description,
        meta_keywords: input.meta_keywords,
        views: 0,
        published_at: input.published_at,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    store.blogs.insert(blog.id, blog.clone());
    tracing::debug!(id = blog.id, "created blog");
    (
        StatusCode::CREATED,
        Json(Envelope::ok(blog, "Blog created successfully")),
    )
}

async fn update_blog(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateBlog>,
) -> Result<Json<Envelope<Blog>>, ApiFailure> {
    let mut store = db.write().await;
    let blog = store.live_mut(id).ok_or_else(ApiFailure::not_found)?;
    if let Some(title) = input.title {
        blog.title = title;
    }
    if let Some(content) = input.content {
        blog.content = content;
    }
    if let Some(author_id) = input.author_id {
        blog.author_id = author_id;
    }
    if let Some(slug) = input.slug {
        blog.slug = slug;
    }
    if let Some(is_active) = input.is_active {
        blog.is_active = is_active;
    }
    if let Some(order) = input.order {
        blog.order = order;
    }
    if input.excerpt.is_some() {
        blog.excerpt = input.excerpt;
    }
    if input.featured_image.is_some() {
        blog.featured_image = input.featured_image;
    }
    if input.meta_title.is_some() {
        blog.meta_title = input.meta_title;
    }
    if input.meta_description.is_some() {
        blog.meta_description = input.meta_description;
    }
    if input.meta_keywords.is_some() {
        blog.meta_keywords = input.meta_keywords;
    }
    if input.published_at.is_some() {
        blog.published_at = input.published_at;
    }
    blog.updated_at = Utc::now();
    Ok(Json(Envelope::ok(blog.clone(), "Blog updated successfully")))
}

async fn delete_blog(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiFailure> {
    let mut store = db.write().await;
    let blog = store.live_mut(id).ok_or_else(ApiFailure::not_found)?;
    blog.deleted_at = Some(Utc::now());
    tracing::debug!(id, "soft-deleted blog");
    Ok(StatusCode::NO_CONTENT)
}

async fn set_active(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Envelope<Blog>>, ApiFailure> {
    set_status(&db, id, true).await.map(Json)
}

async fn set_inactive(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<Json<Envelope<Blog>>, ApiFailure> {
    set_status(&db, id, false).await.map(Json)
}

async fn set_status(db: &Db, id: u64, active: bool) -> Result<Envelope<Blog>, ApiFailure> {
    let mut store = db.write().await;
    let blog = store.live_mut(id).ok_or_else(ApiFailure::not_found)?;
    blog.is_active = active;
    blog.updated_at = Utc::now();
    let message = if active {
        "Blog activated successfully"
    } else {
        "Blog deactivated successfully"
    };
    Ok(Envelope::ok(blog.clone(), message))
}

async fn update_order(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<OrderInput>,
) -> Result<Json<Envelope<Blog>>, ApiFailure> {
    let mut store = db.write().await;
    let blog = store.live_mut(id).ok_or_else(ApiFailure::not_found)?;
    blog.order = input.order;
    blog.updated_at = Utc::now();
    Ok(Json(Envelope::ok(blog.clone(), "Blog order updated successfully")))
}

/// All-or-nothing: an unknown id leaves every row untouched.
async fn bulk_update_order(
    State(db): State<Db>,
    Json(input): Json<BulkOrderInput>,
) -> Result<Json<Envelope<Vec<Blog>>>, ApiFailure> {
    let mut store = db.write().await;
    if input.orders.iter().any(|entry| store.live(entry.id).is_none()) {
        return Err(ApiFailure::not_found());
    }
    let now = Utc::now();
    let mut updated = Vec::with_capacity(input.orders.len());
    for entry in input.orders {
        if let Some(blog) = store.live_mut(entry.id) {
            blog.order = entry.order;
            blog.updated_at = now;
            updated.push(blog.clone());
        }
    }
    Ok(Json(Envelope::ok(updated, "Blog orders updated successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blog(id: u64, title: &str, order: i64) -> Blog {
        let now = Utc::now();
        Blog {
            id,
            title: title.to_string(),
            slug: slugify(title),
            content: format!("{title} content"),
            excerpt: None,
            featured_image: None,
            author_id: 1,
            is_active: true,
            order,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            views: 0,
            published_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust   2024 "), "rust-2024");
        assert_eq!(slugify("***"), "");
    }

    #[test]
    fn paginate_middle_page() {
        let blogs = (1..=21).map(|i| blog(i, "t", 0)).collect();
        let page = paginate(blogs, 2, 10);
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.data[0].id, 11);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.total, 21);
        assert_eq!(page.from, Some(11));
        assert_eq!(page.to, Some(20));
        assert_eq!(page.next_page_url.as_deref(), Some("/api/blogs?page=3"));
        assert_eq!(page.prev_page_url.as_deref(), Some("/api/blogs?page=1"));
    }

    #[test]
    fn paginate_empty_has_one_page() {
        let page = paginate(Vec::new(), 1, 15);
        assert_eq!(page.last_page, 1);
        assert!(page.from.is_none());
        assert!(page.next_page_url.is_none());
        assert!(page.prev_page_url.is_none());
    }

    #[test]
    fn order_by_takes_precedence_over_sort_by() {
        let mut blogs = vec![blog(1, "b", 2), blog(2, "a", 1), blog(3, "c", 3)];
        let query = ListQuery {
            sort_by: Some("title".to_string()),
            order_by: Some("order".to_string()),
            order_direction: Some("desc".to_string()),
            ..Default::default()
        };
        sort_blogs(&mut blogs, &query);
        let ids: Vec<u64> = blogs.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn sort_by_title() {
        let mut blogs = vec![blog(1, "b", 0), blog(2, "a", 0), blog(3, "c", 0)];
        let query = ListQuery {
            sort_by: Some("title".to_string()),
            ..Default::default()
        };
        sort_blogs(&mut blogs, &query);
        let ids: Vec<u64> = blogs.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn search_covers_excerpt() {
        let mut b = blog(1, "Title", 0);
        b.excerpt = Some("Ferris the crab".to_string());
        assert!(matches_search(&b, "CRAB"));
        assert!(matches_search(&b, "title"));
        assert!(!matches_search(&b, "gopher"));
    }

    #[test]
    fn update_blog_all_fields_optional() {
        let input: UpdateBlog = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.order.is_none());
    }

    #[test]
    fn create_blog_rejects_missing_author() {
        let result: Result<CreateBlog, _> =
            serde_json::from_str(r#"{"title":"t","content":"c"}"#);
        assert!(result.is_err());
    }
}
