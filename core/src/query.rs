//! Query string for the blog listing endpoint.

use url::form_urlencoded;

use crate::types::BlogSearchParams;

/// Form-encode the parameters the caller set, in a fixed order.
///
/// An empty `search` and a zero `per_page`/`page` count as unset.
pub fn list_query(params: &BlogSearchParams) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());

    if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
        query.append_pair("search", search);
    }
    if let Some(active) = params.is_active {
        query.append_pair("is_active", if active { "1" } else { "0" });
    }
    if let Some(sort_by) = params.sort_by {
        query.append_pair("sort_by", sort_by.as_str());
    }
    if let Some(sort_order) = params.sort_order {
        query.append_pair("sort_order", sort_order.as_str());
    }
    if let Some(order_by) = params.order_by {
        query.append_pair("order_by", order_by.as_str());
    }
    if let Some(direction) = params.order_direction {
        query.append_pair("order_direction", direction.as_str());
    }
    if let Some(per_page) = params.per_page.filter(|n| *n > 0) {
        query.append_pair("per_page", &per_page.to_string());
    }
    if let Some(page) = params.page.filter(|n| *n > 0) {
        query.append_pair("page", &page.to_string());
    }

    query.finish()
}

/// `path` with `?query` appended when the query is non-empty.
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}
