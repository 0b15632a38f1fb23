//! Blog lifecycle against the live mock server, with the host doing the IO.
//!
//! # Design
//! Starts the mock server on a random port, then drives every `build_*` /
//! `parse_*` pair over real HTTP using blocking ureq. This checks that the
//! sans-IO half of the client works with an HTTP stack other than the
//! bundled transport.

use blog_core::{
    BlogClient, BlogCreatePayload, BlogSearchParams, BlogUpdatePayload, HttpMethod, HttpRequest,
    HttpResponse, OrderUpdate,
};
use ureq::typestate::WithBody;

type UreqResult = Result<ureq::http::Response<ureq::Body>, ureq::Error>;

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(builder: ureq::RequestBuilder<WithBody>, body: Option<&str>) -> UreqResult {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let body = req.body.as_deref();
    let mut response = match req.method {
        HttpMethod::Get => with_headers(agent.get(&req.path), &req.headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(&req.path), &req.headers).call(),
        HttpMethod::Post => send(with_headers(agent.post(&req.path), &req.headers), body),
        HttpMethod::Put => send(with_headers(agent.put(&req.path), &req.headers), body),
    }
    .expect("HTTP transport error");

    let status = response.status();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        headers,
        body,
    }
}

#[test]
fn blog_lifecycle() {
    // Step 1: start mock server on a random port.
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    let client = BlogClient::new(&format!("http://{addr}"));

    // Step 2: list — should be empty with resolved pagination.
    let page = client
        .parse_list_blogs(execute(client.build_list_blogs(&BlogSearchParams::default())))
        .unwrap();
    assert!(page.items.is_empty(), "expected empty list");
    assert_eq!(page.current_page, 1);
    assert_eq!(page.last_page, 1);

    // Step 3: create two posts.
    let create = |title: &str, order: i64| BlogCreatePayload {
        title: title.to_string(),
        content: format!("{title} body"),
        author_id: 1,
        order: Some(order),
        ..Default::default()
    };
    let req = client.build_create_blog(&create("Integration test", 1)).unwrap();
    let first = client.parse_create_blog(execute(req)).unwrap();
    assert_eq!(first.title, "Integration test");
    assert_eq!(first.slug.as_deref(), Some("integration-test"));
    assert_eq!(first.is_active, Some(true));

    let req = client.build_create_blog(&create("Second post", 2)).unwrap();
    let second = client.parse_create_blog(execute(req)).unwrap();

    // Step 4: partial update.
    let update = BlogUpdatePayload {
        title: Some("Updated title".to_string()),
        ..Default::default()
    };
    let req = client.build_update_blog(first.id, &update).unwrap();
    let updated = client.parse_update_blog(execute(req)).unwrap();
    assert_eq!(updated.title, "Updated title");
    assert_eq!(updated.content, "Integration test body");

    // Step 5: toggle active state.
    let inactive = client
        .parse_set_inactive(execute(client.build_set_inactive(first.id)))
        .unwrap();
    assert_eq!(inactive.is_active, Some(false));
    let active = client
        .parse_set_active(execute(client.build_set_active(first.id)))
        .unwrap();
    assert_eq!(active.is_active, Some(true));

    // Step 6: reorder one, then both.
    let req = client.build_update_order(first.id, 5).unwrap();
    let reordered = client.parse_update_order(execute(req)).unwrap();
    assert_eq!(reordered.order, Some(5));

    let orders = [
        OrderUpdate { id: first.id, order: 2 },
        OrderUpdate { id: second.id, order: 1 },
    ];
    let req = client.build_bulk_update_order(&orders).unwrap();
    let bulk = client.parse_bulk_update_order(execute(req)).unwrap();
    assert_eq!(bulk.len(), 2);

    // Step 7: paginated listing.
    let params = BlogSearchParams {
        per_page: Some(1),
        ..Default::default()
    };
    let page = client
        .parse_list_blogs(execute(client.build_list_blogs(&params)))
        .unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, second.id);
    assert_eq!(page.total, 2);
    assert_eq!(page.last_page, 2);
    assert!(page.next_page_url.is_some());

    // Step 8: delete, then delete again.
    client
        .parse_delete_blog(execute(client.build_delete_blog(first.id)))
        .unwrap();
    let err = client
        .parse_delete_blog(execute(client.build_delete_blog(first.id)))
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Blog not found"));

    // Step 9: list — only the second post remains.
    let page = client
        .parse_list_blogs(execute(client.build_list_blogs(&BlogSearchParams::default())))
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, second.id);
}
