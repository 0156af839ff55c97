//! End-to-end routing through the public API: raw request bytes in, response out.

use microrouter_rs::{
    handler, parse_request, Context, HandlerRef, HandlerRegistry, HttpResponse, HttpServer, HttpVersion, Method,
    Param, Router, RoutingError, ServerConfig, StatusCode,
};
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt};

fn dispatch(router: &Router, raw: &[u8]) -> (bool, HttpResponse) {
    let request = parse_request(raw).unwrap();
    let mut response = HttpResponse::default();
    let handled = router.run(&request, &mut response).unwrap();
    (handled, response)
}

fn redirect(ctx: &mut Context<'_>, location: &str) {
    ctx.set_status(StatusCode::Found);
    ctx.set_header("Location", location);
}

fn page(ctx: &mut Context<'_>, params: &[Param]) -> Result<(), RoutingError> {
    if ctx.response().status == StatusCode::Found {
        return Ok(());
    }
    let language = params[0].as_deref().unwrap_or("");
    match params.get(1).and_then(|slug| slug.as_deref()) {
        Some(slug) => ctx.write(format!("This is the {language} version of {slug}")),
        None => ctx.write(format!("This is the {language} index")),
    }
    Ok(())
}

fn language_router() -> Router {
    let allowed = ["en", "nl", "fr"];
    let mut router = Router::new();

    router
        .route("GET|POST", "/", handler(|ctx, _| {
            redirect(ctx, "/nl");
            Ok(())
        }))
        .unwrap();
    router
        .before("GET|POST", "/([a-z0-9_-]+)(/.*)?", handler(move |ctx, params| {
            let language = params[0].as_deref().unwrap_or("");
            if !allowed.contains(&language) {
                redirect(ctx, "/nl");
            }
            Ok(())
        }))
        .unwrap();

    router.get("/([a-z0-9_-]+)", handler(page)).unwrap();
    router.get("/([a-z0-9_-]+)/(.*)", handler(page)).unwrap();
    router
}

#[test]
fn test_language_prefix_routing() {
    let router = language_router();

    let (handled, response) = dispatch(&router, b"GET /en HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert!(handled);
    assert_eq!(response.body_text(), "This is the en index");

    let (_, response) = dispatch(&router, b"GET /fr/about/team HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert_eq!(response.body_text(), "This is the fr version of about/team");
}

#[test]
fn test_unknown_language_redirects() {
    let router = language_router();

    let (handled, response) = dispatch(&router, b"GET /de/about HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert!(handled);
    assert_eq!(response.status, StatusCode::Found);
    assert_eq!(response.header("Location"), Some("/nl"));
    assert!(response.body.is_empty());

    let (_, response) = dispatch(&router, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert_eq!(response.status, StatusCode::Found);
    assert_eq!(response.header("Location"), Some("/nl"));
}

#[test]
fn test_parsed_override_header_reaches_router() {
    let mut router = Router::new();
    router
        .delete("/posts/(\\d+)", handler(|ctx, params| {
            ctx.set_status(StatusCode::NoContent);
            ctx.set_header("X-Deleted", params[0].clone().unwrap_or_default());
            Ok(())
        }))
        .unwrap();

    let raw = b"POST /posts/12 HTTP/1.1\r\nHost: localhost\r\nx-http-method-override: DELETE\r\n\r\n";
    let (handled, response) = dispatch(&router, raw);

    assert!(handled);
    assert_eq!(response.status, StatusCode::NoContent);
    assert_eq!(response.header("X-Deleted"), Some("12"));
}

#[test]
fn test_json_body_round_trip_through_handler() {
    #[derive(serde::Deserialize, serde::Serialize)]
    struct Movie {
        title: String,
        year: u16,
    }

    let mut router = Router::new();
    router
        .post("/movies", handler(|ctx, _| {
            let mut movie: Movie = ctx.request().json().map_err(RoutingError::handler)?;
            movie.title = movie.title.to_uppercase();
            ctx.set_status(StatusCode::Created);
            ctx.json(&movie)
        }))
        .unwrap();

    let raw = b"POST /movies HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\n\r\n{\"title\":\"Alien\",\"year\":1979}";
    let (_, response) = dispatch(&router, raw);

    assert_eq!(response.status, StatusCode::Created);
    assert_eq!(response.body_text(), r#"{"title":"ALIEN","year":1979}"#);
}

#[test]
fn test_router_reused_after_clear() {
    let mut router = language_router();
    router.clear();
    router
        .get("/en", handler(|ctx, _| {
            ctx.write("fresh");
            Ok(())
        }))
        .unwrap();

    let (_, response) = dispatch(&router, b"GET /en HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert_eq!(response.body_text(), "fresh");

    let (handled, response) = dispatch(&router, b"GET /de HTTP/1.1\r\nHost: localhost\r\n\r\n");
    assert!(!handled);
    assert_eq!(response.status, StatusCode::NotFound);
    assert_eq!(response.header("Location"), None);
}

#[tokio::test]
async fn test_connection_over_duplex_stream() {
    #[derive(Default)]
    struct Movies;

    let mut registry = HandlerRegistry::new();
    registry.register_instance::<Movies, _>("site::Movies", "show", |_, ctx, params| {
        ctx.write(format!("movie {}", params[0].as_deref().unwrap_or("?")));
        Ok(())
    });

    let mut router = Router::with_registry(registry);
    router.set_namespace("site");
    router
        .mount("/movies", |movies| movies.get("/(\\d+)", HandlerRef::named("Movies@show")?))
        .unwrap();

    let config = ServerConfig::default();
    let (mut client, mut server) = duplex(4096);

    client
        .write_all(b"GET /movies/42 HTTP/1.0\r\n\r\n")
        .await
        .unwrap();
    HttpServer::handle_connection(&mut server, &router, &config).await.unwrap();
    drop(server);

    let mut raw = Vec::new();
    client.read_to_end(&mut raw).await.unwrap();
    let response = String::from_utf8(raw).unwrap();

    assert!(response.starts_with(&format!("{} 200 OK\r\n", HttpVersion::Http10)));
    assert!(response.ends_with("\r\n\r\nmovie 42"));
}

#[test]
fn test_methods_listed_in_route_summary() {
    let router = language_router();
    let methods: Vec<Option<Method>> = router.routes().iter().map(|route| route.method).collect();

    assert_eq!(
        methods,
        vec![
            Some(Method::GET),
            Some(Method::POST),
            Some(Method::GET),
            Some(Method::GET),
            Some(Method::GET),
            Some(Method::POST),
        ]
    );
}
