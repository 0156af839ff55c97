//! An HTTP server showing routes, parameters, middleware and not-found handling.

use log::info;
use microrouter_rs::{
    handler, HandlerRef, HandlerRegistry, HttpServer, RoutingError, Router, ServerConfig, StatusCode,
};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct User {
    name: String,
    email: String,
}

#[derive(Default)]
struct MoviesController;

impl MoviesController {
    fn show(&mut self, ctx: &mut microrouter_rs::Context<'_>, id: &str) -> Result<(), RoutingError> {
        ctx.write(format!("Movie #{id}"));
        Ok(())
    }
}

fn build_router() -> Result<Router, RoutingError> {
    let mut registry = HandlerRegistry::new();
    registry.register_instance::<MoviesController, _>("demo::MoviesController", "show", |controller, ctx, params| {
        controller.show(ctx, params[0].as_deref().unwrap_or(""))
    });

    let mut router = Router::with_registry(registry);
    router.set_namespace("demo");

    router.before("GET|POST", "/.*", handler(|ctx, _| {
        info!("{} {}", ctx.request_method(), ctx.path());
        Ok(())
    }))?;

    router.get("/", handler(|ctx, _| {
        ctx.set_header("Content-Type", "text/plain");
        ctx.write("Hello, World!");
        Ok(())
    }))?;

    router.get("/hello(/\\w+)?", handler(|ctx, params| {
        let name = params[0].as_deref().unwrap_or("World");
        ctx.set_header("Content-Type", "text/plain");
        ctx.write(format!("Hello, {name}!"));
        Ok(())
    }))?;

    router.post("/users", handler(|ctx, _| {
        let request = ctx.request();
        let user: User = request.json().map_err(RoutingError::handler)?;
        ctx.set_status(StatusCode::Created);
        ctx.json(&user)
    }))?;

    router.mount("/movies", |movies| {
        movies.get("/", handler(|ctx, _| {
            ctx.write("All movies");
            Ok(())
        }))?;
        movies.get("/(\\d+)", HandlerRef::named("MoviesController@show")?)
    })?;

    router.set_not_found_for("/api(/.*)?", handler(|ctx, _| {
        ctx.set_status(StatusCode::NotFound);
        ctx.json(&serde_json::json!({ "error": "unknown endpoint" }))
    }))?;

    router.set_not_found(handler(|ctx, _| {
        ctx.set_status(StatusCode::NotFound);
        let path = ctx.path();
        ctx.write(format!("Not found: {path}"));
        Ok(())
    }))?;

    Ok(router)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => ServerConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => ServerConfig::default(),
    };

    let server = HttpServer::new(config, build_router()?);
    server.start().await?;

    Ok(())
}
