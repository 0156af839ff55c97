//! A multilingual site: every path starts with a language code.
//!
//! The root redirects to the default language, and a before-middleware sends
//! requests for unknown languages back there too.

use log::info;
use microrouter_rs::{
    handler, Context, HandlerRef, HttpServer, Param, Router, RoutingError, ServerConfig, StatusCode,
};

/// Any path whose first segment could be a language code.
const LANGUAGE_PREFIX: &str = "/([a-z0-9_-]+)(/.*)?";

fn redirect(ctx: &mut Context<'_>, location: &str) {
    ctx.set_status(StatusCode::Found);
    ctx.set_header("Location", location);
}

/// Wrap a localized page so it stays silent once the language check redirected.
fn localized<F>(page: F) -> HandlerRef
where
    F: Fn(&mut Context<'_>, &[Param]) -> Result<(), RoutingError> + Send + Sync + 'static,
{
    handler(move |ctx, params| {
        if ctx.response().status == StatusCode::Found {
            return Ok(());
        }
        page(ctx, params)
    })
}

fn multilang_router(allowed: &[&str], default: &str) -> Result<Router, RoutingError> {
    let allowed: Vec<String> = allowed.iter().map(|lang| lang.to_string()).collect();
    let default = if allowed.iter().any(|lang| lang == default) {
        default.to_string()
    } else {
        allowed.first().cloned().unwrap_or_else(|| "en".to_string())
    };
    let home = format!("/{default}");

    let mut router = Router::new();

    let root_target = home.clone();
    router.route("GET|POST|PUT|DELETE|HEAD", "/", handler(move |ctx, _| {
        redirect(ctx, &root_target);
        Ok(())
    }))?;

    let check_target = home;
    router.before("GET|POST|PUT|DELETE|HEAD", LANGUAGE_PREFIX, handler(move |ctx, params| {
        let language = params.first().and_then(|p| p.as_deref()).unwrap_or("");
        if !allowed.iter().any(|lang| lang == language) {
            info!("Unknown language `{language}`, redirecting to {check_target}");
            redirect(ctx, &check_target);
        }
        Ok(())
    }))?;

    router.get("/([a-z0-9_-]+)", localized(|ctx, params| {
        let language = params[0].as_deref().unwrap_or("");
        ctx.write(format!("This is the {language} index"));
        Ok(())
    }))?;

    router.get("/([a-z0-9_-]+)/([a-z0-9_-]+)", localized(|ctx, params| {
        let language = params[0].as_deref().unwrap_or("");
        let slug = params[1].as_deref().unwrap_or("");
        ctx.write(format!("This is the {language} version of {slug}"));
        Ok(())
    }))?;

    router.get("/([a-z0-9_-]+)/(.*)", localized(|ctx, params| {
        let language = params[0].as_deref().unwrap_or("");
        let slug = params[1].as_deref().unwrap_or("");
        ctx.write(format!("This is the {language} version of {slug} (multiple segments allowed)"));
        Ok(())
    }))?;

    Ok(router)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let router = multilang_router(&["en", "nl", "fr"], "nl")?;

    let config = ServerConfig {
        addr: "127.0.0.1:8082".parse()?,
        ..ServerConfig::default()
    };

    info!("Try http://127.0.0.1:8082/, /en/about and /de/about");

    let server = HttpServer::new(config, router);
    server.start().await?;

    Ok(())
}
