//! Tests for the HTTP server implementation.

#[cfg(test)]
mod server_tests {
    use std::io::{self, Cursor};
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

    use crate::parser::HttpVersion;
    use crate::router::{handler, Error as RoutingError, HandlerRef, HandlerRegistry, Router};
    use crate::server::{Error, HttpResponse, HttpServer, ServerConfig, StatusCode};

    // Mock TcpStream for testing
    struct MockTcpStream {
        read_data: Cursor<Vec<u8>>,
        write_data: Vec<u8>,
    }

    impl MockTcpStream {
        fn new(read_data: Vec<u8>) -> Self {
            Self {
                read_data: Cursor::new(read_data),
                write_data: Vec::new(),
            }
        }

        fn written_data(&self) -> &[u8] {
            &self.write_data
        }
    }

    impl AsyncRead for MockTcpStream {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            let n = std::io::Read::read(&mut this.read_data, buf.initialize_unfilled())?;
            buf.advance(n);
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for MockTcpStream {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let this = self.get_mut();
            this.write_data.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn test_router() -> Router {
        let mut router = Router::new();
        router
            .get("/test", handler(|ctx, _| {
                ctx.set_header("Content-Type", "text/plain");
                ctx.write("Test response");
                Ok(())
            }))
            .unwrap();
        router
            .put("/items/(\\d+)", handler(|ctx, params| {
                ctx.set_status(StatusCode::Accepted);
                ctx.write(format!("updated {}", params[0].as_deref().unwrap_or("")));
                Ok(())
            }))
            .unwrap();
        router
            .get("/broken", handler(|_, _| Err(RoutingError::handler("database unavailable"))))
            .unwrap();
        router
            .get("/unresolved", HandlerRef::named("Missing@show").unwrap())
            .unwrap();
        router
    }

    async fn serve(request: &[u8], router: &Router) -> (Result<(), Error>, String) {
        let mut stream = MockTcpStream::new(request.to_vec());
        let result = HttpServer::handle_connection(&mut stream, router, &ServerConfig::default()).await;
        let response = String::from_utf8_lossy(stream.written_data()).into_owned();
        (result, response)
    }

    #[tokio::test]
    async fn test_server_creation() {
        let config = ServerConfig {
            addr: "127.0.0.1:9090".parse().unwrap(),
            max_connections: 100,
            read_buffer_size: 4096,
            server_name: "test".to_string(),
        };

        let server = HttpServer::new(config.clone(), test_router());
        assert_eq!(server.config, config);
        assert_eq!(server.router.len(), 4);
    }

    #[tokio::test]
    async fn test_handle_connection_with_valid_request() {
        let router = test_router();
        let (result, response) = serve(b"GET /test HTTP/1.1\r\nHost: localhost\r\n\r\n", &router).await;

        assert!(result.is_ok());
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Type: text/plain\r\n"));
        assert!(response.contains("Server: microrouter-rs\r\n"));
        assert!(response.contains("Content-Length: 13\r\n"));
        assert!(response.ends_with("\r\n\r\nTest response"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_head_request() {
        let router = test_router();
        let (result, response) = serve(b"HEAD /test HTTP/1.1\r\nHost: localhost\r\n\r\n", &router).await;

        assert!(result.is_ok());
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Length: 0\r\n"));
        assert!(!response.contains("Test response"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_method_override() {
        let router = test_router();
        let request = b"POST /items/42 HTTP/1.1\r\nHost: localhost\r\nX-HTTP-Method-Override: PUT\r\n\r\n";
        let (result, response) = serve(request, &router).await;

        assert!(result.is_ok());
        assert!(response.starts_with("HTTP/1.1 202 Accepted\r\n"));
        assert!(response.ends_with("updated 42"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_not_found() {
        let router = test_router();
        let (result, response) = serve(b"GET /nonexistent HTTP/1.1\r\nHost: localhost\r\n\r\n", &router).await;

        assert!(result.is_ok());
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(response.contains("Content-Length: 0\r\n"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_not_found_handler() {
        let mut router = test_router();
        router
            .set_not_found(handler(|ctx, _| {
                ctx.set_status(StatusCode::NotFound);
                ctx.write(format!("Not found: {}", ctx.path()));
                Ok(())
            }))
            .unwrap();

        let (result, response) = serve(b"GET /nonexistent HTTP/1.1\r\nHost: localhost\r\n\r\n", &router).await;

        assert!(result.is_ok());
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(response.ends_with("Not found: /nonexistent"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_invalid_request() {
        let router = test_router();
        let (result, response) = serve(b"INVALID REQUEST", &router).await;

        assert!(matches!(result, Err(Error::ParseError(_))));
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(response.contains("Error parsing request:"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_unresolved_handler() {
        let router = test_router();
        let (result, response) = serve(b"GET /unresolved HTTP/1.1\r\nHost: localhost\r\n\r\n", &router).await;

        assert!(matches!(
            result,
            Err(Error::RoutingError(RoutingError::HandlerResolution { .. }))
        ));
        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(response.contains("Missing@show"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_failing_handler() {
        let router = test_router();
        let (result, response) = serve(b"GET /broken HTTP/1.1\r\nHost: localhost\r\n\r\n", &router).await;

        assert!(matches!(result, Err(Error::RoutingError(RoutingError::Handler(_)))));
        assert!(response.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
        assert!(response.contains("database unavailable"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_named_handler() {
        #[derive(Default)]
        struct Greeter {
            greeting: &'static str,
        }

        let mut registry = HandlerRegistry::new();
        registry.register_instance::<Greeter, _>("app::Greeter", "hello", |greeter, ctx, params| {
            greeter.greeting = "Hello";
            ctx.write(format!("{} {}", greeter.greeting, params[0].as_deref().unwrap_or("nobody")));
            Ok(())
        });

        let mut router = Router::with_registry(registry);
        router.set_namespace("app");
        router.get("/hello/(\\w+)", HandlerRef::named("Greeter@hello").unwrap()).unwrap();

        let (result, response) = serve(b"GET /hello/bramus HTTP/1.1\r\nHost: localhost\r\n\r\n", &router).await;

        assert!(result.is_ok());
        assert!(response.ends_with("Hello bramus"));
    }

    #[tokio::test]
    async fn test_handle_connection_keeps_http10_version() {
        let router = test_router();
        let (result, response) = serve(b"GET /test HTTP/1.0\r\n\r\n", &router).await;

        assert!(result.is_ok());
        assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
    }

    #[tokio::test]
    async fn test_handle_connection_with_closed_stream() {
        let router = test_router();
        let (result, response) = serve(b"", &router).await;

        assert!(result.is_ok());
        assert!(response.is_empty());
    }

    #[test]
    fn test_response_serialization_computes_content_length() {
        let response = HttpResponse::new(StatusCode::Created)
            .with_header("Content-Length", "999")
            .with_body_string("abc");
        let bytes = String::from_utf8(response.to_bytes(HttpVersion::Http11)).unwrap();

        assert!(bytes.starts_with("HTTP/1.1 201 Created\r\n"));
        assert!(bytes.contains("Content-Length: 3\r\n"));
        assert!(!bytes.contains("999"));
    }

    #[test]
    fn test_response_json_body() {
        let response = HttpResponse::new(StatusCode::Ok)
            .with_json(&serde_json::json!({ "name": "bramus" }))
            .unwrap();

        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.body_text(), r#"{"name":"bramus"}"#);
    }

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode::NotFound.to_string(), "404 Not Found");
        assert_eq!(StatusCode::Found.as_u16(), 302);
    }

    #[test]
    fn test_config_from_json_fills_defaults() {
        let config = ServerConfig::from_json(r#"{ "addr": "0.0.0.0:3000", "server_name": "demo" }"#).unwrap();

        assert_eq!(config.addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.server_name, "demo");
        assert_eq!(config.max_connections, ServerConfig::default().max_connections);
        assert_eq!(config.read_buffer_size, 8192);
    }

    #[test]
    fn test_config_rejects_zero_read_buffer() {
        let result = ServerConfig::from_json(r#"{ "read_buffer_size": 0 }"#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_config_rejects_connection_limit_out_of_range() {
        let config = ServerConfig { max_connections: usize::MAX, ..ServerConfig::default() };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let result = ServerConfig::from_json(r#"{ "max_connections": 0 }"#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let config = ServerConfig { max_connections: tokio::sync::Semaphore::MAX_PERMITS, ..ServerConfig::default() };
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let config = ServerConfig { read_buffer_size: 0, ..ServerConfig::default() };
        let server = HttpServer::new(config, test_router());

        assert!(matches!(server.start().await, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_config_from_invalid_json() {
        let result = ServerConfig::from_json(r#"{ "addr": "not an address" }"#);
        assert!(matches!(result, Err(Error::JsonError(_))));
    }
}
