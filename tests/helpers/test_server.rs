// Test Server Helpers
//
// Spawns a real HTTP server with actix-test on a random port.

use actix_web::App;

pub use actix_test::TestServer;

use super::test_app::TestContext;
use service_orders_api::middleware::{ErrorLogger, RequestId};

/// Spawn a real HTTP test server with the full application routing
///
/// The server shares the context's in-memory stores and stops when the
/// returned `TestServer` is dropped.
///
/// # Example
/// ```no_run
/// #[actix_web::test]
/// async fn test_health_endpoint() {
///     let ctx = TestContext::new();
///     let srv = spawn_test_server(&ctx);
///     let response = srv.get("/health").send().await.unwrap();
///     assert_eq!(response.status(), 200);
/// }
/// ```
pub fn spawn_test_server(ctx: &TestContext) -> TestServer {
    let routes = ctx.routes();

    actix_test::start(move || {
        App::new()
            .wrap(ErrorLogger)
            .wrap(RequestId)
            .configure(routes.clone())
    })
}
