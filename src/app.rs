//! Wires routes and middleware into the service handler.

use crate::config::Config;
use crate::handler::BoxedHandler;
use crate::middleware::{self, Middleware, chain, request_logger, require_token};
use crate::router::Router;
use crate::users::{USER_ROUTE, get_user};

/// Builds the handler the server runs for every request.
///
/// The chain is `[request_logger, require_token]` around the router, so every
/// request is logged first and then checked for the token, whatever its path.
pub fn app(config: &Config) -> BoxedHandler {
    let routes = Router::new().get(USER_ROUTE, get_user);

    chain(vec![
        middleware::boxed(request_logger),
        middleware::boxed(require_token(config.auth_token.clone())),
    ])
    .wrap(routes.into_handler())
}
