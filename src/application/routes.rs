//! The default route table served by the binary.

use crate::config::WebSocketConfig;
use crate::domain::foundation::ValidationError;
use crate::domain::framing::FramingConfig;
use crate::domain::protocol::RouteMode;

use super::handlers::{CommandHandler, EchoHandler, GreetingHandler, KeepaliveHooks};
use super::route::{Route, RouteTable};

/// Subprotocol required on `/quux`.
pub const QUUX_SUBPROTOCOL: &str = "quux/1.0";

/// Builds the five demo routes.
///
/// | path      | mode             | notes                                   |
/// |-----------|------------------|-----------------------------------------|
/// | `/foo`    | unary            | echo                                    |
/// | `/bar`    | optional upgrade | echo with transport mode                |
/// | `/baz`    | upgrade only     | autoping, greets then closes            |
/// | `/quux`   | upgrade only     | Basic auth, subprotocol, keepalive, cmd |
/// | `/framed` | upgrade only     | autoping, REQUEST/RESPONSE envelopes    |
pub fn default_routes(websocket: &WebSocketConfig) -> Result<RouteTable, ValidationError> {
    let mut table = RouteTable::new();

    table.register(Route::builder("/foo").handler(EchoHandler::new("foo")).build()?)?;

    table.register(
        Route::builder("/bar")
            .mode(RouteMode::OptionalUpgrade)
            .handler(EchoHandler::new("bar").with_mode())
            .build()?,
    )?;

    table.register(
        Route::builder("/baz")
            .mode(RouteMode::UpgradeOnly)
            .autoping(websocket.autoping())
            .initially()
            .handler(GreetingHandler::new("baz"))
            .build()?,
    )?;

    table.register(
        Route::builder("/quux")
            .mode(RouteMode::UpgradeOnly)
            .auth_required()
            .initially()
            .subprotocol(QUUX_SUBPROTOCOL)
            .hooks(KeepaliveHooks::new(websocket.keepalive()))
            .handler(CommandHandler::new())
            .build()?,
    )?;

    table.register(
        Route::builder("/framed")
            .mode(RouteMode::UpgradeOnly)
            .autoping(websocket.autoping())
            .framing(FramingConfig::json("REQUEST", "RESPONSE"))
            .handler(EchoHandler::new("framed"))
            .build()?,
    )?;

    Ok(table)
}
