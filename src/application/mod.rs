//! Application layer - routes, dispatch and the handlers served by default.
//!
//! - `route` - immutable route descriptors and the route table
//! - `dispatcher` - auth + negotiation facade driven by the transport adapters
//! - `invoker` - one handler contract for unary and connection-bound calls
//! - `lifecycle` - connect/disconnect hook runner owning the per-connection context
//! - `handlers` - demo handlers and keepalive hooks
//! - `routes` - the default route table

pub mod dispatcher;
pub mod handlers;
pub mod invoker;
pub mod lifecycle;
pub mod route;
pub mod routes;

pub use dispatcher::Dispatcher;
pub use invoker::{BoundInvoker, HandlerInvoker};
pub use lifecycle::ConnectionLifecycle;
pub use route::{Route, RouteBuilder, RouteTable};
pub use routes::{default_routes, QUUX_SUBPROTOCOL};
