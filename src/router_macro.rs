/// Builds a [`Router`](crate::Router) from a registration table.
///
/// ```
/// use express_router::{router, Chain, Method, MethodFilter, StatusCode};
///
/// let router = router! {
///     USE "/api" => |chain: Chain| chain.next(),
///     GET "/api/users/:id" => |chain: Chain| chain.send(StatusCode::OK, "user"),
///     ALL "/health" => |chain: Chain| chain.send(StatusCode::OK, "ok"),
///     @ "/v1" => router! {
///         POST "/items" => |chain: Chain| chain.send(StatusCode::CREATED, "")
///     }
/// };
///
/// assert_eq!(router.len(), 4);
/// assert_eq!(router.entries()[3].method(), &MethodFilter::Only(Method::POST));
/// ```
#[macro_export]
macro_rules! router {
    {@entry $router:expr, @, $prefix:expr, $sub_router:expr} => {
        $router.mount($prefix, $sub_router)
    };
    {@entry $router:expr, USE, $prefix:expr, $middleware:expr} => {
        $router.use_at($prefix, $middleware)
    };
    {@entry $router:expr, ALL, $pattern:expr, $action:expr} => {
        $router.all($pattern, $action)
    };
    {@entry $router:expr, $method:ident, $pattern:expr, $action:expr} => {
        $router.route($crate::Method::$method, $pattern, $action)
    };

    {$($method:tt $pattern:expr => $action:expr),+ $(,)?} => {{
        let mut __router = $crate::Router::new();
        $($crate::router!(@entry __router, $method, $pattern, $action);)+
        __router
    }};
}
