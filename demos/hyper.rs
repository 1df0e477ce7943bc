use express_router::hyper_service::take_body;
use express_router::{router, Chain, Request, ResponseWriter, StatusCode};

use std::convert::Infallible as Never;

use http::header::{HeaderValue, SERVER};
use hyper::service::make_service_fn;

fn powered_by(mut chain: Chain) {
    chain
        .response_mut()
        .set_header(SERVER, HeaderValue::from_static("express-router"));
    chain.next()
}

fn hello(chain: Chain) {
    let body = format!("hello, {}!", chain.param("name").unwrap_or("stranger"));
    chain.send(StatusCode::OK, body)
}

fn file(chain: Chain) {
    let body = format!("access file: {}", chain.param("path").unwrap_or(""));
    chain.send(StatusCode::OK, body)
}

fn echo(mut chain: Chain) {
    let body = take_body(chain.request()).unwrap_or_default();
    tokio::spawn(async move {
        match hyper::body::to_bytes(body).await {
            Ok(bytes) => {
                chain.response_mut().append_body(&bytes);
                chain.response_mut().set_status(StatusCode::OK);
            }
            Err(e) => chain.set_error(e),
        }
        chain.next()
    });
}

fn not_found(req: &Request, res: &mut dyn ResponseWriter) {
    res.append_body(format!("404 Not Found: {}", req.path()).as_bytes());
}

#[tokio::main(basic_scheduler)]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut router = router! {
        USE "/" => powered_by,
        GET "/hello/:name" => hello,
        POST "/echo" => echo,
        @ "/api/v1" => router! {
            GET "/file/:path(.+)" => file
        }
    };
    router.fallback(not_found);

    let service = router.into_service();

    let make = make_service_fn(move |_| {
        let service = service.clone();
        async move { Ok::<_, Never>(service) }
    });

    let addr = ([127, 0, 0, 1], 3000).into();

    let server = hyper::Server::bind(&addr).serve(make);

    println!("Server is listening on: http://{}", addr);
    println!("hello: http://{}/hello/world", addr);
    println!("api: http://{}/api/v1/file/public", addr);
    println!("404: http://{}/other/path", addr);
    println!();

    if let Err(e) = server.await {
        eprintln!("server error: {}", e);
    }
}
