use express_router::{
    Chain, Method, Recorded, Recorder, Request, ResponseWriter, Router, StatusCode, WriteError,
};

use std::io;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};

type Log = Arc<Mutex<Vec<String>>>;
type Seen = (Option<String>, Option<String>, Option<String>);

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn record(log: &Log, tag: &'static str) -> impl Fn(Chain) + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |chain: Chain| {
        log.lock().unwrap().push(tag.to_owned());
        chain.next()
    }
}

fn run(router: Router, method: Method, path: &str) -> Recorded {
    let res = Recorder::new();
    router.build().dispatch(Request::new(method, path), res.clone());
    res.snapshot()
}

#[test]
fn registration_order_wins() {
    let log = new_log();
    let mut router = Router::new();
    router
        .get("/items/:id", record(&log, "A"))
        .get("/items/*", record(&log, "B"))
        .all("/items/:id", record(&log, "C"));

    let rec = run(router, Method::GET, "/items/3");
    assert_eq!(entries(&log), ["A", "B", "C"]);
    assert!(rec.ended);
    assert_eq!(rec.status, StatusCode::NOT_FOUND);
}

#[test]
fn handler_stops_the_chain() {
    let log = new_log();
    let mut router = Router::new();
    router
        .use_any(record(&log, "mw"))
        .get("/hello/:name", |chain: Chain| {
            let body = format!("hello, {}!", chain.param("name").unwrap());
            chain.send(StatusCode::OK, body)
        })
        .get_any(record(&log, "unreachable"));

    let rec = run(router, Method::GET, "/hello/world");
    assert_eq!(entries(&log), ["mw"]);
    assert_eq!(rec.status, StatusCode::OK);
    assert_eq!(rec.body_str(), "hello, world!");
    assert_eq!(rec.headers[CONTENT_LENGTH], "13");
    assert!(rec.ended);
}

#[test]
fn params_belong_to_one_entry() {
    let seen: Arc<Mutex<Vec<Seen>>> = Arc::new(Mutex::new(Vec::new()));

    let observe = |seen: &Arc<Mutex<Vec<Seen>>>| {
        let seen = Arc::clone(seen);
        move |chain: Chain| {
            seen.lock().unwrap().push((
                chain.param("user").map(str::to_owned),
                chain.param("post").map(str::to_owned),
                chain.request().route_matched().map(str::to_owned),
            ));
            chain.next()
        }
    };

    let mut router = Router::new();
    router
        .use_at("/u/:user", observe(&seen))
        .get("/u/:user/p/:post", observe(&seen))
        .use_any(observe(&seen));

    run(router, Method::GET, "/u/ann/p/9");

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        [
            (Some("ann".to_owned()), None, Some("/u/:user".to_owned())),
            (
                Some("ann".to_owned()),
                Some("9".to_owned()),
                Some("/u/:user/p/:post".to_owned())
            ),
            (None, None, None),
        ]
    );
}

#[test]
fn error_short_circuits_to_500() {
    let log = new_log();
    let mut router = Router::new();
    router
        .use_any(|mut chain: Chain| {
            chain.response_mut().append_body(b"partial");
            chain.fail(io::Error::new(io::ErrorKind::Other, "database is down"))
        })
        .use_any(record(&log, "after"));

    let rec = run(router, Method::GET, "/anything");
    assert!(entries(&log).is_empty());
    assert_eq!(rec.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rec.body_str(), "database is down");
    assert_eq!(
        rec.headers[CONTENT_TYPE],
        HeaderValue::from_static("text/plain; charset=utf-8")
    );
    assert!(rec.ended);
}

#[test]
fn set_error_then_next() {
    let log = new_log();
    let mut router = Router::new();
    router
        .use_any(|mut chain: Chain| {
            chain.set_error("bad token");
            assert!(chain.error().is_some());
            chain.next()
        })
        .use_any(record(&log, "after"));

    let rec = run(router, Method::POST, "/login");
    assert!(entries(&log).is_empty());
    assert_eq!(rec.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rec.body_str(), "bad token");
}

#[test]
fn error_after_end_is_not_written() {
    let mut router = Router::new();
    router.use_any(|mut chain: Chain| {
        let res = chain.response_mut();
        res.set_status(StatusCode::ACCEPTED);
        res.append_body(b"done");
        res.end().unwrap();
        chain.fail("late failure")
    });

    let rec = run(router, Method::GET, "/");
    assert_eq!(rec.status, StatusCode::ACCEPTED);
    assert_eq!(rec.body_str(), "done");
}

#[test]
fn method_mismatch_falls_through() {
    let log = new_log();
    let mut router = Router::new();
    router
        .get("/thing", record(&log, "get"))
        .post("/thing", record(&log, "post"));

    let rec = run(router, Method::POST, "/thing");
    assert_eq!(entries(&log), ["post"]);
    assert_eq!(rec.status, StatusCode::NOT_FOUND);
    assert!(rec.ended);

    let log = new_log();
    let mut router = Router::new();
    router.get("/thing", record(&log, "get"));
    let rec = run(router, Method::PUT, "/thing");
    assert!(entries(&log).is_empty());
    assert_eq!(rec.status, StatusCode::NOT_FOUND);
    assert!(rec.ended);
}

#[test]
fn fallback_serves_unmatched_requests() {
    let fallback = |req: &Request, res: &mut dyn ResponseWriter| {
        res.append_body(format!("no route for {}", req.path()).as_bytes());
    };

    let mut router = Router::new();
    router.get("/known", |chain: Chain| chain.send(StatusCode::OK, "k"));
    router.fallback(fallback);
    let rec = run(router, Method::GET, "/unknown");
    assert_eq!(rec.status, StatusCode::NOT_FOUND);
    assert_eq!(rec.body_str(), "no route for /unknown");

    // a matched entry keeps the fallback away even if it left the status alone
    let mut router = Router::new();
    router.use_any(|chain: Chain| chain.next());
    router.fallback(fallback);
    let rec = run(router, Method::GET, "/unknown");
    assert_eq!(rec.body_str(), "");
    assert!(rec.ended);
}

#[test]
fn dropping_the_chain_ends_the_response() {
    let mut router = Router::new();
    router
        .use_any(|mut chain: Chain| {
            chain.response_mut().set_status(StatusCode::NO_CONTENT);
            drop(chain);
        })
        .use_any(|_chain: Chain| panic!("must not be reached"));

    let rec = run(router, Method::GET, "/");
    assert_eq!(rec.status, StatusCode::NO_CONTENT);
    assert!(rec.ended);
    assert_eq!(rec.headers[CONTENT_LENGTH], "0");
}

#[test]
fn chain_resumes_from_another_thread() {
    let log = new_log();
    let (done_tx, done_rx) = mpsc::channel::<()>();
    let done_tx = Mutex::new(done_tx);

    let mut router = Router::new();
    router
        .use_any({
            let log = Arc::clone(&log);
            move |chain: Chain| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(10));
                    log.lock().unwrap().push("auth".to_owned());
                    chain.next()
                });
            }
        })
        .get("/secret", move |chain: Chain| {
            chain.send(StatusCode::OK, "s3cr3t");
            let _ = done_tx.lock().unwrap().send(());
        });

    let res = Recorder::new();
    router
        .build()
        .dispatch(Request::new(Method::GET, "/secret"), res.clone());

    done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let rec = res.snapshot();
    assert_eq!(entries(&log), ["auth"]);
    assert_eq!(rec.status, StatusCode::OK);
    assert_eq!(rec.body_str(), "s3cr3t");
    assert!(rec.ended);
}

#[test]
fn dispatcher_is_shared_between_threads() {
    let mut router = Router::new();
    router.get("/n/:n", |chain: Chain| {
        let n: u32 = chain.params().parse("n").unwrap().unwrap();
        chain.send(StatusCode::OK, (n * 2).to_string())
    });
    let dispatcher = router.build();

    let handles: Vec<_> = (0..8u32)
        .map(|i| {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                let res = Recorder::new();
                dispatcher.dispatch(Request::new(Method::GET, format!("/n/{}", i)), res.clone());
                res.snapshot().body_str().to_owned()
            })
        })
        .collect();

    for (i, h) in handles.into_iter().enumerate() {
        assert_eq!(h.join().unwrap(), (i * 2).to_string());
    }
}

#[test]
fn panicking_action_yields_500() {
    let mut router = Router::new();
    router.get("/boom", |_chain: Chain| panic!("boom"));
    let dispatcher = router.build();

    let res = Recorder::new();
    let res2 = res.clone();
    let result = thread::spawn(move || {
        dispatcher.dispatch(Request::new(Method::GET, "/boom"), res2);
    })
    .join();

    assert!(result.is_err());
    let rec = res.snapshot();
    assert_eq!(rec.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rec.body_str(), "request handler panicked");
    assert!(rec.ended);
}

#[test]
fn position_tracks_the_current_entry() {
    let positions: Arc<Mutex<Vec<Option<usize>>>> = Arc::new(Mutex::new(Vec::new()));
    let track = |positions: &Arc<Mutex<Vec<Option<usize>>>>| {
        let positions = Arc::clone(positions);
        move |chain: Chain| {
            positions.lock().unwrap().push(chain.position());
            chain.next()
        }
    };

    let mut router = Router::new();
    router
        .use_any(track(&positions))
        .get("/nope", track(&positions))
        .use_any(track(&positions));
    run(router, Method::GET, "/x");

    assert_eq!(*positions.lock().unwrap(), [Some(0), Some(2)]);
}

/// Records everything but fails to end, like a peer that hung up.
struct ClosedWriter(Recorder);

impl ResponseWriter for ClosedWriter {
    fn status(&self) -> StatusCode {
        self.0.status()
    }
    fn set_status(&mut self, status: StatusCode) {
        self.0.set_status(status)
    }
    fn set_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.0.set_header(name, value)
    }
    fn append_body(&mut self, bytes: &[u8]) {
        self.0.append_body(bytes)
    }
    fn clear_body(&mut self) {
        self.0.clear_body()
    }
    fn is_ended(&self) -> bool {
        false
    }
    fn end(&mut self) -> Result<(), WriteError> {
        Err(WriteError::Closed)
    }
}

#[test]
fn write_errors_are_swallowed() {
    let mut router = Router::new();
    router
        .get("/ok", |chain: Chain| chain.send(StatusCode::OK, "fine"))
        .use_any(|chain: Chain| chain.fail("x"));
    let dispatcher = router.build();

    let res = Recorder::new();
    dispatcher.dispatch(Request::new(Method::GET, "/ok"), ClosedWriter(res.clone()));
    let rec = res.snapshot();
    assert_eq!(rec.status, StatusCode::OK);
    assert_eq!(rec.body_str(), "fine");
    assert!(!rec.ended);

    let res = Recorder::new();
    dispatcher.dispatch(Request::new(Method::GET, "/other"), ClosedWriter(res.clone()));
    let rec = res.snapshot();
    assert_eq!(rec.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(rec.body_str(), "x");
    assert!(!rec.ended);
}
