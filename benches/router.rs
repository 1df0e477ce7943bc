use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use express_router::{
    Chain, MatchMode, Method, PatternCompiler, Recorder, Request, Router, StatusCode,
};

fn pattern_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern-compile");
    let compiler = PatternCompiler::new();

    group.bench_function("single-param", |b| {
        b.iter(|| compiler.compile("/hello/:name", MatchMode::Exact))
    });

    group.bench_function("mixed", |b| {
        b.iter(|| compiler.compile("/u/:uid/(posts|drafts)/:pid(\\d+)?/*", MatchMode::Exact))
    });
}

fn router_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("router-dispatch");

    let mut router = Router::new();
    router
        .use_any(|chain: Chain| chain.next())
        .get("/", |chain: Chain| chain.send(StatusCode::OK, "index"))
        .get("/users", |chain: Chain| chain.send(StatusCode::OK, "users"))
        .post("/users/:id", |chain: Chain| chain.send(StatusCode::OK, "update"))
        .get("/hello/:name", |chain: Chain| chain.send(StatusCode::OK, "hello"));
    let dispatcher = router.build();

    group.bench_function("fourth-entry", |b| {
        b.iter_batched(
            || (Request::new(Method::GET, "/hello/world"), Recorder::new()),
            |(req, res)| dispatcher.dispatch(req, res),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("not-found", |b| {
        b.iter_batched(
            || (Request::new(Method::GET, "/missing/path"), Recorder::new()),
            |(req, res)| dispatcher.dispatch(req, res),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, pattern_compile, router_dispatch);
criterion_main!(benches);
