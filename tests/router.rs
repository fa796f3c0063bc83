use ligero::{HandlerResult, Request, Response, RouteRequest, Router};

use std::sync::{Arc, Mutex};

use hyper::body::Bytes;
use hyper::{header, StatusCode};

fn request(method: &str, uri: &str) -> Request {
    hyper::Request::builder()
        .method(method)
        .uri(uri)
        .body(Bytes::new())
        .unwrap()
        .into()
}

fn body(res: &Response) -> &str {
    std::str::from_utf8(res.body()).unwrap()
}

fn named(name: &'static str) -> impl Fn(&RouteRequest<'_>, &mut Response) -> HandlerResult {
    move |_, res| {
        res.send(name);
        Ok(())
    }
}

#[test]
fn greet_with_path_and_query_params() {
    let seen = Arc::new(Mutex::new(None));
    let fallback_called = Arc::new(Mutex::new(false));

    let router = {
        let seen = seen.clone();
        let fallback_called = fallback_called.clone();
        Router::default()
            .get("/greet/{name}", move |req, res| {
                *seen.lock().unwrap() = Some((req.params().clone(), req.query().clone()));
                res.send(format!("Hello, {}!", req.param("name").unwrap_or_default()));
                Ok(())
            })
            .fallback(move |_, _| {
                *fallback_called.lock().unwrap() = true;
                Ok(())
            })
    };

    let res = router.dispatch(&request("GET", "/greet/World?x=1"));
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(body(&res), "Hello, World!");

    let (params, query) = seen.lock().unwrap().take().unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params.get("name"), Some("World"));
    assert_eq!(query.len(), 1);
    assert_eq!(query.get("x"), Some("1"));
    assert!(!*fallback_called.lock().unwrap());
}

#[test]
fn fallback_without_routes() {
    let router = Router::default().fallback(|req, res| {
        res.send(format!("{} {}", req.method(), req.uri()));
        Ok(())
    });

    let res = router.dispatch(&request("POST", "/anything"));
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(body(&res), "POST /anything");
}

#[test]
fn fallback_sees_no_path_params() {
    let router = Router::default()
        .get("/users/{id}", named("user"))
        .fallback(|req, res| {
            res.send(format!("params={}", req.params().len()));
            Ok(())
        });

    let res = router.dispatch(&request("GET", "/users/7/extra"));
    assert_eq!(body(&res), "params=0");
}

#[test]
fn not_found_without_fallback() {
    let router = Router::default().get("/users", named("users"));

    let res = router.dispatch(&request("GET", "/no-such-page"));
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    assert!(body(&res).contains("/no-such-page"));
}

#[test]
fn messy_paths_are_normalized() {
    let router = Router::default().get("/a/b", named("ab"));

    for path in &["/a/b", "//a//b/", "/a/b/", "///a/b"] {
        let res = router.dispatch(&request("GET", path));
        assert_eq!(body(&res), "ab", "path {}", path);
    }
}

#[test]
fn root_route() {
    let router = Router::default().get("/", named("root"));

    assert_eq!(body(&router.dispatch(&request("GET", "/"))), "root");
    assert_eq!(body(&router.dispatch(&request("GET", "//"))), "root");
    assert_eq!(
        router.dispatch(&request("GET", "/a")).status_code(),
        StatusCode::NOT_FOUND
    );
}

#[test]
fn first_match_wins_over_specific_literal() {
    let router = Router::default()
        .get("/a/{x}", |req, res| {
            res.send(format!("x={}", req.param("x").unwrap_or_default()));
            Ok(())
        })
        .get("/a/b", named("literal"));

    assert_eq!(body(&router.dispatch(&request("GET", "/a/b"))), "x=b");
}

#[test]
fn later_literal_reached_when_earlier_route_is_more_specific() {
    let router = Router::default()
        .get("/a/b", named("literal"))
        .get("/a/{x}", named("param"));

    assert_eq!(body(&router.dispatch(&request("GET", "/a/b"))), "literal");
    assert_eq!(body(&router.dispatch(&request("GET", "/a/c"))), "param");
}

#[test]
fn failed_candidate_does_not_leak_params() {
    let router = Router::default()
        .get("/{first}/nope", named("never"))
        .get("/items/{id}", |req, res| {
            let keys = req.params().iter().map(|(k, _)| k).collect::<Vec<_>>();
            res.send(keys.join(","));
            Ok(())
        });

    assert_eq!(body(&router.dispatch(&request("GET", "/items/3"))), "id");
}

#[test]
fn context_path_is_stripped() {
    let router = Router::new("/api")
        .get("/", named("index"))
        .get("/users/{id}", |req, res| {
            res.send(req.param("id").unwrap_or_default().to_owned());
            Ok(())
        })
        .get("/other", named("other"));

    assert_eq!(body(&router.dispatch(&request("GET", "/api/users/7"))), "7");
    assert_eq!(body(&router.dispatch(&request("GET", "/api"))), "index");
    assert_eq!(body(&router.dispatch(&request("GET", "/api/"))), "index");

    // requests outside the context are matched as they are
    assert_eq!(body(&router.dispatch(&request("GET", "/other"))), "other");
    assert_eq!(body(&router.dispatch(&request("GET", "/users/8"))), "8");
}

#[test]
fn context_path_is_stripped_as_plain_prefix() {
    let router = Router::new("/api")
        .get("/x", named("x"))
        .get("/x/{id}", |req, res| {
            res.send(req.param("id").unwrap_or_default().to_owned());
            Ok(())
        });

    assert_eq!(body(&router.dispatch(&request("GET", "/apix"))), "x");
    assert_eq!(body(&router.dispatch(&request("GET", "/apix/9"))), "9");
}

#[test]
fn handler_sees_original_uri_under_context() {
    let router = Router::new("/api").get("/where", |req, res| {
        res.send(req.uri().to_string());
        Ok(())
    });

    assert_eq!(
        body(&router.dispatch(&request("GET", "/api/where?q=1"))),
        "/api/where?q=1"
    );
}

#[test]
fn json_codec_failure_is_500() {
    use std::collections::HashMap;

    let router = Router::default().get("/bad-json", |_, res| {
        let mut map = HashMap::new();
        map.insert(vec![1u8], "sequence keys cannot be serialized");
        res.json(&map)?;
        Ok(())
    });

    let res = router.dispatch(&request("GET", "/bad-json"));
    assert_eq!(res.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn json_request_and_response() {
    #[derive(serde::Deserialize, serde::Serialize)]
    struct Echo {
        message: String,
    }

    let router = Router::default().post("/echo", |req, res| {
        let echo: Echo = req.json()?;
        res.status(StatusCode::CREATED).json(&echo)?;
        Ok(())
    });

    let req: Request = hyper::Request::post("/echo")
        .body(Bytes::from_static(br#"{"message":"hola"}"#))
        .unwrap()
        .into();
    let res = router.dispatch(&req);

    assert_eq!(res.status_code(), StatusCode::CREATED);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(body(&res), r#"{"message":"hola"}"#);

    let bad: Request = hyper::Request::post("/echo")
        .body(Bytes::from_static(b"{"))
        .unwrap()
        .into();
    assert_eq!(
        router.dispatch(&bad).status_code(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn router_is_shareable_across_threads() {
    let router = Arc::new(Router::default().get("/n/{n}", |req, res| {
        res.send(req.param("n").unwrap_or_default().to_owned());
        Ok(())
    }));

    let handles = (0..8)
        .map(|i| {
            let router = router.clone();
            std::thread::spawn(move || {
                let res = router.dispatch(&request("GET", &format!("/n/{}", i)));
                assert_eq!(body(&res), i.to_string());
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.join().unwrap();
    }
}
