use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use interoute_core::{
    args, GenerationError, MethodMetadata, Parameter, ResultType, Router, RoutingError,
    StatusCode, TransportError,
};
use interoute_http::{router, Error, HttpBackendConfig};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
struct User {
    name: String,
    email: String,
}

fn test_user() -> User {
    User {
        name: "test".to_string(),
        email: "test@domain.com".to_string(),
    }
}

fn build_web_fetch(config: HttpBackendConfig) -> Result<Router, Error> {
    let router = router(config)?
        .accessor("userServicePath", || "/user".to_string())
        .headers_provider("userDetails(String)", || {
            HashMap::from([("Authorization".to_string(), "Bearer secret".to_string())])
        })
        .route(
            MethodMetadata::get("hello", "/hello")
                .returning(ResultType::value("String"))
                .status_aware(),
        )
        .route(
            MethodMetadata::get("userDetails", "{userServicePath()}/{0 name}")
                .with_parameter(Parameter::text("name"))
                .returning(ResultType::value("User")),
        )
        .route(
            MethodMetadata::get("userDetails", "/user/{0}?context={1}")
                .with_parameter(Parameter::text("name"))
                .with_parameter(Parameter::text("context"))
                .returning(ResultType::value("User")),
        )
        .route(
            MethodMetadata::post("registerUser", "/user")
                .with_parameter(Parameter::new("user", "User").as_body())
                .status_aware(),
        )
        .build()?;
    Ok(router)
}

fn web_fetch(config: HttpBackendConfig) -> Router {
    build_web_fetch(config).unwrap()
}

fn config_for(server: &MockServer) -> HttpBackendConfig {
    HttpBackendConfig::new().with_root_url(server.uri())
}

#[tokio::test]
async fn test_plain_text_status_aware_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Hello world"))
        .mount(&server)
        .await;

    let router = web_fetch(config_for(&server));
    let response = router
        .call::<String>("hello()", args![])
        .await
        .unwrap()
        .into_response()
        .unwrap();

    assert_eq!(response.result().map(String::as_str), Some("Hello world"));
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_user_with_accessor_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/test"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_user()))
        .expect(1)
        .mount(&server)
        .await;

    let router = web_fetch(config_for(&server));
    let user = router
        .call::<User>("userDetails(String)", args!["test"])
        .await
        .unwrap()
        .into_value();

    assert_eq!(user, Some(test_user()));
}

#[tokio::test]
async fn test_get_user_with_query_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/alice"))
        .and(query_param("context", "admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(User {
            name: "alice".to_string(),
            email: "alice@domain.com".to_string(),
        }))
        .mount(&server)
        .await;

    let router = web_fetch(config_for(&server));
    let user = router
        .call::<User>("userDetails(String,String)", args!["alice", "admin"])
        .await
        .unwrap()
        .into_value()
        .unwrap();

    assert_eq!(user.name, "alice");
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/alice"))
        .and(header("X-Client", "interoute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_user()))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server).with_default_header("X-Client", "interoute");
    let router = web_fetch(config);

    let user = router
        .call::<User>("userDetails(String,String)", args!["alice", "ctx"])
        .await
        .unwrap();
    assert!(user.into_value().is_some());
}

#[tokio::test]
async fn test_register_user_posts_json_body() {
    let server = MockServer::start().await;

    let new_user = User {
        name: "test3".to_string(),
        email: "test3@domain.com".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/user"))
        .and(header("content-type", "application/json"))
        .and(body_json(&new_user))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let router = web_fetch(config_for(&server));
    let body = serde_json::to_value(&new_user).unwrap();
    let response = router
        .call::<()>("registerUser(User)", vec![body])
        .await
        .unwrap()
        .into_response()
        .unwrap();

    assert_eq!(response.status_as_result(), Ok(StatusCode::OK));
    assert!(response.routing_error().is_none());
}

#[tokio::test]
async fn test_conflict_raised_by_transport_is_wrapped() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(409)
                .insert_header("x-reason", "exists")
                .set_body_json(serde_json::json!({"error": "exists"})),
        )
        .mount(&server)
        .await;

    let router = web_fetch(config_for(&server));
    let response = router
        .call::<()>("registerUser(User)", args![{"name": "test2", "email": "test2@domain.com"}])
        .await
        .unwrap()
        .into_response()
        .unwrap();

    assert_eq!(response.status_as_result(), Ok(StatusCode::CONFLICT));
    assert_eq!(response.headers()["x-reason"], "exists");
    assert!(matches!(
        response.routing_error(),
        Some(RoutingError::Transport(TransportError::Status { .. }))
    ));
    assert!(response.result().is_none());
}

#[tokio::test]
async fn test_conflict_returned_normally_is_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({"error": "exists"})))
        .mount(&server)
        .await;

    let config = config_for(&server).with_error_on_status(false);
    let router = web_fetch(config);
    let response = router
        .call::<()>("registerUser(User)", args![{"name": "test2"}])
        .await
        .unwrap()
        .into_response()
        .unwrap();

    assert_eq!(response.as_result(), Err(StatusCode::CONFLICT));
    assert!(response.routing_error().is_none());
    assert!(response.result().is_none());
}

#[tokio::test]
async fn test_not_found_on_status_aware_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let router = web_fetch(config_for(&server));
    let response = router
        .call::<String>("hello()", args![])
        .await
        .unwrap()
        .into_response()
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(matches!(response.response_as_result(), Err(Some(_))));
}

#[tokio::test]
async fn test_server_error_on_plain_route_fails_the_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/test"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let router = web_fetch(config_for(&server));
    let err = router
        .call::<User>("userDetails(String)", args!["test"])
        .await
        .unwrap_err();

    assert!(matches!(err, RoutingError::Transport(TransportError::Status { .. })));
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_server_error_without_raising_is_still_an_error_for_plain_routes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user/test"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let router = web_fetch(config_for(&server).with_error_on_status(false));
    let err = router
        .call::<User>("userDetails(String)", args!["test"])
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RoutingError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE
        }
    );
}

#[tokio::test]
async fn test_timeout_fails_even_status_aware_routes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server).with_timeout(Duration::from_millis(50));
    let router = web_fetch(config);
    let err = router.call::<String>("hello()", args![]).await.unwrap_err();

    assert_eq!(err, RoutingError::Transport(TransportError::Timeout));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_concurrent_calls_complete_independently() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("slow")
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/user/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(test_user()))
        .mount(&server)
        .await;

    let router = web_fetch(config_for(&server));

    let slow = router.route("hello()").unwrap().spawn::<String>(args![]);
    let fast = router
        .route("userDetails(String)")
        .unwrap()
        .spawn::<User>(args!["test"]);

    let fast = fast.await.unwrap().unwrap().into_value();
    let slow = slow.await.unwrap().unwrap().into_value();

    assert_eq!(fast, Some(test_user()));
    assert_eq!(slow.as_deref(), Some("slow"));
}

#[tokio::test]
async fn test_connection_refused_fails_even_status_aware_routes() {
    // Bind then release a port so nothing is listening on it.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let config = HttpBackendConfig::new().with_root_url(format!("http://127.0.0.1:{}", port));
    let router = web_fetch(config);
    let result = router.call::<String>("hello()", args![]).await;

    let err = match result {
        Err(err) => err,
        Ok(reply) => panic!("expected a routing error, got {:?}", reply),
    };
    assert!(matches!(
        err,
        RoutingError::Transport(TransportError::Connect { .. })
    ));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_repeated_response_headers_are_joined() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("set-cookie", "a=1")
                .append_header("set-cookie", "b=2")
                .set_body_string("Hello world"),
        )
        .mount(&server)
        .await;

    let router = web_fetch(config_for(&server));
    let response = router
        .call::<String>("hello()", args![])
        .await
        .unwrap()
        .into_response()
        .unwrap();

    assert_eq!(response.headers()["set-cookie"], "a=1, b=2");
}

#[test]
fn test_generation_errors_convert_into_backend_error() {
    fn build(config: HttpBackendConfig) -> Result<Router, Error> {
        let router = router(config)?
            .route(MethodMetadata::get("userDetails", "{missingPath()}/{0}")
                .with_parameter(Parameter::text("name")))
            .build()?;
        Ok(router)
    }

    let err = match build(HttpBackendConfig::new()) {
        Err(err) => err,
        Ok(_) => panic!("route with an unbound accessor should not build"),
    };
    assert!(matches!(
        err,
        Error::Generation(GenerationError::UnknownAccessor { ref name, .. }) if name == "missingPath"
    ));
}
